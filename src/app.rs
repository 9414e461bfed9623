use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::services::{AuthApi, AuthService, ResourceApi, ResourceService};
use crate::session::{FileStore, KeyValueStore, Session};

/// Everything a page needs, wired once at start-up.
///
/// The session is created here and shared by the HTTP client (token
/// injection) and the auth service (login/logout/refresh); nothing else
/// writes it.
#[derive(Clone)]
pub struct AppContext {
    pub session: Session,
    pub http: HttpClient,
    pub auth: Arc<AuthService>,
    pub resources: Arc<ResourceService>,
}

impl AppContext {
    /// Context whose session persists in the configured directory
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let store = FileStore::in_dir(config.resolve_config_dir()?)?;
        tracing::debug!("session file: {}", store.path().display());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let session = Session::new(store);
        let http = HttpClient::new(config, session.clone())?;
        Ok(Self {
            auth: Arc::new(AuthService::new(http.clone(), session.clone())),
            resources: Arc::new(ResourceService::new(http.clone())),
            session,
            http,
        })
    }

    pub fn auth_api(&self) -> Arc<dyn AuthApi> {
        self.auth.clone()
    }

    pub fn resource_api(&self) -> Arc<dyn ResourceApi> {
        self.resources.clone()
    }
}
