use async_trait::async_trait;

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::session::Session;
use crate::types::{DataEnvelope, LoginRequest, LoginResponse, RegisterRequest, TokenResponse, User};

/// Authentication operations used by the page controllers
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Post credentials; on success the session holds the returned token and user.
    async fn login(&self, username: &str, password: &str) -> Result<User, ClientError>;

    /// Create an account. Does not log in.
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ClientError>;

    /// Drop the local session. The server is not contacted.
    fn logout(&self) -> Result<(), ClientError>;

    fn current_user(&self) -> Option<User>;

    /// Token presence only; freshness is not checked.
    fn is_logged_in(&self) -> bool;

    /// Swap the token for a new one. Failure tears the session down.
    async fn refresh_token(&self) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
    session: Session,
}

impl AuthService {
    pub fn new(http: HttpClient, session: Session) -> Self {
        Self { http, session }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let request = LoginRequest { username, password };
        let response: LoginResponse = self
            .http
            .post("/auth/login", Some(&request))
            .await
            .map_err(|e| {
                tracing::error!("login failed for {}: {}", username, e);
                e
            })?;

        self.session.set_session(&response.token, &response.data)?;
        tracing::info!("logged in as {}", response.data.username);
        Ok(response.data)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ClientError> {
        let request = RegisterRequest {
            username,
            email,
            password,
        };
        let response: DataEnvelope<User> = self
            .http
            .post("/auth/register", Some(&request))
            .await
            .map_err(|e| {
                tracing::error!("registration failed for {}: {}", username, e);
                e
            })?;
        Ok(response.data)
    }

    fn logout(&self) -> Result<(), ClientError> {
        self.session.clear_session()
    }

    fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn refresh_token(&self) -> Result<String, ClientError> {
        match self.http.post::<(), TokenResponse>("/auth/refresh", None).await {
            Ok(response) => {
                self.session.set_token(&response.token)?;
                Ok(response.token)
            }
            Err(e) => {
                tracing::error!("token refresh failed, clearing session: {}", e);
                if let Err(clear_err) = self.session.clear_session() {
                    tracing::error!("could not clear session: {}", clear_err);
                }
                Err(e)
            }
        }
    }
}
