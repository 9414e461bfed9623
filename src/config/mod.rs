use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Origin of the resource API; the `/api` base path is appended per request
    pub server_url: String,
    /// Directory holding the persisted session
    pub config_dir: Option<PathBuf>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("MEDIAHUB_SERVER_URL") {
            self.server_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("MEDIAHUB_CONFIG_DIR") {
            self.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("MEDIAHUB_DEBUG") {
            self.debug_logging = v.parse().unwrap_or(self.debug_logging);
        }

        self
    }

    /// Config pointing at an explicit server, used by tests and embedders
    pub fn for_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::development()
        }
    }

    /// Parsed server origin
    pub fn server(&self) -> Result<url::Url, ClientError> {
        let url = url::Url::parse(&self.server_url)
            .map_err(|e| ClientError::validation(format!("server_url ({e})")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::validation("server_url (scheme must be http or https)"));
        }
        Ok(url)
    }

    /// Session directory: explicit config, else `$HOME/.config/mediahub`
    pub fn resolve_config_dir(&self) -> Result<PathBuf, ClientError> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| ClientError::storage("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(".config").join("mediahub"))
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server_url: "http://localhost:8080".to_string(),
            config_dir: None,
            debug_logging: false,
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server_url: "https://staging.example.com".to_string(),
            config_dir: None,
            debug_logging: false,
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server_url: "https://app.example.com".to_string(),
            config_dir: None,
            debug_logging: false,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}
