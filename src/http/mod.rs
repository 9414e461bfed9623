use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Session;

/// Every API path lives under this prefix
pub const API_BASE_PATH: &str = "/api";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client for every service call.
///
/// Attaches `Authorization: Bearer <token>` whenever the session holds a
/// token. Failures are returned as-is: no retries, no status interpretation.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    api_root: String,
    session: Session,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ClientError> {
        let server = config.server()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .user_agent(concat!("mediahub-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;

        let api_root = format!("{}{}", server.as_str().trim_end_matches('/'), API_BASE_PATH);
        tracing::debug!("HTTP client ready for {}", api_root);

        Ok(Self {
            inner,
            api_root,
            session,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.inner.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let builder = self.request(Method::GET, path).query(query);
        self.send_json(Method::GET, path, builder).await
    }

    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send_json(Method::POST, path, builder).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send_json(Method::PUT, path, builder).await
    }

    /// DELETE; any 2xx counts as success and the body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let builder = self.request(Method::DELETE, path);
        self.execute(Method::DELETE, path, builder).await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.execute(method, path, builder).await?;
        let bytes = response.bytes().await.map_err(ClientError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("unexpected response body for {}: {}", path, e);
            ClientError::Decode(e.to_string())
        })
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await.map_err(|e| {
            let err = ClientError::from(e);
            tracing::warn!("{} {} failed: {}", method, path, err);
            err
        })?;

        let status = response.status();
        tracing::debug!("{} {} -> {}", method, path, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status, &body);
        tracing::warn!("{} {} rejected: {}", method, path, err);
        Err(err)
    }
}
