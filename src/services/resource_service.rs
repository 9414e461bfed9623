use async_trait::async_trait;

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::types::{DataEnvelope, NewResource, Resource, ResourceFilter, ResourceId, ResourcePage, ResourcePatch};

/// Resource operations, one HTTP call each
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Resources in server order
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ClientError> {
        Ok(self.list_page(filter).await?.data)
    }

    /// Like `list`, keeping the pagination totals
    async fn list_page(&self, filter: &ResourceFilter) -> Result<ResourcePage, ClientError>;

    async fn get(&self, id: ResourceId) -> Result<Resource, ClientError>;

    async fn create(&self, resource: &NewResource) -> Result<Resource, ClientError>;

    /// Only the fields set in `patch` change server-side.
    async fn update(&self, id: ResourceId, patch: &ResourcePatch) -> Result<Resource, ClientError>;

    async fn delete(&self, id: ResourceId) -> Result<bool, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ResourceService {
    http: HttpClient,
}

impl ResourceService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn resource_path(id: ResourceId) -> Result<String, ClientError> {
        if id == 0 {
            return Err(ClientError::validation("id"));
        }
        Ok(format!("/resources/{id}"))
    }
}

fn log_failure(action: &str, err: ClientError) -> ClientError {
    tracing::error!("{} failed: {}", action, err);
    err
}

#[async_trait]
impl ResourceApi for ResourceService {
    async fn list_page(&self, filter: &ResourceFilter) -> Result<ResourcePage, ClientError> {
        self.http
            .get("/resources", &filter.to_query())
            .await
            .map_err(|e| log_failure("listing resources", e))
    }

    async fn get(&self, id: ResourceId) -> Result<Resource, ClientError> {
        let path = Self::resource_path(id)?;
        let response: DataEnvelope<Resource> = self
            .http
            .get(&path, &[])
            .await
            .map_err(|e| log_failure(&format!("fetching resource {id}"), e))?;
        Ok(response.data)
    }

    async fn create(&self, resource: &NewResource) -> Result<Resource, ClientError> {
        let response: DataEnvelope<Resource> = self
            .http
            .post("/resources", Some(resource))
            .await
            .map_err(|e| log_failure("creating resource", e))?;
        tracing::info!("created resource {} ({})", response.data.id, response.data.title);
        Ok(response.data)
    }

    async fn update(&self, id: ResourceId, patch: &ResourcePatch) -> Result<Resource, ClientError> {
        let path = Self::resource_path(id)?;
        let response: DataEnvelope<Resource> = self
            .http
            .put(&path, patch)
            .await
            .map_err(|e| log_failure(&format!("updating resource {id}"), e))?;
        Ok(response.data)
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, ClientError> {
        let path = Self::resource_path(id)?;
        self.http
            .delete(&path)
            .await
            .map_err(|e| log_failure(&format!("deleting resource {id}"), e))?;
        tracing::info!("deleted resource {}", id);
        Ok(true)
    }
}
