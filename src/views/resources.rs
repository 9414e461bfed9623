use std::sync::Arc;

use serde::Serialize;

use super::{ViewState, FALLBACK_HEIGHT, FALLBACK_WIDTH, PLACEHOLDER_IMAGE};
use crate::services::ResourceApi;
use crate::types::{Resource, ResourceFilter, ResourceId, ResourceKind, SortField, SortOrder};

pub const LOAD_FAILED: &str = "Failed to load resources, please try again later";

/// Gallery entry for one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceCard {
    pub id: ResourceId,
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub href: String,
    pub description: String,
    pub image_count: usize,
    pub tags: Vec<String>,
}

impl From<&Resource> for ResourceCard {
    fn from(resource: &Resource) -> Self {
        let src = if resource.poster_image.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            resource.poster_image.clone()
        };
        let description = if resource.description.is_empty() {
            "No description".to_string()
        } else {
            resource.description.clone()
        };

        Self {
            id: resource.id,
            src,
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
            alt: resource.title.clone(),
            href: format!("/resources/{}", resource.id),
            description,
            image_count: resource.images.len(),
            tags: resource.tags.clone(),
        }
    }
}

/// The `/resources` album page
pub struct ResourceListView {
    api: Arc<dyn ResourceApi>,
    kind: ResourceKind,
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    sort: Option<SortField>,
    order: Option<SortOrder>,
    pub state: ViewState<Vec<Resource>>,
}

impl ResourceListView {
    /// Starts on the video album
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self {
            api,
            kind: ResourceKind::Video,
            page: None,
            limit: None,
            search: None,
            sort: None,
            order: None,
            state: ViewState::Idle,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Either half may be left to the server default
    pub fn with_sort(mut self, sort: Option<SortField>, order: Option<SortOrder>) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn filter(&self) -> ResourceFilter {
        ResourceFilter {
            kind: Some(self.kind),
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            sort: self.sort,
            order: self.order,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.state = match self.api.list(&self.filter()).await {
            Ok(resources) => ViewState::Loaded(resources),
            Err(e) => {
                tracing::error!("failed to fetch {} resources: {}", self.kind, e);
                ViewState::Error(LOAD_FAILED.to_string())
            }
        };
    }

    /// Switch albums; the list is fetched again for the new kind.
    pub async fn set_kind(&mut self, kind: ResourceKind) {
        self.kind = kind;
        self.load().await;
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn cards(&self) -> Vec<ResourceCard> {
        self.state
            .data()
            .map(|resources| resources.iter().map(ResourceCard::from).collect())
            .unwrap_or_default()
    }
}
