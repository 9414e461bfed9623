use std::sync::Arc;

use serde::Serialize;

use super::{ViewState, FALLBACK_HEIGHT, FALLBACK_WIDTH};
use crate::services::ResourceApi;
use crate::types::{Resource, ResourceId, ResourceKind};

pub const LOAD_FAILED: &str = "Failed to load resource details, please try again later";

fn or_fallback(value: u32, fallback: u32) -> u32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}

/// One tile of the detail gallery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: ResourceKind,
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub mime_type: String,
    /// Only meaningful for videos
    pub is_local: bool,
}

/// The `/resources/{id}` page
pub struct ResourceDetailView {
    api: Arc<dyn ResourceApi>,
    id: ResourceId,
    selected: usize,
    pub state: ViewState<Resource>,
}

impl ResourceDetailView {
    pub fn new(api: Arc<dyn ResourceApi>, id: ResourceId) -> Self {
        Self {
            api,
            id,
            selected: 0,
            state: ViewState::Idle,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.state = match self.api.get(self.id).await {
            Ok(resource) => ViewState::Loaded(resource),
            Err(e) => {
                tracing::error!("failed to fetch resource {}: {}", self.id, e);
                ViewState::Error(LOAD_FAILED.to_string())
            }
        };
        self.selected = 0;
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Videos first, then images; unknown dimensions render at the fallback size.
    pub fn media_items(&self) -> Vec<MediaItem> {
        let Some(resource) = self.state.data() else {
            return Vec::new();
        };

        let videos = resource.videos.iter().enumerate().map(|(index, video)| MediaItem {
            id: format!("video-{index}"),
            kind: ResourceKind::Video,
            src: video.url.clone(),
            width: or_fallback(video.width, FALLBACK_WIDTH),
            height: or_fallback(video.height, FALLBACK_HEIGHT),
            alt: format!("{} - video {}", resource.title, index + 1),
            mime_type: video.mime_type.clone(),
            is_local: video.is_local,
        });
        let images = resource.images.iter().enumerate().map(|(index, image)| MediaItem {
            id: format!("image-{index}"),
            kind: ResourceKind::Image,
            src: image.url.clone(),
            width: or_fallback(image.width, FALLBACK_WIDTH),
            height: or_fallback(image.height, FALLBACK_HEIGHT),
            alt: format!("{} - image {}", resource.title, index + 1),
            mime_type: image.mime_type.clone(),
            is_local: false,
        });

        videos.chain(images).collect()
    }

    /// Returns false when `index` is past the end; the selection is unchanged then.
    pub fn select_media(&mut self, index: usize) -> bool {
        if index >= self.media_items().len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn selected_media(&self) -> Option<MediaItem> {
        self.media_items().into_iter().nth(self.selected)
    }
}
