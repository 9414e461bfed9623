//! Construction of create payloads.
//!
//! The submit form only collects part of a resource. [`ResourceBuilder`]
//! names every other field together with the value it is sent with, so the
//! payload always satisfies the full schema.

use crate::types::{ImageInfo, Links, NewResource, ResourceKind, VideoInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBuilder {
    title: String,
    title_en: Option<String>,
    description: String,
    resource_type: ResourceKind,
    author: Option<String>,
    source: String,
    tags: Vec<String>,
    poster_image: String,
    images: Vec<ImageInfo>,
    videos: Vec<VideoInfo>,
}

impl ResourceBuilder {
    pub fn new(title: impl Into<String>, resource_type: ResourceKind) -> Self {
        Self {
            title: title.into(),
            title_en: None,
            description: String::new(),
            resource_type,
            author: None,
            source: String::new(),
            tags: Vec::new(),
            poster_image: String::new(),
            images: Vec::new(),
            videos: Vec::new(),
        }
    }

    /// Defaults to the title
    pub fn title_en(mut self, title_en: impl Into<String>) -> Self {
        self.title_en = Some(title_en.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Blank authors are left out
    pub fn author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        self.author = (!author.trim().is_empty()).then_some(author);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn poster_image(mut self, poster_image: impl Into<String>) -> Self {
        self.poster_image = poster_image.into();
        self
    }

    pub fn images(mut self, images: Vec<ImageInfo>) -> Self {
        self.images = images;
        self
    }

    pub fn videos(mut self, videos: Vec<VideoInfo>) -> Self {
        self.videos = videos;
        self
    }

    pub fn build(self) -> NewResource {
        NewResource {
            title_en: self.title_en.unwrap_or_else(|| self.title.clone()),
            title: self.title,
            description: self.description,
            resource_type: self.resource_type,
            author: self.author,
            source: self.source,
            tags: self.tags,
            poster_image: self.poster_image,
            images: self.images,
            videos: self.videos,
            // Not collected by the submit form
            links: Links::empty(),
            tmdb_id: None,
            stickers: Vec::new(),
            media_type: self.resource_type,
            liked_by: Vec::new(),
            is_approved: false,
        }
    }
}
