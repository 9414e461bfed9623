use std::sync::Arc;

use crate::builder::ResourceBuilder;
use crate::error::ClientError;
use crate::media::{ImageCompressor, MediaFile};
use crate::services::ResourceApi;
use crate::types::{ImageInfo, NewResource, Resource, ResourceKind, VideoInfo};

pub const SUBMIT_FAILED: &str = "Failed to submit resource, please try again later";
pub const SUBMIT_SUCCEEDED: &str = "Resource submitted successfully!";
pub const IMAGE_PROCESSING_FAILED: &str = "Image processing failed, please try again";

/// Where a video resource's media comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSource {
    #[default]
    Url,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitForm {
    pub title: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub resource_type: ResourceKind,
    pub tags: Vec<String>,
    /// Only used when the video source is `Url`; sent as a `videos` entry
    pub video_url: String,
    pub poster_image: String,
}

/// The `/submit` page
pub struct SubmitView {
    api: Arc<dyn ResourceApi>,
    compressor: Arc<dyn ImageCompressor>,
    pub form: SubmitForm,
    pub tag_input: String,
    pub video_source: VideoSource,
    images: Vec<ImageInfo>,
    videos: Vec<VideoInfo>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SubmitView {
    pub fn new(api: Arc<dyn ResourceApi>, compressor: Arc<dyn ImageCompressor>) -> Self {
        Self {
            api,
            compressor,
            form: SubmitForm::default(),
            tag_input: String::new(),
            video_source: VideoSource::default(),
            images: Vec::new(),
            videos: Vec::new(),
            loading: false,
            error: None,
            success: None,
        }
    }

    pub fn images(&self) -> &[ImageInfo] {
        &self.images
    }

    pub fn videos(&self) -> &[VideoInfo] {
        &self.videos
    }

    /// Move `tag_input` into the tag list; blanks and duplicates are ignored.
    pub fn add_tag(&mut self) {
        let tag = self.tag_input.trim().to_string();
        if !tag.is_empty() && !self.form.tags.contains(&tag) {
            self.form.tags.push(tag);
            self.tag_input.clear();
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.form.tags.retain(|t| t != tag);
    }

    /// Compress and queue the image files of `files`; others are skipped.
    /// A failure leaves the queue as it was.
    pub async fn add_images(&mut self, files: Vec<MediaFile>) {
        let mut processed = Vec::new();
        for file in files.into_iter().filter(MediaFile::is_image) {
            match self.compressor.compress(file).await {
                Ok(compressed) => processed.push(compressed.to_image_info()),
                Err(e) => {
                    tracing::error!("image processing failed: {}", e);
                    self.error = Some(IMAGE_PROCESSING_FAILED.to_string());
                    return;
                }
            }
        }
        self.images.extend(processed);
    }

    /// Queue the video files of `files` unchanged; others are skipped.
    pub fn add_videos(&mut self, files: Vec<MediaFile>) {
        self.videos
            .extend(files.iter().filter(|f| f.is_video()).map(MediaFile::to_video_info));
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    pub fn remove_video(&mut self, index: usize) {
        if index < self.videos.len() {
            self.videos.remove(index);
        }
    }

    /// Required-field check for the selected resource type
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.form.title.trim().is_empty() {
            return Err(ClientError::validation("title"));
        }
        match (self.form.resource_type, self.video_source) {
            (ResourceKind::Video, VideoSource::Url) if self.form.video_url.trim().is_empty() => {
                Err(ClientError::validation("video_url"))
            }
            (ResourceKind::Video, VideoSource::Upload) if self.videos.is_empty() => {
                Err(ClientError::validation("videos"))
            }
            (ResourceKind::Image, _) if self.images.is_empty() => Err(ClientError::validation("images")),
            _ => Ok(()),
        }
    }

    /// Full create payload from the form and the queued media
    pub fn payload(&self) -> NewResource {
        let videos = match (self.form.resource_type, self.video_source) {
            (ResourceKind::Video, VideoSource::Url) => {
                vec![VideoInfo::external(self.form.video_url.trim())]
            }
            (ResourceKind::Video, VideoSource::Upload) => self.videos.clone(),
            (ResourceKind::Image, _) => Vec::new(),
        };
        let images = match self.form.resource_type {
            ResourceKind::Image => self.images.clone(),
            ResourceKind::Video => Vec::new(),
        };

        ResourceBuilder::new(self.form.title.clone(), self.form.resource_type)
            .description(self.form.description.clone())
            .author(self.form.author.clone())
            .source(self.form.source.clone())
            .tags(self.form.tags.clone())
            .poster_image(self.form.poster_image.clone())
            .images(images)
            .videos(videos)
            .build()
    }

    /// Validate, then create. Returns the stored resource on success and
    /// resets the form.
    pub async fn submit(&mut self) -> Option<Resource> {
        if let Err(e) = self.validate() {
            self.error = Some(validation_message(&e).to_string());
            return None;
        }

        self.loading = true;
        self.error = None;
        self.success = None;

        let outcome = match self.api.create(&self.payload()).await {
            Ok(resource) => {
                self.reset();
                self.success = Some(SUBMIT_SUCCEEDED.to_string());
                Some(resource)
            }
            Err(e) => {
                tracing::error!("resource submission failed: {}", e);
                self.error = Some(SUBMIT_FAILED.to_string());
                None
            }
        };
        self.loading = false;
        outcome
    }

    fn reset(&mut self) {
        self.form = SubmitForm::default();
        self.tag_input.clear();
        self.images.clear();
        self.videos.clear();
        self.video_source = VideoSource::default();
    }
}

fn validation_message(err: &ClientError) -> &'static str {
    match err {
        ClientError::Validation(field) => match field.as_str() {
            "title" => "Please enter a title",
            "video_url" => "Video resources need a video URL",
            "videos" => "Video resources need at least one uploaded video",
            "images" => "Image resources need at least one image",
            _ => "Please complete the required fields",
        },
        _ => "Please complete the required fields",
    }
}
