use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::media::{CompressionSettings, FfmpegCompressor, ImageCompressor, MediaFile, PassthroughCompressor};
use crate::types::ResourceKind;
use crate::views::{SubmitView, VideoSource};

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(help = "Title")]
    pub title: String,

    #[arg(long = "type", default_value = "video", help = "Resource type: image or video")]
    pub kind: ResourceKind,

    #[arg(long, default_value = "", help = "Description")]
    pub description: String,

    #[arg(long, default_value = "", help = "Author (omitted when blank)")]
    pub author: String,

    #[arg(long, default_value = "", help = "Source")]
    pub source: String,

    #[arg(long = "tag", help = "Tag, may be repeated")]
    pub tags: Vec<String>,

    #[arg(long, default_value = "", help = "Poster image URL")]
    pub poster: String,

    #[arg(long, help = "URL of an externally hosted video")]
    pub video_url: Option<String>,

    #[arg(long = "video", help = "Local video file to upload, may be repeated")]
    pub videos: Vec<PathBuf>,

    #[arg(long = "image", help = "Local image file, may be repeated")]
    pub images: Vec<PathBuf>,

    #[arg(long, help = "Send images unchanged instead of re-encoding with ffmpeg")]
    pub no_compress: bool,
}

async fn load_all(paths: &[PathBuf]) -> anyhow::Result<Vec<MediaFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(MediaFile::load(path).await?);
    }
    Ok(files)
}

pub async fn handle(args: SubmitArgs, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let compressor: Arc<dyn ImageCompressor> = if args.no_compress {
        Arc::new(PassthroughCompressor)
    } else {
        Arc::new(FfmpegCompressor::new(CompressionSettings::default()))
    };

    let mut view = SubmitView::new(ctx.resource_api(), compressor);
    view.form.title = args.title;
    view.form.resource_type = args.kind;
    view.form.description = args.description;
    view.form.author = args.author;
    view.form.source = args.source;
    view.form.poster_image = args.poster;
    for tag in args.tags {
        view.tag_input = tag;
        view.add_tag();
    }

    if !args.videos.is_empty() {
        view.video_source = VideoSource::Upload;
        view.add_videos(load_all(&args.videos).await?);
    } else if let Some(url) = args.video_url {
        view.form.video_url = url;
    }

    if !args.images.is_empty() {
        view.add_images(load_all(&args.images).await?).await;
        if let Some(message) = view.error.take() {
            output_error(&output_format, &message, Some("MEDIA_FAILED"))?;
            return Err(anyhow::anyhow!(message));
        }
    }

    match view.submit().await {
        Some(resource) => output_success(
            &output_format,
            view.success.as_deref().unwrap_or("Resource submitted"),
            Some(json!({ "resource": resource })),
        ),
        None => {
            let message = view.error.unwrap_or_default();
            output_error(&output_format, &message, Some("SUBMIT_FAILED"))?;
            Err(anyhow::anyhow!(message))
        }
    }
}
