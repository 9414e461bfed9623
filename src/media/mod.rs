//! Local media handling for submissions: loading files, sniffing their type,
//! and the image compression step applied before images are queued.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ClientError;
use crate::types::{ImageInfo, VideoInfo};

/// A media file picked on the local machine
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    /// Where the file can be previewed before the server hosts it
    pub preview_url: String,
}

impl MediaFile {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::media(format!("read {}: {e}", path.display())))?;

        let absolute = tokio::fs::canonicalize(path).await.unwrap_or_else(|_| path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            mime_type: detect_mime(&data, path),
            name,
            data,
            preview_url: format!("file://{}", absolute.display()),
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Descriptor for the submission payload; dimensions stay unknown (0).
    pub fn to_image_info(&self) -> ImageInfo {
        ImageInfo {
            id: None,
            url: self.preview_url.clone(),
            width: 0,
            height: 0,
            size: self.size(),
            mime_type: self.mime_type.clone(),
        }
    }

    pub fn to_video_info(&self) -> VideoInfo {
        VideoInfo {
            id: None,
            url: self.preview_url.clone(),
            width: 0,
            height: 0,
            size: self.size(),
            mime_type: self.mime_type.clone(),
            is_local: true,
        }
    }
}

/// MIME type from magic bytes, then from the extension.
pub fn detect_mime(data: &[u8], path: &Path) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionSettings {
    /// 0.0 (smallest) to 1.0 (best)
    pub quality: f32,
    pub max_width: u32,
    pub max_height: u32,
    pub mime_type: String,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 0.8,
            max_width: 1920,
            max_height: 1080,
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Image transform applied before an image joins a submission
#[async_trait]
pub trait ImageCompressor: Send + Sync {
    async fn compress(&self, file: MediaFile) -> Result<MediaFile, ClientError>;
}

/// Leaves images untouched
#[derive(Debug, Clone, Default)]
pub struct PassthroughCompressor;

#[async_trait]
impl ImageCompressor for PassthroughCompressor {
    async fn compress(&self, file: MediaFile) -> Result<MediaFile, ClientError> {
        Ok(file)
    }
}

/// Re-encodes images with the `ffmpeg` binary, shrinking them to fit the
/// configured box. Smaller images keep their size.
#[derive(Debug, Clone, Default)]
pub struct FfmpegCompressor {
    settings: CompressionSettings,
}

impl FfmpegCompressor {
    pub fn new(settings: CompressionSettings) -> Self {
        Self { settings }
    }

    /// ffmpeg's JPEG scale runs 2 (best) to 31 (worst)
    fn qscale(&self) -> u32 {
        let quality = self.settings.quality.clamp(0.0, 1.0);
        (2.0 + (1.0 - quality) * 29.0).round() as u32
    }

    fn scale_filter(&self) -> String {
        format!(
            "scale='min({w},iw)':'min({h},ih)':force_original_aspect_ratio=decrease",
            w = self.settings.max_width,
            h = self.settings.max_height
        )
    }

    fn output_extension(&self) -> &'static str {
        match self.settings.mime_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<(), ClientError> {
        let result = Command::new("ffmpeg")
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(self.scale_filter())
            .arg("-q:v")
            .arg(self.qscale().to_string())
            .arg(output)
            .output()
            .await
            .map_err(|e| ClientError::media(format!("could not start ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!("ffmpeg failed with status {:?}: {}", result.status, stderr.trim());
            return Err(ClientError::media("ffmpeg could not compress the image"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageCompressor for FfmpegCompressor {
    async fn compress(&self, file: MediaFile) -> Result<MediaFile, ClientError> {
        let work_id = uuid::Uuid::new_v4().simple().to_string();
        let tmp = std::env::temp_dir();
        let input: PathBuf = tmp.join(format!("mediahub-{work_id}-in"));
        let output: PathBuf = tmp.join(format!("mediahub-{work_id}-out.{}", self.output_extension()));

        tokio::fs::write(&input, &file.data)
            .await
            .map_err(|e| ClientError::media(format!("stage {}: {e}", file.name)))?;

        let outcome = match self.run(&input, &output).await {
            Ok(()) => tokio::fs::read(&output)
                .await
                .map_err(|e| ClientError::media(format!("read compressed {}: {e}", file.name))),
            Err(e) => Err(e),
        };

        let _ = tokio::fs::remove_file(&input).await;
        let _ = tokio::fs::remove_file(&output).await;

        let data = outcome?;
        tracing::debug!("compressed {} from {} to {} bytes", file.name, file.data.len(), data.len());

        Ok(MediaFile {
            name: file.name,
            mime_type: self.settings.mime_type.clone(),
            data,
            preview_url: file.preview_url,
        })
    }
}
