use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{UploadConfig, UploadFile};

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Compression task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// 0.0..=1.0, used by lossy encoders
    pub quality: f32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 0.8,
        }
    }
}

impl From<&UploadConfig> for CompressOptions {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality,
        }
    }
}

/// Size that fits inside the bounds with the aspect ratio kept; never upscales
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let w = ((width as f64 * ratio).round() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * ratio).round() as u32).clamp(1, max_height.max(1));
    (w, h)
}

/// Shrink and re-encode an image in its declared format.
///
/// The result keeps the original name and type with a fresh modification time.
pub fn compress_image(file: &UploadFile, options: CompressOptions) -> Result<UploadFile, CompressError> {
    let format = ImageFormat::from_mime_type(&file.content_type)
        .ok_or_else(|| CompressError::UnsupportedType(file.content_type.clone()))?;

    let img = image::load_from_memory_with_format(&file.bytes, format)?;
    let (width, height) = (img.width(), img.height());
    let (new_w, new_h) = fit_within(width, height, options.max_width, options.max_height);

    let img = if (new_w, new_h) != (width, height) {
        debug!("Resizing {} from {}x{} to {}x{}", file.name, width, height, new_w, new_h);
        img.resize_exact(new_w, new_h, FilterType::Triangle)
    } else {
        img
    };

    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let quality = (options.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
        }
        other => {
            img.write_to(&mut Cursor::new(&mut buf), other)?;
        }
    }

    Ok(UploadFile {
        name: file.name.clone(),
        content_type: file.content_type.clone(),
        bytes: buf,
        last_modified: Utc::now(),
    })
}

/// Best-effort compression: non-images and any failure yield the original file
pub fn compress_or_original(file: UploadFile, options: CompressOptions) -> UploadFile {
    if !file.is_image() {
        return file;
    }
    match compress_image(&file, options) {
        Ok(compressed) => {
            debug!(
                "Compressed {}: {} -> {} bytes",
                file.name,
                file.size(),
                compressed.size()
            );
            compressed
        }
        Err(e) => {
            warn!("Image compression failed for {}, uploading original: {}", file.name, e);
            file
        }
    }
}

/// Runs the compression on the blocking pool
pub async fn compress_in_background(file: UploadFile, options: CompressOptions) -> UploadFile {
    if !file.is_image() {
        return file;
    }
    let fallback = file.clone();
    match tokio::task::spawn_blocking(move || compress_or_original(file, options)).await {
        Ok(result) => result,
        Err(e) => {
            warn!("{}", CompressError::Task(e.to_string()));
            fallback
        }
    }
}
