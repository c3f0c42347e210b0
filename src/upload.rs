//! Upload Preparation
//!
//! Images are downscaled to the configured maximum width (aspect ratio kept)
//! and re-encoded as JPEG before being sent to either AI service.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::config::UploadConfig;
use crate::types::{ImageFile, PhotomonixError, Result};

pub const JPEG_MIME: &str = "image/jpeg";

/// Downscale and re-encode `image` as JPEG. CPU bound; run it on a blocking
/// thread from async code.
pub fn compress_image(image: &ImageFile, upload: &UploadConfig) -> Result<ImageFile> {
    let decoded = ImageReader::new(Cursor::new(&image.bytes))
        .with_guessed_format()
        .map_err(|e| PhotomonixError::Image(format!("Failed to read image: {}", e)))?
        .decode()
        .map_err(|e| PhotomonixError::Image(format!("Failed to load image: {}", e)))?;

    let (width, height) = (decoded.width(), decoded.height());
    let resized = if width > upload.max_width {
        decoded.resize(upload.max_width, u32::MAX, FilterType::Triangle)
    } else {
        decoded
    };

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, upload.jpeg_quality))
        .map_err(|e| PhotomonixError::Image(format!("Failed to compress image: {}", e)))?;

    debug!(
        name = %image.name,
        width,
        height,
        new_width = resized.width(),
        new_height = resized.height(),
        before = image.len(),
        after = bytes.len(),
        "Image compressed"
    );

    Ok(ImageFile::new(image.name.clone(), JPEG_MIME, bytes))
}

/// [`compress_image`] on the blocking pool
pub async fn compress_image_blocking(image: &ImageFile, upload: &UploadConfig) -> Result<ImageFile> {
    let image = image.clone();
    let upload = upload.clone();
    tokio::task::spawn_blocking(move || compress_image(&image, &upload))
        .await
        .map_err(|e| PhotomonixError::Image(format!("Compression task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> ImageFile {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 128]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        ImageFile::new("shot.png", "image/png", buf.into_inner())
    }

    fn dimensions(file: &ImageFile) -> (u32, u32) {
        let img = image::load_from_memory(&file.bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_wide_image_downscaled_keeping_ratio() {
        let out = compress_image(&png(3840, 2160), &UploadConfig::default()).unwrap();
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!(out.name, "shot.png");
        assert_eq!(dimensions(&out), (1920, 1080));
    }

    #[test]
    fn test_narrow_image_keeps_size() {
        let out = compress_image(&png(640, 480), &UploadConfig::default()).unwrap();
        assert_eq!(dimensions(&out), (640, 480));
        assert_eq!(&out.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_garbage_is_image_error() {
        let junk = ImageFile::new("x.jpg", "image/jpeg", b"definitely not a jpeg".to_vec());
        let err = compress_image(&junk, &UploadConfig::default()).unwrap_err();
        assert!(matches!(err, PhotomonixError::Image(_)));
    }

    #[tokio::test]
    async fn test_blocking_variant() {
        let upload = UploadConfig {
            max_width: 100,
            ..UploadConfig::default()
        };
        let out = compress_image_blocking(&png(400, 200), &upload).await.unwrap();
        assert_eq!(dimensions(&out), (100, 50));
    }
}
