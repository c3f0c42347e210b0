//! Image file handle passed between validation, caching and upload.

use std::path::Path;

use image::ImageFormat;

use crate::types::{PhotomonixError, Result};

/// An image as uploaded by the user
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name (sent as the multipart file name)
    pub name: String,
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the MIME type from its extension.
    ///
    /// Unknown extensions get `application/octet-stream` and are rejected
    /// later by upload validation.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PhotomonixError::validation(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();
        let content_type = ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Build the multipart part for this file
    pub fn to_part(&self) -> Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.name.clone())
            .mime_str(&self.content_type)
            .map_err(|e| {
                PhotomonixError::validation(format!(
                    "Invalid content type '{}': {}",
                    self.content_type, e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_path_detects_mime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("product.JPG");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "product.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.len(), 17);
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.xyz");
        std::fs::write(&path, b"hello").unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(file.content_type, "application/octet-stream");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let file = ImageFile::new("a.png", "image/png", vec![0u8; 2048]);
        let rendered = format!("{:?}", file);
        assert!(rendered.contains("size: 2048"));
        assert!(!rendered.contains("0, 0, 0"));
    }
}
