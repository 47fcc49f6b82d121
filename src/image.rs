// Image input: what the picker hands over (`RawFile`) and what the client
// keeps once it passed validation (`SelectedImage`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ValidationError;

/// Media type declared for files whose extension we do not recognise.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Extensions offered by the file dialog filter.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "svg", "ico", "avif", "heic",
    "heif",
];

/// A file as chosen by the user: name, declared media type and contents.
/// Nothing about it has been checked yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        RawFile {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(RawFile {
            media_type: media_type_for_path(path).to_string(),
            file_name,
            bytes,
        })
    }
}

/// An image accepted by validation. Its media type always starts with
/// `image/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file: RawFile,
}

impl SelectedImage {
    pub fn file_name(&self) -> &str {
        &self.file.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.file.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.file.bytes
    }

    pub fn len(&self) -> usize {
        self.file.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.bytes.is_empty()
    }

    pub fn as_raw(&self) -> &RawFile {
        &self.file
    }
}

impl TryFrom<RawFile> for SelectedImage {
    type Error = ValidationError;

    fn try_from(file: RawFile) -> Result<Self, Self::Error> {
        if is_image_media_type(&file.media_type) {
            Ok(SelectedImage { file })
        } else {
            Err(ValidationError::NotAnImage {
                media_type: file.media_type,
            })
        }
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Declared media type for a path, the way a browser fills `File.type`.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => UNKNOWN_MEDIA_TYPE,
    }
}
