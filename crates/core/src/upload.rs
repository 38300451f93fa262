//! Upload batch validation.
//!
//! Checks run in order and short-circuit on the first failure, before
//! any bytes are sent upstream.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::limits::{ALLOWED_IMAGE_TYPES, MAX_IMAGES, MAX_UPLOAD_BYTES};

/// One image file extracted from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied file name, defaulted when the part has none.
    pub file_name: String,
    /// Declared content type. Trusted as-is; no sniffing.
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The set of image files from one identify request.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub images: Vec<UploadedImage>,
}

impl UploadBatch {
    pub fn new(images: Vec<UploadedImage>) -> Self {
        Self { images }
    }

    /// Aggregate byte size across all images.
    pub fn total_bytes(&self) -> usize {
        self.images.iter().map(UploadedImage::size).sum()
    }

    /// Validate the batch against upload constraints.
    ///
    /// Order matters: count checks before size, size before type, and
    /// the first offending file wins for type errors.
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(Error::NoImages);
        }

        if self.images.len() > MAX_IMAGES {
            return Err(Error::TooManyImages);
        }

        if self.total_bytes() > MAX_UPLOAD_BYTES {
            return Err(Error::PayloadTooLarge);
        }

        if let Some(invalid) = self
            .images
            .iter()
            .find(|img| !ALLOWED_IMAGE_TYPES.contains(&img.content_type.as_str()))
        {
            return Err(Error::unsupported_type(invalid.content_type.clone()));
        }

        Ok(())
    }
}
