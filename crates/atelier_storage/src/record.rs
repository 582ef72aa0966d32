//! One row of the generation log.

use atelier_core::GeneratedImage;
use atelier_error::{StorageError, StorageErrorKind};
use base64::{Engine, engine::general_purpose::STANDARD};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Local-time format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A logged generation. Field order is the column order of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerationLogRecord {
    /// When the image was produced, in [`TIMESTAMP_FORMAT`]
    timestamp: String,
    /// Free-text attribution
    group_members: String,
    /// Prompt that produced the image
    prompt: String,
    /// PNG bytes, base64 encoded
    image: String,
}

impl GenerationLogRecord {
    /// Build a record from already encoded parts.
    pub fn new(
        timestamp: impl Into<String>,
        group_members: impl Into<String>,
        prompt: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            group_members: group_members.into(),
            prompt: prompt.into(),
            image: image.into(),
        }
    }

    /// Record a generation now, re-encoding the image as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::Encode`] if the image cannot be encoded.
    pub fn from_generation(
        prompt: &str,
        image: &GeneratedImage,
        group_members: &str,
    ) -> Result<Self, StorageError> {
        let png = image
            .to_png()
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Ok(Self::new(timestamp, group_members, prompt, STANDARD.encode(png)))
    }

    /// Decode the stored PNG bytes.
    pub fn png_bytes(&self) -> Result<Vec<u8>, StorageError> {
        STANDARD
            .decode(&self.image)
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))
    }
}
