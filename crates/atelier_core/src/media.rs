//! Decoded images handed back to the caller.

use derive_getters::Getters;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// An image produced by a completed generation job.
///
/// Owned by the caller once the job is done; the job itself is discarded.
#[derive(Debug, Clone, Getters)]
pub struct GeneratedImage {
    /// Decoded pixels
    image: DynamicImage,
    /// MIME type announced by the data URL, if any
    mime_type: Option<String>,
}

impl GeneratedImage {
    /// Decode raw image bytes, sniffing the format from the content.
    pub fn decode(bytes: &[u8], mime_type: Option<String>) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self { image, mime_type })
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            mime_type: None,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Re-encode as PNG, the format used for downloads and the log.
    pub fn to_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}
