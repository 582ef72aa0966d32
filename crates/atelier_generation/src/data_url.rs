//! Data-URL image decoding.

use atelier_core::GeneratedImage;
use atelier_error::{GenerationError, GenerationErrorKind};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Decode `data:<mime>;base64,<payload>` into an image.
///
/// Everything after the first comma is the payload. The MIME type is kept
/// when the header carries one.
pub fn decode_data_url(data_url: &str) -> Result<GeneratedImage, GenerationError> {
    let (header, payload) = data_url.split_once(',').ok_or_else(|| {
        GenerationError::new(GenerationErrorKind::Decode(
            "image_url is not a data URL".to_string(),
        ))
    })?;

    let mime_type = header
        .strip_prefix("data:")
        .and_then(|meta| meta.split(';').next())
        .filter(|mime| !mime.is_empty())
        .map(str::to_string);

    let bytes = STANDARD.decode(payload.trim()).map_err(|e| {
        GenerationError::new(GenerationErrorKind::Decode(format!(
            "Failed to decode base64: {}",
            e
        )))
    })?;

    GeneratedImage::decode(&bytes, mime_type).map_err(|e| {
        GenerationError::new(GenerationErrorKind::Decode(format!(
            "Failed to decode image: {}",
            e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_comma() {
        let err = decode_data_url("data:image/png;base64").unwrap_err();
        assert!(matches!(err.kind, GenerationErrorKind::Decode(_)));
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_data_url("data:image/png;base64,***").unwrap_err();
        assert!(err.kind.to_string().contains("base64"));
    }

    #[test]
    fn test_valid_base64_but_not_an_image() {
        let payload = STANDARD.encode(b"hello");
        let err = decode_data_url(&format!("data:image/png;base64,{}", payload)).unwrap_err();
        assert!(err.kind.to_string().contains("Failed to decode image"));
    }
}
