/// Pasted image attachments and data-URL decoding
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub const IMAGE_FIELD: &str = "image";
const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("Not a data URL")]
    NotDataUrl,

    #[error("Data URL has no payload separator")]
    MissingPayload,

    #[error("Data URL payload is not base64 encoded")]
    NotBase64,

    #[error("Failed to decode image data: {0}")]
    Decode(String),

    #[error("Pasted file is not an image ({0})")]
    NotAnImage(String),
}

/// The image waiting to be submitted, as pasted into the input
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAttachment {
    pub data_url: String,
}

impl PendingAttachment {
    pub fn new(data_url: String) -> PendingAttachment {
        PendingAttachment { data_url }
    }

    /// Decode into an uploadable file, rejecting anything that is not an image
    pub fn to_image(&self) -> Result<ImageAttachment, DataUrlError> {
        let (mime, bytes) = decode_data_url(&self.data_url)?;
        if !mime.starts_with("image/") {
            return Err(DataUrlError::NotAnImage(mime));
        }

        Ok(ImageAttachment {
            file_name: format!("pasted-image.{}", extension_for(&mime)),
            mime,
            bytes,
        })
    }
}

/// Binary file posted as multipart field `image`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and decoded bytes
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or(DataUrlError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;

    let mut params = header.split(';');
    let mime = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME)
        .to_ascii_lowercase();

    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(DataUrlError::NotBase64);
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUrlError::Decode(e.to_string()))?;

    Ok((mime, bytes))
}

fn extension_for(mime: &str) -> &str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/svg+xml" => "svg",
        other => other
            .strip_prefix("image/")
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_decode_png_data_url() {
        let (mime, bytes) = decode_data_url(PNG_DATA_URL).unwrap();

        assert_eq!(mime, "image/png");
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_pending_attachment_to_image() {
        let image = PendingAttachment::new(PNG_DATA_URL.to_string())
            .to_image()
            .unwrap();

        assert_eq!(image.mime, "image/png");
        assert_eq!(image.file_name, "pasted-image.png");
        assert!(!image.bytes.is_empty());
    }

    #[test]
    fn test_jpeg_extension() {
        let image = PendingAttachment::new("data:image/jpeg;base64,/9j/".to_string())
            .to_image()
            .unwrap();
        assert_eq!(image.file_name, "pasted-image.jpg");
    }

    #[test]
    fn test_malformed_data_urls() {
        assert_eq!(decode_data_url("https://x/y.png"), Err(DataUrlError::NotDataUrl));
        assert_eq!(
            decode_data_url("data:image/png;base64"),
            Err(DataUrlError::MissingPayload)
        );
        assert_eq!(decode_data_url("data:image/png,abc"), Err(DataUrlError::NotBase64));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(DataUrlError::Decode(_))
        ));
    }

    #[test]
    fn test_non_image_rejected() {
        let err = PendingAttachment::new("data:text/plain;base64,aGk=".to_string())
            .to_image()
            .unwrap_err();
        assert_eq!(err, DataUrlError::NotAnImage("text/plain".to_string()));
    }
}
