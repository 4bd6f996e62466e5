//! Decoding of base64 image data URLs sent by the client.

use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

/// Matches `data:image/<type>;base64,<payload>`.
static IMAGE_DATA_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/([A-Za-z0-9.+-]+);base64,(.*)$").expect("valid image data URL regex")
});

/// Errors that can occur while decoding an image data URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("Image must be a base64 data URL")]
    NotAnImageDataUrl,

    #[error("Image payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Image payload is empty")]
    Empty,
}

/// Raw image bytes extracted from a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    /// Subtype from the MIME type, used as the file extension (`png`, `jpeg`, ...).
    pub extension: String,
}

impl DecodedImage {
    pub fn content_type(&self) -> String {
        format!("image/{}", self.extension)
    }
}

/// Decodes `data:image/<type>;base64,<payload>` into bytes.
///
/// # Errors
///
/// Returns [`DataUrlError::NotAnImageDataUrl`] if the prefix is missing,
/// [`DataUrlError::InvalidBase64`] if the payload does not decode and
/// [`DataUrlError::Empty`] if it decodes to nothing.
pub fn decode_image(data_url: &str) -> Result<DecodedImage, DataUrlError> {
    let captures = IMAGE_DATA_URL_REGEX
        .captures(data_url.trim())
        .ok_or(DataUrlError::NotAnImageDataUrl)?;

    let extension = captures[1].to_ascii_lowercase();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(captures[2].trim())
        .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(DataUrlError::Empty);
    }

    Ok(DecodedImage { bytes, extension })
}
