//! Canonical form for submitted link URLs.
//!
//! The canonical URL doubles as the link slug, so two spellings of the same
//! address must map to the same string.

use url::Url;

/// Errors that can occur while canonicalizing a link URL.
#[derive(Debug, thiserror::Error)]
pub enum LinkUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS links are allowed")]
    UnsupportedProtocol,
}

/// Canonicalizes a link URL.
///
/// Scheme and host are lowercased, default ports and fragments are dropped.
/// Path and query are kept as submitted.
///
/// # Errors
///
/// Returns [`LinkUrlError::InvalidFormat`] for malformed URLs and
/// [`LinkUrlError::UnsupportedProtocol`] for anything but `http`/`https`.
pub fn canonicalize(raw: &str) -> Result<String, LinkUrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| LinkUrlError::InvalidFormat(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LinkUrlError::UnsupportedProtocol);
    }

    if url.host_str().is_none() {
        return Err(LinkUrlError::InvalidFormat("missing host".to_string()));
    }

    url.set_fragment(None);

    Ok(url.to_string())
}
