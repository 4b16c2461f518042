//! # Base64 Decoding
//!
//! Utilities for decoding base64 payloads carried in browser data URLs
//! (`data:image/png;base64,iVBOR...`).

use base64::{Engine as _, engine::general_purpose};

/// Split a data URL and return the part after the first comma.
///
/// Returns `None` when there is no comma, mirroring what browsers produce for
/// `FileReader.readAsDataURL`.
pub fn split_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, payload)| payload)
}

/// Decode a standard (padded) base64 string to bytes.
pub fn b64_decode(b64: &str) -> Result<Vec<u8>, Error> {
    general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|_| Error::FailToB64Decode)
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToB64Decode,
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_data_url() {
        assert_eq!(split_data_url("data:image/png;base64,AAAA"), Some("AAAA"));
        assert_eq!(split_data_url("AAAA"), None);
    }

    #[test]
    fn test_b64_decode_rejects_garbage() {
        assert!(b64_decode("not base64!!").is_err());
        assert_eq!(b64_decode("aGk=").unwrap(), b"hi".to_vec());
    }
}
