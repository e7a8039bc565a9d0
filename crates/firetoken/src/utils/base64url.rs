//! Base64URL decoding per RFC 4648 with size limits

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Decode a Base64URL token segment, rejecting output larger than `max_size`
pub(crate) fn decode_bytes(segment: &str, max_size: usize) -> Result<Vec<u8>> {
    // Upper bound of the decoded size, checked before allocating
    let estimated = segment.len() / 4 * 3 + 3;
    if estimated > max_size + 3 {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: ~{estimated} bytes (max: {max_size})"
        )));
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64URL decode failed: {e}")))?;

    if decoded.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {max_size})",
            decoded.len()
        )));
    }

    Ok(decoded)
}
