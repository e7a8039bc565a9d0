//! URL validation for key endpoints
//!
//! Endpoints can be overridden by configuration, so they are checked before
//! any request leaves the process.

use crate::error::{Error, Result};
use crate::limits::MAX_KEYS_URL_LENGTH;

/// Validate a key endpoint URL: non-empty, bounded, http(s), with a host
pub(crate) fn validate_keys_url(url: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::RemoteError("keys URL cannot be empty".into()));
    }

    if url.len() > MAX_KEYS_URL_LENGTH {
        return Err(Error::RemoteUrlTooLong {
            length: url.len(),
            max: MAX_KEYS_URL_LENGTH,
        });
    }

    let parsed = url
        .parse::<url::Url>()
        .map_err(|e| Error::RemoteError(format!("invalid keys URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::RemoteError(
            "keys URL must use http or https scheme".into(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(Error::RemoteError("keys URL must have a valid host".into()));
    }

    Ok(parsed)
}
