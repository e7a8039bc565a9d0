//! Claim checks for identity platform tokens
//!
//! Each check inspects one claim and reports the first problem it finds. The
//! verifier runs them in a fixed order: expiry, authentication time, issued
//! at, issuer.

use crate::error::{Error, Result};
use crate::token::Token;
use crate::utils::bounds::apply_clock_skew;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Read a timestamp (seconds since Unix epoch) from a JSON number
///
/// Fractional timestamps are truncated.
pub(crate) fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|seconds| seconds.trunc() as i64))
}

/// Read a required timestamp claim
fn required_timestamp(token: &impl Token, name: &str) -> Result<i64> {
    let value = token
        .claim(name)
        .ok_or_else(|| Error::InvalidToken(format!("The claim \"{name}\" is missing")))?;

    timestamp(value)
        .ok_or_else(|| Error::InvalidToken(format!("The claim \"{name}\" is not a timestamp")))
}

/// The token must carry `exp` and must not be expired
pub(crate) fn check_expiry(token: &impl Token, now: i64, leeway: u64) -> Result<()> {
    let expired_at = required_timestamp(token, "exp")?;

    if token.is_expired(apply_clock_skew(now, leeway, false)?) {
        return Err(Error::ExpiredToken { expired_at, now });
    }

    Ok(())
}

/// The user must have authenticated in the past
pub(crate) fn check_auth_time(token: &impl Token, now: i64, leeway: u64) -> Result<()> {
    let auth_time = required_timestamp(token, "auth_time")?;

    if auth_time > apply_clock_skew(now, leeway, true)? {
        return Err(Error::InvalidToken(
            "The user's authentication time must be in the past".into(),
        ));
    }

    Ok(())
}

/// The token must not have been issued in the future
pub(crate) fn check_issued_at(token: &impl Token, now: i64, leeway: u64) -> Result<()> {
    let issued_at = required_timestamp(token, "iat")?;

    if issued_at > apply_clock_skew(now, leeway, true)? {
        return Err(Error::IssuedInTheFuture { issued_at, now });
    }

    Ok(())
}

/// The issuer must match the expected one exactly
pub(crate) fn check_issuer(token: &impl Token, expected: &str) -> Result<()> {
    let issuer = token
        .claim("iss")
        .ok_or_else(|| Error::InvalidToken("The claim \"iss\" is missing".into()))?;

    if issuer.as_str() != Some(expected) {
        return Err(Error::InvalidToken("This token has an invalid issuer".into()));
    }

    Ok(())
}

/// Get current Unix timestamp
pub(crate) fn current_timestamp() -> i64 {
    unix_timestamp(SystemTime::now())
}

/// Seconds since Unix epoch, clamped to 0 for clocks set before it
fn unix_timestamp(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(e) => {
            tracing::warn!(
                behind = ?e.duration(),
                "system clock is before the Unix epoch, using 0"
            );
            0
        }
    }
}
