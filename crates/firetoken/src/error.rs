//! Errors for firetoken

use thiserror::Error;

/// Firetoken Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Token Type Errors
    // ============================================================================
    #[error("A token type of \"{0}\" could not be found")]
    InvalidTokenType(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("Key with ID \"{0}\" not found")]
    KeyNotFound(String),

    #[error("The token was signed with an unknown key \"{0}\"")]
    UnknownKey(String),

    #[error("Invalid key material: {0}")]
    KeyFormatInvalid(String),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired at {expired_at} (now: {now})")]
    ExpiredToken { expired_at: i64, now: i64 },

    #[error("Token issued in future at {issued_at} (now: {now})")]
    IssuedInTheFuture { issued_at: i64, now: i64 },

    #[error("Signature verification failed{}", .0.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    InvalidSignature(Option<String>),

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid JWT format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Signature Base64URL string too large: {size} bytes (maximum: {max} bytes)")]
    SignatureB64TooLarge { size: usize, max: usize },

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Remote URL too long: {length} characters (maximum: {max} characters)")]
    RemoteUrlTooLong { length: usize, max: usize },

    #[error("Remote response too large: {size} bytes (maximum: {max} bytes)")]
    RemoteResponseTooLarge { size: usize, max: usize },

    #[error("Remote key set too large: {key_count} keys (maximum: {max} keys)")]
    RemoteKeySetTooLarge { key_count: usize, max: usize },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Clock skew too large: {value} seconds (maximum: {max} seconds)")]
    ClockSkewTooLarge { value: u64, max: u64 },

    #[error("Integer overflow in timestamp arithmetic")]
    TimestampOverflow,
}

impl Error {
    /// Whether this error reports a key id missing from an otherwise valid key set
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound(_))
    }
}

/// Result type alias for firetoken operations
pub type Result<T> = std::result::Result<T, Error>;
