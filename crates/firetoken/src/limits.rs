//! Size limit constants for input validation

use std::time::Duration;

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum length for key endpoint URLs (2048 characters)
pub(crate) const MAX_KEYS_URL_LENGTH: usize = 2048;

/// Maximum size for a key set response (512KB)
pub(crate) const MAX_KEYS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of keys in a published key set (100 keys)
pub(crate) const MAX_KEY_SET_SIZE: usize = 100;

// ============================================================================
// Decoded payload size limits
// ============================================================================

/// Maximum size for decoded JWT header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA signatures are 256-512 bytes for the key sizes in use
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for Base64URL-encoded signature string (1.5KB)
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1536;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for algorithm (alg) field in JWT header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for key ID (kid) field in JWT header (256 bytes)
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// Validation bounds
// ============================================================================

/// Maximum clock skew tolerance (300 seconds = 5 minutes)
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

// ============================================================================
// Key cache defaults
// ============================================================================

/// Lifetime of cached keys whose response carried no `max-age`
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

/// Number of keys held by the default cache
pub const DEFAULT_KEY_CACHE_CAPACITY: u64 = 1000;
