//! Verification of identity platform ID tokens and session cookies.
//!
//! ```rust,no_run
//! use firetoken::Verifier;
//!
//! # async fn run(token: &str) -> firetoken::Result<()> {
//! let verifier = Verifier::new("my-project");
//! let token = verifier.verify_id_token(token).await?;
//! println!("signed in: {:?}", token.subject());
//! # Ok(())
//! # }
//! ```

mod error;
mod keys;
mod token;
mod verifier;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod claims;
pub(crate) mod token_type;
pub(crate) mod url;
pub(crate) mod utils;

// Public Interface
pub use algorithm::AlgorithmType;
pub use error::{Error, Result};
pub use keys::cache::{KeyCache, MokaKeyCache};
pub use keys::http::HttpKeyStore;
pub use keys::{KeyStore, StaticKeyStore};
pub use limits::{DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_KEY_TTL};
pub use serde_json::Value;
pub use token::{IntoToken, Jwt, Token};
pub use token_type::{ID_TOKEN_KEYS_URL, SESSION_COOKIE_KEYS_URL, TokenType};
pub use verifier::Verifier;

pub(crate) mod limits;
