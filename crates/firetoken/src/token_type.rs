//! Token types issued by the identity platform

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Published keys for ID tokens (X.509 certificates keyed by kid)
pub const ID_TOKEN_KEYS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

/// Published keys for session cookies
pub const SESSION_COOKIE_KEYS_URL: &str =
    "https://www.googleapis.com/identitytoolkit/v3/relyingparty/publicKeys";

/// Kind of token being verified
///
/// Selects both the endpoint the signing keys are fetched from and the
/// issuer the token must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    IdToken,
    SessionCookie,
}

impl TokenType {
    /// Name used in cache keys and error messages
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenType::IdToken => "idToken",
            TokenType::SessionCookie => "sessionCookie",
        }
    }

    /// Endpoint publishing the signing keys for this token type
    pub const fn keys_url(&self) -> &'static str {
        match self {
            TokenType::IdToken => ID_TOKEN_KEYS_URL,
            TokenType::SessionCookie => SESSION_COOKIE_KEYS_URL,
        }
    }

    /// Issuer a token of this type must carry for the given project
    pub fn issuer(&self, project_id: &str) -> String {
        match self {
            TokenType::IdToken => format!("https://securetoken.google.com/{project_id}"),
            TokenType::SessionCookie => {
                format!("https://session.firebase.google.com/{project_id}")
            }
        }
    }
}

impl FromStr for TokenType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "idToken" => Ok(TokenType::IdToken),
            "sessionCookie" => Ok(TokenType::SessionCookie),
            other => Err(Error::InvalidTokenType(other.into())),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
