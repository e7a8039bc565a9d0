//! Tokens as consumed by the verifier
//!
//! The verifier only needs a few capabilities from a token: header and claim
//! lookup, an expiry predicate and signature verification against a key.
//! [`Token`] describes those capabilities; [`Jwt`] implements them for
//! compact-serialized JSON Web Tokens.

use crate::algorithm::AlgorithmType;
use crate::claims::timestamp;
use crate::error::{Error, Result};
use crate::keys::pem::public_key_der;
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE,
    MAX_DECODED_SIGNATURE_SIZE, MAX_KID_LENGTH, MAX_SIGNATURE_B64_SIZE, MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;
use crate::utils::bounds::validate_field_size;
use serde_json::{Map, Value};

/// Capabilities the verifier requires from a token
pub trait Token {
    /// Header value by name
    fn header(&self, name: &str) -> Option<&Value>;

    /// Claim value by name
    fn claim(&self, name: &str) -> Option<&Value>;

    /// Whether the header field `name` is present, whatever its value
    fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Whether the claim `name` is present, whatever its value
    fn has_claim(&self, name: &str) -> bool {
        self.claim(name).is_some()
    }

    /// Whether `now` (seconds since Unix epoch) is past the `exp` claim
    ///
    /// Tokens without a numeric `exp` never expire by this predicate.
    fn is_expired(&self, now: i64) -> bool {
        self.claim("exp")
            .and_then(timestamp)
            .is_some_and(|exp| now > exp)
    }

    /// Verify the token signature with `algorithm` against PEM key material
    ///
    /// Returns `Ok(false)` when the signature does not match, and an error
    /// when verification could not be carried out at all.
    fn verify(&self, algorithm: &AlgorithmType, key: &str) -> Result<bool>;
}

/// Conversion into a token the verifier can check
///
/// Raw strings are parsed into a [`Jwt`]; parsed tokens are passed through.
pub trait IntoToken {
    type Token: Token;

    fn into_token(self) -> Result<Self::Token>;
}

impl IntoToken for &str {
    type Token = Jwt;

    fn into_token(self) -> Result<Jwt> {
        Jwt::parse(self)
    }
}

impl IntoToken for &String {
    type Token = Jwt;

    fn into_token(self) -> Result<Jwt> {
        Jwt::parse(self)
    }
}

impl IntoToken for String {
    type Token = Jwt;

    fn into_token(self) -> Result<Jwt> {
        Jwt::parse(&self)
    }
}

impl IntoToken for Jwt {
    type Token = Jwt;

    fn into_token(self) -> Result<Jwt> {
        Ok(self)
    }
}

/// A parsed, not yet verified, JSON Web Token
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    raw: String,
    header: Map<String, Value>,
    claims: Map<String, Value>,
}

impl Jwt {
    /// Parse a compact-serialized token
    pub fn parse(token: &str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        let payload_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        let signature_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        if parts.next().is_some() {
            return Err(Error::FormatInvalid);
        }

        if signature_b64.len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::SignatureB64TooLarge {
                size: signature_b64.len(),
                max: MAX_SIGNATURE_B64_SIZE,
            });
        }

        let header = decode_object(header_b64, MAX_DECODED_HEADER_SIZE, "header")?;

        if let Some(Value::String(alg)) = header.get("alg") {
            validate_field_size("alg", alg, MAX_ALG_LENGTH)?;
        }
        if let Some(Value::String(kid)) = header.get("kid") {
            validate_field_size("kid", kid, MAX_KID_LENGTH)?;
        }

        let claims = decode_object(payload_b64, MAX_DECODED_PAYLOAD_SIZE, "payload")?;

        Ok(Self {
            raw: token.to_string(),
            header,
            claims,
        })
    }

    /// The token as it was parsed
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All header fields
    pub fn headers(&self) -> &Map<String, Value> {
        &self.header
    }

    /// All claims
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Subject (`sub`), the user id for identity platform tokens
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    /// Issuer (`iss`)
    pub fn issuer(&self) -> Option<&str> {
        self.claims.get("iss").and_then(Value::as_str)
    }

    /// Key id (`kid`) from the header
    pub fn key_id(&self) -> Option<&str> {
        self.header.get("kid").and_then(Value::as_str)
    }

    fn signing_input(&self) -> &str {
        self.raw
            .rsplit_once('.')
            .map_or(self.raw.as_str(), |(input, _)| input)
    }

    fn signature_b64(&self) -> &str {
        self.raw
            .rsplit_once('.')
            .map_or("", |(_, signature)| signature)
    }
}

impl Token for Jwt {
    fn header(&self, name: &str) -> Option<&Value> {
        self.header.get(name)
    }

    fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    fn verify(&self, algorithm: &AlgorithmType, key: &str) -> Result<bool> {
        // The signer decides the algorithm, never the token
        let header_alg = self
            .header
            .get("alg")
            .and_then(Value::as_str)
            .and_then(|alg| AlgorithmType::from_str(alg).ok());
        if header_alg != Some(*algorithm) {
            return Ok(false);
        }

        let key_der = public_key_der(key)?;
        let signature = base64url::decode_bytes(self.signature_b64(), MAX_DECODED_SIGNATURE_SIZE)?;

        Ok(algorithm.verify_signature(self.signing_input(), &signature, &key_der))
    }
}

/// Decode a Base64URL segment holding a JSON object
fn decode_object(segment: &str, max_size: usize, part: &str) -> Result<Map<String, Value>> {
    let json = base64url::decode_bytes(segment, max_size)?;

    match serde_json::from_slice(&json) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Error::FormatInvalidJson(format!(
            "Failed to parse {part}: not a JSON object"
        ))),
        Err(e) => Err(Error::FormatInvalidJson(format!(
            "Failed to parse {part}: {e}"
        ))),
    }
}
