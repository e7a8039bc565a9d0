//! Token generation for integration tests
//!
//! Tokens are signed locally with the fixture keys, so every test gets a
//! cryptographically valid signature without a running identity platform.

#![allow(dead_code)]

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaKeyPair};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

pub const PROJECT_ID: &str = "firetoken-test";
pub const KEY_ID: &str = "kid1";

pub const SIGNING_KEY: &str = include_str!("../fixtures/signing.key.pem");
pub const SIGNING_CERT: &str = include_str!("../fixtures/signing.cert.pem");
pub const SIGNING_PUBLIC_KEY: &str = include_str!("../fixtures/signing.pub.pem");
pub const OTHER_KEY: &str = include_str!("../fixtures/other.key.pem");
pub const OTHER_CERT: &str = include_str!("../fixtures/other.cert.pem");

/// Builder for signed test tokens
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    header: Value,
    claims: Value,
    key: &'static str,
}

impl TokenBuilder {
    /// A valid ID token for [`PROJECT_ID`], signed with the signing key
    pub fn id_token() -> Self {
        Self::with_issuer(format!("https://securetoken.google.com/{PROJECT_ID}"))
    }

    /// A valid session cookie for [`PROJECT_ID`], signed with the signing key
    pub fn session_cookie() -> Self {
        Self::with_issuer(format!("https://session.firebase.google.com/{PROJECT_ID}"))
    }

    fn with_issuer(issuer: String) -> Self {
        let now = now();
        Self {
            header: json!({ "alg": "RS256", "kid": KEY_ID, "typ": "JWT" }),
            claims: json!({
                "iss": issuer,
                "aud": PROJECT_ID,
                "sub": "user-12345",
                "user_id": "user-12345",
                "auth_time": now - 120,
                "iat": now - 60,
                "exp": now + 3600,
            }),
            key: SIGNING_KEY,
        }
    }

    /// Set a claim
    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims[name] = value;
        self
    }

    /// Remove a claim
    pub fn without_claim(mut self, name: &str) -> Self {
        if let Some(claims) = self.claims.as_object_mut() {
            claims.remove(name);
        }
        self
    }

    /// Set a header field
    pub fn header(mut self, name: &str, value: Value) -> Self {
        self.header[name] = value;
        self
    }

    /// Remove a header field
    pub fn without_header(mut self, name: &str) -> Self {
        if let Some(header) = self.header.as_object_mut() {
            header.remove(name);
        }
        self
    }

    /// Sign with a different private key
    pub fn signed_with(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Encode and sign the token
    ///
    /// The signature scheme follows the header `alg`, RS256 when it names
    /// anything else.
    pub fn sign(self) -> String {
        let encoding: &'static dyn signature::RsaEncoding = match self.header["alg"].as_str() {
            Some("RS384") => &signature::RSA_PKCS1_SHA384,
            Some("RS512") => &signature::RSA_PKCS1_SHA512,
            _ => &signature::RSA_PKCS1_SHA256,
        };

        let signing_input = format!(
            "{}.{}",
            encode(&self.header),
            encode(&self.claims)
        );

        let der = pem::parse(self.key).expect("fixture key is PEM");
        let keypair = RsaKeyPair::from_pkcs8(der.contents()).expect("fixture key is PKCS#8");
        let mut signature = vec![0u8; keypair.public_modulus_len()];
        keypair
            .sign(
                encoding,
                &SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .expect("signing succeeds");

        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }
}

fn encode(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).expect("JSON serializes"))
}

/// Replace the signature of a token with another valid-looking one
pub fn corrupt_signature(token: &str) -> String {
    let (signing_input, _) = token.rsplit_once('.').expect("token has three parts");
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode([7u8; 256]))
}

/// Current Unix timestamp
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
