use crate::algorithm::AlgorithmType;
use crate::claims::{
    check_auth_time, check_expiry, check_issued_at, check_issuer, current_timestamp,
};
use crate::error::{Error, Result};
use crate::keys::KeyStore;
use crate::keys::http::HttpKeyStore;
use crate::limits::MAX_CLOCK_SKEW_SECONDS;
use crate::token::{IntoToken, Token};
use crate::token_type::TokenType;
use serde_json::Value;

/// Verifier for ID tokens and session cookies of one project
///
/// The verifier is configured once and can be reused for any number of
/// tokens. Every verification checks the claims, resolves the signing key
/// and verifies the signature, in that order. When a claim check fails the
/// signature is still verified before the claim error is reported. Key store
/// failures other than a missing key are reported ahead of claim errors.
#[derive(Clone)]
pub struct Verifier<K: KeyStore = HttpKeyStore> {
    project_id: String,
    keys: K,
    algorithm: AlgorithmType,
    leeway_seconds: u64,
}

impl Verifier<HttpKeyStore> {
    /// Create a verifier fetching keys from the published key endpoints
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_key_store(project_id, HttpKeyStore::default())
    }
}

impl<K: KeyStore> Verifier<K> {
    /// Create a verifier resolving keys through `keys`
    pub fn with_key_store(project_id: impl Into<String>, keys: K) -> Self {
        Self {
            project_id: project_id.into(),
            keys,
            algorithm: AlgorithmType::default(),
            leeway_seconds: 0,
        }
    }

    /// Configure the signer algorithm
    pub fn algorithm(&mut self, algorithm: AlgorithmType) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    /// Configure clock skew tolerance for temporal claims
    ///
    /// # Security
    /// Leeway is limited to prevent effectively disabling expiration checks.
    /// Values above 300 seconds are rejected when verifying.
    pub fn leeway(&mut self, seconds: u64) -> &mut Self {
        self.leeway_seconds = seconds;
        self
    }

    /// The project tokens must be issued for
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Verify an ID token
    pub async fn verify_id_token<T: IntoToken>(&self, token: T) -> Result<T::Token> {
        self.verify(token, TokenType::IdToken).await
    }

    /// Verify a session cookie
    pub async fn verify_session_cookie<T: IntoToken>(&self, token: T) -> Result<T::Token> {
        self.verify(token, TokenType::SessionCookie).await
    }

    /// Verify a token of the given type
    ///
    /// Returns the token unmodified if it is authentic, fresh and issued for
    /// this project. Parse errors are returned as-is.
    pub async fn verify<T: IntoToken>(&self, token: T, token_type: TokenType) -> Result<T::Token> {
        self.validate_config()?;

        let token = token.into_token()?;
        let now = current_timestamp();

        let claims = self.check_claims(&token, token_type, now);
        let signature = self.resolve_and_verify(&token, token_type).await;

        // Key store failures first, then the first failed claim
        match signature.and_then(|signature| claims.and(signature)) {
            Ok(()) => {
                tracing::trace!(%token_type, "token verified");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(%token_type, error = %e, "token verification failed");
                Err(e)
            }
        }
    }

    fn validate_config(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::ConfigurationInvalid(
                "project id cannot be empty".into(),
            ));
        }

        if self.leeway_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ClockSkewTooLarge {
                value: self.leeway_seconds,
                max: MAX_CLOCK_SKEW_SECONDS,
            });
        }

        Ok(())
    }

    /// Run the claim checks in order and return the first failure
    fn check_claims(&self, token: &impl Token, token_type: TokenType, now: i64) -> Result<()> {
        let leeway = self.leeway_seconds;

        check_expiry(token, now, leeway)?;
        check_auth_time(token, now, leeway)?;
        check_issued_at(token, now, leeway)?;
        check_issuer(token, &token_type.issuer(&self.project_id))?;

        tracing::trace!(%token_type, "claims checked");
        Ok(())
    }

    /// Resolve the signing key by `kid` and verify the signature against it
    ///
    /// The outer error is a key store failure. The inner result is the
    /// token's own outcome: missing `kid`, unknown key or bad signature.
    async fn resolve_and_verify(
        &self,
        token: &impl Token,
        token_type: TokenType,
    ) -> Result<Result<()>> {
        let key_id = match token.header("kid") {
            Some(Value::String(kid)) => kid.as_str(),
            Some(_) => {
                return Ok(Err(Error::InvalidToken(
                    "The header \"kid\" is not a string".into(),
                )));
            }
            None => {
                return Ok(Err(Error::InvalidToken(
                    "The header \"kid\" is missing".into(),
                )));
            }
        };

        let key = match self.keys.get(key_id, token_type).await {
            Ok(key) => key,
            Err(e) if e.is_key_not_found() => return Ok(Err(Error::UnknownKey(key_id.into()))),
            Err(e) => return Err(e),
        };
        tracing::trace!(%token_type, key_id, "signing key resolved");

        Ok(match token.verify(&self.algorithm, &key) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::InvalidSignature(None)),
            Err(e) => Err(Error::InvalidSignature(Some(e.to_string()))),
        })
    }
}

impl<K: KeyStore + Clone> Verifier<K> {
    /// Configure verifier
    pub fn build(&mut self) -> Self {
        self.clone()
    }
}
