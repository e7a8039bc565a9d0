//! Key resolution: turning a key id into public key material
pub(crate) mod cache;
pub(crate) mod http;
pub(crate) mod pem;

use crate::error::{Error, Result};
use crate::token_type::TokenType;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves key ids to public key material
///
/// `get` must fail with [`Error::KeyNotFound`] when the key set for the
/// token type does not contain `key_id`. Every other failure is reported
/// as-is by the verifier.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Fetch the key material (PEM) for `key_id`
    async fn get(&self, key_id: &str, token_type: TokenType) -> Result<String>;
}

#[async_trait]
impl<K: KeyStore + ?Sized> KeyStore for Arc<K> {
    async fn get(&self, key_id: &str, token_type: TokenType) -> Result<String> {
        (**self).get(key_id, token_type).await
    }
}

/// Compose the cache key for a key id
///
/// The token type is part of the key so colliding key ids published for
/// different token types never share an entry.
pub(crate) fn cache_key(token_type: TokenType, key_id: &str) -> String {
    format!("{}::{key_id}", token_type.as_str())
}

/// Key store serving a fixed set of keys from memory
///
/// Useful for offline verification against keys distributed out of band.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyStore {
    keys: HashMap<TokenType, HashMap<String, String>>,
}

impl StaticKeyStore {
    /// Create an empty key store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key for a token type
    pub fn insert(
        &mut self,
        token_type: TokenType,
        key_id: impl Into<String>,
        key: impl Into<String>,
    ) -> &mut Self {
        self.keys
            .entry(token_type)
            .or_default()
            .insert(key_id.into(), key.into());
        self
    }

    /// Configure key store
    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

#[async_trait]
impl KeyStore for StaticKeyStore {
    async fn get(&self, key_id: &str, token_type: TokenType) -> Result<String> {
        self.keys
            .get(&token_type)
            .and_then(|keys| keys.get(key_id))
            .filter(|key| !key.is_empty())
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(key_id.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key(TokenType::IdToken, "abc"), "idToken::abc");
        assert_eq!(
            cache_key(TokenType::SessionCookie, "abc"),
            "sessionCookie::abc"
        );
    }

    #[tokio::test]
    async fn test_static_key_store() {
        let store = StaticKeyStore::new()
            .insert(TokenType::IdToken, "kid1", "K1")
            .insert(TokenType::SessionCookie, "kid2", "K2")
            .build();

        assert_eq!(store.get("kid1", TokenType::IdToken).await, Ok("K1".into()));
        assert_eq!(
            store.get("kid2", TokenType::SessionCookie).await,
            Ok("K2".into())
        );
    }

    #[tokio::test]
    async fn test_static_key_store_separates_token_types() {
        let store = StaticKeyStore::new()
            .insert(TokenType::IdToken, "kid1", "K1")
            .build();

        assert_eq!(
            store.get("kid1", TokenType::SessionCookie).await,
            Err(Error::KeyNotFound("kid1".into()))
        );
    }

    #[tokio::test]
    async fn test_static_key_store_empty_key_is_not_found() {
        let store = StaticKeyStore::new()
            .insert(TokenType::IdToken, "kid1", "")
            .build();

        assert_eq!(
            store.get("kid1", TokenType::IdToken).await,
            Err(Error::KeyNotFound("kid1".into()))
        );
    }

    #[tokio::test]
    async fn test_shared_key_store() {
        let store = Arc::new(
            StaticKeyStore::new()
                .insert(TokenType::IdToken, "kid1", "K1")
                .build(),
        );

        assert_eq!(store.get("kid1", TokenType::IdToken).await, Ok("K1".into()));
    }
}
