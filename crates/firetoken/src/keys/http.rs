//! Key store fetching published keys over HTTP

use crate::error::{Error, Result};
use crate::keys::cache::{KeyCache, MokaKeyCache};
use crate::keys::{KeyStore, cache_key};
use crate::limits::{MAX_KEY_SET_SIZE, MAX_KEYS_RESPONSE_SIZE};
use crate::token_type::TokenType;
use crate::url::validate_keys_url;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CACHE_CONTROL;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

// Constant pattern, asserted to compile in tests. `None` would only disable
// TTL extraction, leaving entries to the cache's fallback TTL.
static MAX_AGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)max-age=(\d+)").ok());

/// Response of a key endpoint
struct KeySetResponse {
    body: Vec<u8>,
    cache_control: Option<String>,
}

/// Key store backed by the identity platform's key endpoints
///
/// Keys are cached per token type and key id for as long as the endpoint's
/// `Cache-Control: max-age` allows. Entries from responses without a
/// `max-age` are left to the cache's own policy.
#[derive(Clone)]
pub struct HttpKeyStore {
    client: reqwest::Client,
    cache: Arc<dyn KeyCache>,
    id_token_url: String,
    session_cookie_url: String,
}

impl HttpKeyStore {
    /// Create a key store using the published endpoints and an in-process cache
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache: Arc::new(MokaKeyCache::default()),
            id_token_url: TokenType::IdToken.keys_url().into(),
            session_cookie_url: TokenType::SessionCookie.keys_url().into(),
        }
    }

    /// Configure the HTTP client used for key fetches
    ///
    /// Timeouts and proxies are configured on the client.
    pub fn client(&mut self, client: reqwest::Client) -> &mut Self {
        self.client = client;
        self
    }

    /// Configure the key cache
    ///
    /// The cache is wrapped internally in `Arc` to allow sharing across key store clones.
    pub fn cache(&mut self, cache: impl KeyCache + 'static) -> &mut Self {
        self.cache = Arc::new(cache);
        self
    }

    /// Configure the endpoint publishing keys for a token type
    pub fn endpoint(&mut self, token_type: TokenType, url: impl Into<String>) -> &mut Self {
        match token_type {
            TokenType::IdToken => self.id_token_url = url.into(),
            TokenType::SessionCookie => self.session_cookie_url = url.into(),
        }
        self
    }

    /// Configure key store
    pub fn build(&mut self) -> Self {
        self.clone()
    }

    fn keys_url(&self, token_type: TokenType) -> &str {
        match token_type {
            TokenType::IdToken => &self.id_token_url,
            TokenType::SessionCookie => &self.session_cookie_url,
        }
    }

    async fn fetch_key_set(&self, url: &str) -> Result<KeySetResponse> {
        let url = validate_keys_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::RemoteError(format!(
                "http: status {}",
                response.status()
            )));
        }

        let cache_control = response
            .headers()
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::RemoteError(format!("network: {e}")))?
            .to_vec();

        // Validate response size before parsing to prevent resource exhaustion
        if body.len() > MAX_KEYS_RESPONSE_SIZE {
            return Err(Error::RemoteResponseTooLarge {
                size: body.len(),
                max: MAX_KEYS_RESPONSE_SIZE,
            });
        }

        Ok(KeySetResponse {
            body,
            cache_control: (!cache_control.is_empty()).then_some(cache_control),
        })
    }
}

impl Default for HttpKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyStore for HttpKeyStore {
    async fn get(&self, key_id: &str, token_type: TokenType) -> Result<String> {
        let cache_key = cache_key(token_type, key_id);

        if let Some(key) = self.cache.get(&cache_key).await.filter(|k| !k.is_empty()) {
            tracing::debug!(%token_type, key_id, "key cache hit");
            return Ok(key);
        }

        let url = self.keys_url(token_type);
        tracing::debug!(%token_type, key_id, url, "key cache miss, fetching key set");

        let response = self.fetch_key_set(url).await?;
        let keys = parse_key_set(&response.body)?;

        let key = match keys.get(key_id) {
            Some(Value::String(key)) if !key.is_empty() => key.clone(),
            _ => return Err(Error::KeyNotFound(key_id.into())),
        };

        let ttl = response.cache_control.as_deref().and_then(max_age);
        tracing::debug!(%token_type, key_id, ?ttl, "caching fetched key");

        self.cache.set(cache_key, key.clone(), ttl).await;

        Ok(key)
    }
}

/// Parse a key set body: a JSON object mapping key ids to key material
///
/// An empty JSON array is an empty key set.
fn parse_key_set(body: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| Error::RemoteError("keys: invalid key set json".into()))?;

    let keys = match value {
        Value::Object(keys) => keys,
        Value::Array(items) if items.is_empty() => Map::new(),
        _ => {
            return Err(Error::RemoteError(
                "keys: key set is not a JSON object".into(),
            ));
        }
    };

    if keys.len() > MAX_KEY_SET_SIZE {
        return Err(Error::RemoteKeySetTooLarge {
            key_count: keys.len(),
            max: MAX_KEY_SET_SIZE,
        });
    }

    Ok(keys)
}

/// Extract the `max-age` directive from a Cache-Control header value
fn max_age(cache_control: &str) -> Option<Duration> {
    MAX_AGE
        .as_ref()?
        .captures(cache_control)
        .and_then(|captures| captures.get(1))
        .and_then(|seconds| seconds.as_str().parse::<u64>().ok())
        .map(Duration::from_secs)
}
