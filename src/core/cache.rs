//! Keyed JSON cache with expiry and stale-while-revalidate, usable for any
//! JSON retrieval. Storage failures never reach the caller; they degrade to
//! a cache miss.

use crate::adapters::{MemoryStore, SystemClock};
use crate::domain::ports::{CacheStore, Clock};
use crate::utils::error::{ContentError, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_TTL_MS: i64 = 5 * 60 * 1000;
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 512 * 1024;
const KEY_PREFIX: &str = "content-hub:json:";

/// How the outgoing request asks intermediaries to treat their own caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Default,
    NoStore,
    NoCache,
}

impl CacheMode {
    fn header_value(self) -> Option<&'static str> {
        match self {
            CacheMode::Default => None,
            CacheMode::NoStore => Some("no-store"),
            CacheMode::NoCache => Some("no-cache"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub ttl_ms: i64,
    pub cache_mode: CacheMode,
    /// Serve stale entries immediately and refresh them in the background.
    pub revalidate: bool,
    /// Skip cache read and write entirely.
    pub bypass_cache: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            cache_mode: CacheMode::Default,
            revalidate: true,
            bypass_cache: false,
        }
    }
}

impl FetchOptions {
    pub fn with_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn bypass() -> Self {
        Self {
            bypass_cache: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    saved_at: i64,
    value: Value,
}

#[derive(Clone)]
pub struct JsonCache {
    client: Client,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    asset_base: Option<Url>,
    origin: Option<Url>,
    max_entry_bytes: usize,
}

impl Default for JsonCache {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl JsonCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            client: Client::new(),
            store,
            clock: Arc::new(SystemClock),
            asset_base: None,
            origin: None,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_max_entry_bytes(mut self, max_entry_bytes: usize) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Base used first when resolving relative URLs (where the bundle lives).
    pub fn with_asset_base(mut self, base: &str) -> Result<Self> {
        self.asset_base = Some(parse_base("cache.asset_base", base)?);
        Ok(self)
    }

    /// Site origin, used for root-relative resolution.
    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        self.origin = Some(parse_base("cache.origin", origin)?);
        Ok(self)
    }

    /// Normalizes a request URL to the absolute form used as cache key:
    /// asset base, then origin, then root-relative path, then the raw input.
    pub fn resolve_url(&self, url: &str) -> String {
        let raw = url.trim();
        if let Ok(absolute) = Url::parse(raw) {
            return absolute.to_string();
        }

        let clean = raw.trim_start_matches('/');
        if clean.is_empty() {
            return raw.to_string();
        }

        if let Some(resolved) = self.asset_base.as_ref().and_then(|base| base.join(clean).ok()) {
            return resolved.to_string();
        }
        if let Some(resolved) = self
            .origin
            .as_ref()
            .and_then(|origin| origin.join(&format!("/{}", clean)).ok())
        {
            return resolved.to_string();
        }
        format!("/{}", clean)
    }

    fn cache_key(resolved: &str) -> String {
        format!("{}{}", KEY_PREFIX, resolved)
    }

    pub async fn fetch_json(&self, url: &str, options: &FetchOptions) -> Result<Value> {
        let resolved = self.resolve_url(url);
        if options.bypass_cache {
            return self.fetch_network(&resolved, options.cache_mode).await;
        }

        let key = Self::cache_key(&resolved);
        if let Some(entry) = self.read_entry(&key) {
            let age = self.clock.now_ms() - entry.saved_at;
            if age <= options.ttl_ms {
                tracing::debug!("💾 Cache hit for {} (age {}ms)", resolved, age);
                return Ok(entry.value);
            }
            if options.revalidate {
                tracing::debug!("💾 Serving stale {} (age {}ms), refreshing", resolved, age);
                self.spawn_refresh(resolved, key, options.cache_mode);
                return Ok(entry.value);
            }
            tracing::debug!("💾 Cache entry for {} expired", resolved);
        }

        let value = self.fetch_network(&resolved, options.cache_mode).await?;
        self.write_entry(&key, &value);
        Ok(value)
    }

    /// Always hits the network and recaches the result (unless bypassing);
    /// every failure yields `None`.
    pub async fn warm_json(&self, url: &str, options: &FetchOptions) -> Option<Value> {
        let resolved = self.resolve_url(url);
        match self.fetch_network(&resolved, options.cache_mode).await {
            Ok(value) => {
                if !options.bypass_cache {
                    self.write_entry(&Self::cache_key(&resolved), &value);
                }
                Some(value)
            }
            Err(e) => {
                tracing::debug!("Warm-up of {} failed: {}", resolved, e);
                None
            }
        }
    }

    fn spawn_refresh(&self, resolved: String, key: String, cache_mode: CacheMode) {
        let cache = self.clone();
        tokio::spawn(async move {
            match cache.fetch_network(&resolved, cache_mode).await {
                Ok(value) => cache.write_entry(&key, &value),
                Err(e) => tracing::debug!("Background refresh of {} failed: {}", resolved, e),
            }
        });
    }

    async fn fetch_network(&self, url: &str, cache_mode: CacheMode) -> Result<Value> {
        let mut request = self.client.get(url);
        if let Some(directive) = cache_mode.header_value() {
            request = request.header(CACHE_CONTROL, directive);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    fn read_entry(&self, key: &str) -> Option<CacheEntry> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("⚠️ Cache read failed, treating as miss: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Dropping corrupt cache entry {}: {}", key, e);
                if let Err(e) = self.store.remove(key) {
                    tracing::warn!("⚠️ Failed to remove corrupt cache entry: {}", e);
                }
                None
            }
        }
    }

    fn write_entry(&self, key: &str, value: &Value) {
        let entry = CacheEntry {
            saved_at: self.clock.now_ms(),
            value: value.clone(),
        };

        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("⚠️ Failed to serialize cache entry: {}", e);
                return;
            }
        };

        if serialized.len() > self.max_entry_bytes {
            tracing::debug!(
                "Not caching {} ({} bytes exceeds {} byte limit)",
                key,
                serialized.len(),
                self.max_entry_bytes
            );
            return;
        }

        if let Err(e) = self.store.set(key, &serialized) {
            tracing::warn!("⚠️ Cache write failed, continuing without cache: {}", e);
        }
    }
}

fn parse_base(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| ContentError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
