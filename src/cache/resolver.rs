//! Cached Resolver Module
//!
//! Memoizes resolved payloads (processed image URLs, fetched image bytes)
//! in a shared byte cache.

use std::future::Future;

use tracing::{debug, warn};

use crate::cache::{Payload, SharedByteCache};

// == Payload Source ==
/// Produces the payload for a key on a cache miss.
pub trait PayloadSource: Send + Sync {
    fn fetch(&self, key: &str) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

// == Cached Resolver ==
/// Resolves keys through the cache, falling back to a [`PayloadSource`].
///
/// The cache lock is released while the source runs.
#[derive(Debug)]
pub struct CachedResolver<S> {
    cache: SharedByteCache,
    source: S,
    /// Returned when the source fails, if set
    fallback: Option<Payload>,
}

impl<S: PayloadSource> CachedResolver<S> {
    pub fn new(cache: SharedByteCache, source: S) -> Self {
        Self {
            cache,
            source,
            fallback: None,
        }
    }

    /// Payload served when the source fails (e.g. a default profile image).
    pub fn with_fallback(mut self, fallback: impl Into<Vec<u8>>) -> Self {
        self.fallback = Some(Payload::from(fallback.into()));
        self
    }

    pub fn cache(&self) -> &SharedByteCache {
        &self.cache
    }

    // == Resolve ==
    /// Returns the cached payload for `key`, fetching and caching it on a miss.
    ///
    /// A payload too large to cache is still returned. Source errors yield
    /// the fallback when one is configured.
    pub async fn resolve(&self, key: &str) -> anyhow::Result<Payload> {
        let cached = self.cache.write().await.get(key);
        if let Some(payload) = cached {
            debug!(key, "Resolved from cache");
            return Ok(payload);
        }

        match self.source.fetch(key).await {
            Ok(bytes) => {
                let payload = Payload::from(bytes);
                let stored = self
                    .cache
                    .write()
                    .await
                    .set_shared(key.to_string(), payload.clone());
                if let Err(e) = stored {
                    warn!(key, error = %e, "Resolved payload was not cached");
                }
                Ok(payload)
            }
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    warn!(key, error = %e, "Payload source failed, serving fallback");
                    Ok(fallback.clone())
                }
                None => Err(e.context(format!("failed to resolve '{key}'"))),
            },
        }
    }
}
