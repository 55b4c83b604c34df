//! Single-slot storage for the generated sitemap.
//!
//! The [`SitemapCache`] trait hides *when* a sitemap becomes stale. Two strategies ship:
//! a slot that lives for one request ([`RequestScopedCache`]) and a process-wide slot with
//! optional TTL and manual invalidation ([`SharedCache`]). [`CacheStrategy`] picks one at
//! construction time and hands each request the slot it should use.

use crate::sitemap::SitemapDocument;
use std::sync::Arc;
use std::time::Duration;

pub mod request;
pub mod shared;

pub use self::request::RequestScopedCache;
pub use self::shared::SharedCache;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    /// `retrieve` was called on an empty slot. Callers must check `is_in_cache` first.
    #[error("no sitemap in cache")]
    NotFound,
}

pub trait SitemapCache: Send + Sync {
    /// True iff a document occupies the slot and has not expired.
    fn is_in_cache(&self) -> bool;

    /// Store `document`, replacing whatever was there and restarting its validity.
    fn insert(&self, document: Arc<SitemapDocument>);

    fn retrieve(&self) -> Result<Arc<SitemapDocument>, CacheError>;

    /// Empty the slot. The next request regenerates.
    fn invalidate(&self);

    /// Counter bumped by every [`invalidate`](SitemapCache::invalidate).
    ///
    /// Slots that are never invalidated from outside stay at 0.
    fn generation(&self) -> u64 {
        0
    }

    /// Store `document` only if no invalidation happened since `generation` was read.
    /// Returns whether the document was stored.
    fn insert_if_current(&self, document: Arc<SitemapDocument>, generation: u64) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.insert(document);
        true
    }
}

#[derive(Clone)]
pub enum CacheStrategy {
    /// Every request starts with an empty slot.
    PerRequest,
    /// One slot shared by all requests.
    Shared(Arc<SharedCache>),
}

impl CacheStrategy {
    pub fn per_request() -> Self {
        Self::PerRequest
    }

    /// Process-wide slot that lives until invalidated.
    pub fn shared() -> Self {
        Self::Shared(Arc::new(SharedCache::new()))
    }

    /// Process-wide slot that also expires `ttl` after each insert.
    pub fn shared_with_ttl(ttl: Duration) -> Self {
        Self::Shared(Arc::new(SharedCache::with_ttl(ttl)))
    }

    /// The slot a single request should use.
    pub fn cache_for_request(&self) -> Arc<dyn SitemapCache> {
        match self {
            Self::PerRequest => Arc::new(RequestScopedCache::new()) as Arc<dyn SitemapCache>,
            Self::Shared(cache) => cache.clone() as Arc<dyn SitemapCache>,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Drop the shared document, if any. Per-request slots have nothing to invalidate.
    pub fn invalidate(&self) {
        if let Self::Shared(cache) = self {
            cache.invalidate();
        }
    }
}
