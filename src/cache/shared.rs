use crate::cache::{CacheError, SitemapCache};
use crate::sitemap::SitemapDocument;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct CachedSitemap {
    document: Arc<SitemapDocument>,
    inserted_at: Instant,
}

/// Process-wide sitemap slot.
///
/// The document and its insert time are swapped in as one unit, so readers see either the
/// old sitemap or the new one, never a mix. With a TTL, the slot reports a miss once the
/// document is older than the TTL; without one it stays valid until [`invalidate`].
///
/// Every invalidation bumps a generation counter. A regeneration that started before the
/// invalidation carries the old generation and its [`insert_if_current`] is dropped, so a
/// document built from stale content never lands in the slot.
///
/// [`invalidate`]: SitemapCache::invalidate
/// [`insert_if_current`]: SitemapCache::insert_if_current
pub struct SharedCache {
    slot: ArcSwapOption<CachedSitemap>,
    ttl: Option<Duration>,
    // writers hold this while touching the slot; readers only load the slot
    generation: Mutex<u64>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            ttl: None,
            generation: Mutex::new(0),
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            ttl: Some(ttl),
            generation: Mutex::new(0),
        }
    }

    fn store(&self, document: Arc<SitemapDocument>) {
        self.slot.store(Some(Arc::new(CachedSitemap {
            document,
            inserted_at: Instant::now(),
        })));
    }

    fn is_fresh(&self, cached: &CachedSitemap) -> bool {
        match self.ttl {
            Some(ttl) => cached.inserted_at.elapsed() < ttl,
            None => true,
        }
    }
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapCache for SharedCache {
    fn is_in_cache(&self) -> bool {
        self.slot
            .load()
            .as_ref()
            .is_some_and(|cached| self.is_fresh(cached))
    }

    fn insert(&self, document: Arc<SitemapDocument>) {
        let _generation = self.generation.lock();
        self.store(document);
    }

    // expiry is only judged by is_in_cache; a document that expires between the check and
    // this call is still returned so one orchestration pass sees a consistent slot
    fn retrieve(&self) -> Result<Arc<SitemapDocument>, CacheError> {
        self.slot
            .load()
            .as_ref()
            .map(|cached| cached.document.clone())
            .ok_or(CacheError::NotFound)
    }

    fn invalidate(&self) {
        let mut generation = self.generation.lock();
        *generation += 1;
        if self.slot.swap(None).is_some() {
            debug!("sitemap cache invalidated (generation {})", *generation);
        }
    }

    fn generation(&self) -> u64 {
        *self.generation.lock()
    }

    fn insert_if_current(&self, document: Arc<SitemapDocument>, generation: u64) -> bool {
        let current = self.generation.lock();
        if *current != generation {
            debug!(
                "sitemap cache invalidated during regeneration ({} -> {}), not storing",
                generation, *current
            );
            return false;
        }
        self.store(document);
        true
    }
}
