use crate::cache::{CacheError, SitemapCache};
use crate::sitemap::SitemapDocument;
use parking_lot::Mutex;
use std::sync::Arc;

// owned by exactly one request, so there is never contention on the lock
#[derive(Default)]
pub struct RequestScopedCache {
    slot: Mutex<Option<Arc<SitemapDocument>>>,
}

impl RequestScopedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SitemapCache for RequestScopedCache {
    fn is_in_cache(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn insert(&self, document: Arc<SitemapDocument>) {
        *self.slot.lock() = Some(document);
    }

    fn retrieve(&self) -> Result<Arc<SitemapDocument>, CacheError> {
        self.slot.lock().clone().ok_or(CacheError::NotFound)
    }

    fn invalidate(&self) {
        self.slot.lock().take();
    }
}
