use crate::cache::{CacheError, CacheStrategy, SitemapCache};
use crate::content::ContentError;
use crate::filter::ContentFilter;
use crate::sitemap::{SitemapDocument, SitemapError, SitemapGenerator};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SitemapServiceError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Sitemap(#[from] SitemapError),
}

/// Per-request sitemap orchestration: check cache, regenerate on a miss, hand back the
/// document.
///
/// Shared by every request task, so it holds no per-request state. The only mutable thing
/// it touches is the cache slot, which the [`CacheStrategy`] hands out per request.
pub struct SitemapService {
    filter: ContentFilter,
    generator: SitemapGenerator,
    cache: CacheStrategy,
    // single-flight lock for shared caches, None disables it
    regeneration: Option<Mutex<()>>,
}

impl SitemapService {
    pub fn new(filter: ContentFilter, generator: SitemapGenerator, cache: CacheStrategy) -> Self {
        let regeneration = cache.is_shared().then(|| Mutex::new(()));
        Self {
            filter,
            generator,
            cache,
            regeneration,
        }
    }

    /// Toggle at-most-one-regeneration-in-flight. Has no effect on per-request caches,
    /// which never share a slot.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.regeneration = (enabled && self.cache.is_shared()).then(|| Mutex::new(()));
        self
    }

    pub fn cache(&self) -> &CacheStrategy {
        &self.cache
    }

    pub async fn get_sitemap(&self) -> Result<Arc<SitemapDocument>, SitemapServiceError> {
        let cache = self.cache.cache_for_request();

        if let Some(document) = cached_document(cache.as_ref()) {
            debug!("sitemap served from cache ({} entries)", document.len());
            return Ok(document);
        }

        let _regeneration_guard = match &self.regeneration {
            Some(lock) => {
                let guard = lock.lock().await;
                // another request may have finished regenerating while we waited
                if let Some(document) = cached_document(cache.as_ref()) {
                    debug!("sitemap regenerated by a concurrent request");
                    return Ok(document);
                }
                Some(guard)
            }
            None => None,
        };

        // read before the content so an invalidation during regeneration is not lost
        let generation = cache.generation();
        let started = Instant::now();
        let content = self.filter.get_content().await?;
        let document = Arc::new(self.generator.generate(&content));

        if !cache.insert_if_current(document.clone(), generation) {
            debug!("content changed while regenerating, next request regenerates again");
        }

        info!(
            "sitemap regenerated: {} eligible nodes, {} entries in {:?}",
            content.len(),
            document.len(),
            started.elapsed()
        );

        Ok(document)
    }

    /// The full response body. Serialized into memory before anything reaches the client.
    pub async fn render_sitemap(&self) -> Result<Vec<u8>, SitemapServiceError> {
        let document = self.get_sitemap().await?;
        Ok(document.to_xml_bytes()?)
    }
}

fn cached_document(cache: &dyn SitemapCache) -> Option<Arc<SitemapDocument>> {
    if !cache.is_in_cache() {
        return None;
    }

    match cache.retrieve() {
        Ok(document) => Some(document),
        // evicted between the check and the read, regenerate like any other miss
        Err(CacheError::NotFound) => {
            debug!("sitemap evicted between cache check and retrieve");
            None
        }
    }
}
