use crate::domain::ContentNode;
use crate::sitemap::optimize::{DeduplicateUrls, MaxBytes, MaxEntries, SitemapOptimizer};
use crate::sitemap::{
    MAX_SITEMAP_BYTES, MAX_SITEMAP_ENTRIES, PageEntry, SitemapDocument, SitemapEntry,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns eligible content into a finished [`SitemapDocument`].
///
/// Generation has two phases: raw assembly (one entry per node, bad URLs skipped) and the
/// optimizer chain, which always runs before the document is handed out.
pub struct SitemapGenerator {
    optimizers: Vec<Box<dyn SitemapOptimizer>>,
}

impl SitemapGenerator {
    /// A generator with no optimizers. Entries come out exactly as assembled.
    pub fn empty() -> Self {
        Self {
            optimizers: Vec::new(),
        }
    }

    /// Dedupe, then enforce the protocol's entry and size limits.
    pub fn standard(max_entries: usize) -> Self {
        Self::empty()
            .with_optimizer(DeduplicateUrls)
            .with_optimizer(MaxEntries(max_entries.min(MAX_SITEMAP_ENTRIES)))
            .with_optimizer(MaxBytes(MAX_SITEMAP_BYTES))
    }

    pub fn with_optimizer(mut self, optimizer: impl SitemapOptimizer + 'static) -> Self {
        self.optimizers.push(Box::new(optimizer));
        self
    }

    pub fn generate(&self, content: &[ContentNode]) -> SitemapDocument {
        let entries: Vec<Arc<dyn SitemapEntry>> = content
            .iter()
            .filter_map(|node| match PageEntry::from_node(node) {
                Ok(entry) => Some(Arc::new(entry) as Arc<dyn SitemapEntry>),
                Err(e) => {
                    warn!("sitemap: skipping node: {}", e);
                    None
                }
            })
            .collect();

        self.finish(entries)
    }

    /// Assemble pre-built entries of any kind and run the optimizer chain over them.
    pub fn finish(&self, entries: Vec<Arc<dyn SitemapEntry>>) -> SitemapDocument {
        let raw_len = entries.len();
        let document = self
            .optimizers
            .iter()
            .fold(SitemapDocument::new(entries), |document, optimizer| {
                let before = document.len();
                let optimized = optimizer.optimize(document);
                debug!(
                    "sitemap: {} {} -> {} entries",
                    optimizer.name(),
                    before,
                    optimized.len()
                );
                optimized
            });

        debug!(
            "sitemap: assembled {} entries, {} after optimization",
            raw_len,
            document.len()
        );

        document
    }
}

/// The [`standard`](SitemapGenerator::standard) chain at the protocol's entry limit.
impl Default for SitemapGenerator {
    fn default() -> Self {
        Self::standard(MAX_SITEMAP_ENTRIES)
    }
}
