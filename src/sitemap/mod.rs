//! Sitemap document model and generation.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::sync::Arc;

pub mod entry;
pub mod generator;
pub mod optimize;
pub mod xml;

pub use self::entry::{PageEntry, SitemapEntry};
pub use self::generator::SitemapGenerator;
pub use self::optimize::{DeduplicateUrls, MaxBytes, MaxEntries, SitemapOptimizer};

use self::xml::{ToXml, XmlWriter, new_xml_writer};

/// XML namespace for sitemap
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Protocol limit on `<url>` entries per sitemap file.
pub const MAX_SITEMAP_ENTRIES: usize = 50_000;

/// Protocol limit on uncompressed sitemap size.
pub const MAX_SITEMAP_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("node {node_id} has malformed url '{url}': {reason}")]
    MalformedNodeUri {
        node_id: String,
        url: String,
        reason: String,
    },

    #[error("failed to serialize sitemap")]
    Serialization(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A complete `<urlset>`. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SitemapDocument {
    entries: Vec<Arc<dyn SitemapEntry>>,
}

impl SitemapDocument {
    pub fn new(entries: Vec<Arc<dyn SitemapEntry>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Arc<dyn SitemapEntry>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Arc<dyn SitemapEntry>> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extension namespaces used by the entries, first declaration of each prefix wins.
    pub fn namespaces(&self) -> Vec<(&'static str, &'static str)> {
        let mut namespaces: Vec<(&'static str, &'static str)> = Vec::new();
        for &(prefix, uri) in self.entries.iter().flat_map(|entry| entry.namespaces()) {
            if !namespaces.iter().any(|(seen, _)| *seen == prefix) {
                namespaces.push((prefix, uri));
            }
        }
        namespaces
    }

    /// Serialize the whole document, declaration included, into one UTF-8 buffer.
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>, SitemapError> {
        let mut writer = new_xml_writer();

        write_declaration(&mut writer)
            .and_then(|_| self.write_xml(&mut writer))
            .map_err(|e| SitemapError::Serialization(e.into()))?;

        Ok(writer.into_inner().into_inner())
    }
}

pub(crate) fn write_declaration(writer: &mut XmlWriter) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

pub(crate) fn urlset_start(namespaces: &[(&str, &str)]) -> BytesStart<'static> {
    let mut start = BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]);
    for (prefix, uri) in namespaces {
        start.push_attribute((format!("xmlns:{prefix}").as_str(), *uri));
    }
    start
}

impl ToXml for SitemapDocument {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.write_event(Event::Start(urlset_start(&self.namespaces())))?;
        for entry in &self.entries {
            entry.write_xml(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new("urlset")))?;
        Ok(())
    }
}
