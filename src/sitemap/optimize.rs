use crate::sitemap::xml::{XmlWriter, new_xml_writer};
use crate::sitemap::{SitemapDocument, urlset_start, write_declaration};
use quick_xml::events::Event;
use std::collections::HashSet;
use tracing::warn;

/// Post-processing step applied to every freshly assembled document.
pub trait SitemapOptimizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn optimize(&self, document: SitemapDocument) -> SitemapDocument;
}

/// Keeps the first entry for each location.
pub struct DeduplicateUrls;

impl SitemapOptimizer for DeduplicateUrls {
    fn name(&self) -> &'static str {
        "deduplicate-urls"
    }

    fn optimize(&self, document: SitemapDocument) -> SitemapDocument {
        let mut seen = HashSet::new();
        let entries = document
            .into_entries()
            .into_iter()
            .filter(|entry| seen.insert(entry.loc().as_str().to_owned()))
            .collect();

        SitemapDocument::new(entries)
    }
}

/// Truncates to at most `n` entries.
pub struct MaxEntries(pub usize);

impl SitemapOptimizer for MaxEntries {
    fn name(&self) -> &'static str {
        "max-entries"
    }

    fn optimize(&self, document: SitemapDocument) -> SitemapDocument {
        let limit = self.0;
        if document.len() <= limit {
            return document;
        }

        warn!(
            "sitemap has {} entries, truncating to {}",
            document.len(),
            limit
        );
        let mut entries = document.into_entries();
        entries.truncate(limit);
        SitemapDocument::new(entries)
    }
}

/// Drops trailing entries once the serialized document would exceed `n` bytes.
///
/// Sizes are measured by writing the entries exactly as [`SitemapDocument::to_xml_bytes`]
/// would, so indentation and escaping are accounted for.
pub struct MaxBytes(pub usize);

impl MaxBytes {
    fn measure(&self, document: &SitemapDocument) -> anyhow::Result<usize> {
        let limit = self.0;

        let mut writer = new_xml_writer();
        write_declaration(&mut writer)?;
        writer.write_event(Event::Start(urlset_start(&document.namespaces())))?;
        let opened = written(&writer);

        // whatever the empty document has beyond the opening tag is the closing tag
        let closing = SitemapDocument::default()
            .to_xml_bytes()?
            .len()
            .saturating_sub(opened);

        let mut fits = 0;
        for entry in document.entries() {
            entry.write_xml(&mut writer)?;
            if written(&writer) + closing > limit {
                break;
            }
            fits += 1;
        }

        Ok(fits)
    }
}

impl SitemapOptimizer for MaxBytes {
    fn name(&self) -> &'static str {
        "max-bytes"
    }

    fn optimize(&self, document: SitemapDocument) -> SitemapDocument {
        let fits = match self.measure(&document) {
            Ok(fits) => fits,
            Err(e) => {
                warn!("max-bytes: unable to measure sitemap, leaving it as is: {}", e);
                return document;
            }
        };

        if fits == document.len() {
            return document;
        }

        warn!(
            "sitemap exceeds {} bytes, keeping {} of {} entries",
            self.0,
            fits,
            document.len()
        );
        let mut entries = document.into_entries();
        entries.truncate(fits);
        SitemapDocument::new(entries)
    }
}

fn written(writer: &XmlWriter) -> usize {
    writer.get_ref().get_ref().len()
}
