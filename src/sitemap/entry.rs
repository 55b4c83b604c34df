use crate::domain::ContentNode;
use crate::sitemap::SitemapError;
use crate::sitemap::xml::{ToXml, XmlWriter, write_text_element};
use anyhow::Result;
use chrono::NaiveDate;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::fmt::Debug;
use url::Url;

/// W3C date format used for `<lastmod>`.
const LASTMOD_FORMAT: &str = "%Y-%m-%d";

/// One child of `<urlset>`.
///
/// `loc` is exposed so optimizers can reason about entries of any kind.
pub trait SitemapEntry: ToXml + Debug + Send + Sync {
    fn loc(&self) -> &Url;

    /// Extra `(prefix, uri)` namespaces this entry's XML uses, declared once on `<urlset>`.
    fn namespaces(&self) -> &[(&'static str, &'static str)] {
        &[]
    }
}

/// `<url>` element for a regular page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    loc: Url,
    lastmod: Option<NaiveDate>,
}

impl PageEntry {
    pub fn new(loc: Url, lastmod: Option<NaiveDate>) -> Self {
        Self { loc, lastmod }
    }

    /// Map a content node 1:1 onto an entry.
    ///
    /// Fails with [`SitemapError::MalformedNodeUri`] unless the node's URL is an absolute
    /// `http`/`https` URL with a host.
    pub fn from_node(node: &ContentNode) -> Result<Self, SitemapError> {
        let malformed = |reason: String| SitemapError::MalformedNodeUri {
            node_id: node.id.clone(),
            url: node.url.clone(),
            reason,
        };

        let loc = Url::parse(node.url.trim()).map_err(|e| malformed(e.to_string()))?;

        if !matches!(loc.scheme(), "http" | "https") {
            return Err(malformed(format!("unsupported scheme '{}'", loc.scheme())));
        }
        if loc.host_str().is_none_or(str::is_empty) {
            return Err(malformed("missing host".to_string()));
        }

        Ok(Self {
            loc,
            lastmod: node.modified_datetime.map(|dt| dt.date()),
        })
    }

    pub fn lastmod(&self) -> Option<NaiveDate> {
        self.lastmod
    }
}

impl SitemapEntry for PageEntry {
    fn loc(&self) -> &Url {
        &self.loc
    }
}

impl ToXml for PageEntry {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(writer, "loc", self.loc.as_str())?;
        if let Some(lastmod) = self.lastmod {
            write_text_element(writer, "lastmod", &lastmod.format(LASTMOD_FORMAT).to_string())?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
        Ok(())
    }
}
