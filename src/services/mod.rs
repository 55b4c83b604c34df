pub mod sitemap;

pub use self::sitemap::{SitemapService, SitemapServiceError};
