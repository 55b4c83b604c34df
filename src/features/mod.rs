pub mod sitemap;
pub mod watcher;
