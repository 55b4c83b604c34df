mod api_sitemap_stress;
mod integration_content_watcher;
mod unit_content_filter;
mod unit_sitemap_cache;
