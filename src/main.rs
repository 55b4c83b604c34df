use crate::cache::CacheStrategy;
use crate::config::{CacheKind, ContentSourceKind, FilterKind, SitemapServerConfig};
use crate::content::ContentSource;
use crate::content::markdown::MarkdownContentSource;
use crate::content::sqlite::SqliteContentSource;
use crate::features::watcher::start_content_watcher;
use crate::filter::ContentFilter;
use crate::services::SitemapService;
use crate::sitemap::SitemapGenerator;
use anyhow::{Context, Result};
use axum::Router;
use sqlx::Sqlite;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

pub mod cache;
pub mod config;
pub mod content;
pub mod domain;
mod features;
pub mod filter;
pub mod services;
pub mod sitemap;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub sitemap: Arc<SitemapService>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    let config = SitemapServerConfig::from_env().context("Invalid configuration")?;
    init_logging(&config.log_level)?;

    let source = build_content_source(&config).await?;

    let cache = match config.cache {
        CacheKind::Request => CacheStrategy::per_request(),
        CacheKind::Shared => CacheStrategy::shared(),
        CacheKind::Ttl(ttl) => CacheStrategy::shared_with_ttl(ttl),
    };

    let filter = match config.filter {
        FilterKind::NoTemplate => ContentFilter::no_template(source),
        FilterKind::Standard => ContentFilter::standard(source),
    };

    let service = SitemapService::new(
        filter,
        SitemapGenerator::standard(config.max_entries),
        cache.clone(),
    )
    .with_single_flight(config.single_flight);

    // start background file watcher, only markdown content lives on disk
    if config.content_source == ContentSourceKind::Markdown && config.watch_content {
        start_content_watcher(&config.content_dir, cache)?;
    }

    let app_state = AppState {
        sitemap: Arc::new(service),
    };

    let app = Router::new()
        .merge(features::sitemap::sitemap_router(&config.sitemap_path))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!(
        "Serving sitemap on http://{}{}",
        config.bind_address, config.sitemap_path
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    let level: Level = log_level
        .parse()
        .with_context(|| format!("Invalid LOG_LEVEL '{}'", log_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn build_content_source(config: &SitemapServerConfig) -> Result<Arc<dyn ContentSource>> {
    match config.content_source {
        ContentSourceKind::Markdown => {
            let base_url = config
                .site_base_url
                .clone()
                .context("SITE_BASE_URL is required for markdown content")?;
            let content_dir = std::fs::canonicalize(&config.content_dir).with_context(|| {
                format!(
                    "Failed to resolve CONTENT_DIR {}. Does the directory exist?",
                    config.content_dir.display()
                )
            })?;
            info!("Reading content from {}", content_dir.display());
            Ok(Arc::new(MarkdownContentSource::new(content_dir, base_url)))
        }
        ContentSourceKind::Sqlite => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for sqlite content")?;

            // verify db exists
            if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
                info!("Unable to find database at {}, creating...", database_url);
                Sqlite::create_database(database_url)
                    .await
                    .with_context(|| format!("Unable to create database at {}", database_url))?;
            }

            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .with_context(|| format!("Failed to create pool on {}", database_url))?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            info!("Reading content from {}", database_url);
            Ok(Arc::new(SqliteContentSource::new(pool)))
        }
    }
}
