use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSourceKind {
    Sqlite,
    Markdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheKind {
    Request,
    Shared,
    Ttl(Duration),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterKind {
    NoTemplate,
    Standard,
}

#[derive(Clone, Debug)]
pub struct SitemapServerConfig {
    pub bind_address: String,
    pub sitemap_path: String,
    pub content_source: ContentSourceKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub content_dir: PathBuf,
    pub site_base_url: Option<Url>,
    pub cache: CacheKind,
    pub filter: FilterKind,
    pub max_entries: usize,
    pub single_flight: bool,
    pub watch_content: bool,
    pub log_level: String,
}

impl SitemapServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // split out so tests can feed a fake environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let content_source = match var_or("CONTENT_SOURCE", "sqlite").as_str() {
            "sqlite" => ContentSourceKind::Sqlite,
            "markdown" => ContentSourceKind::Markdown,
            other => return Err(invalid("CONTENT_SOURCE", other, "expected sqlite or markdown")),
        };

        let database_url = lookup("DATABASE_URL");
        if content_source == ContentSourceKind::Sqlite && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let site_base_url = match lookup("SITE_BASE_URL") {
            Some(raw) => Some(parse_base_url(&raw)?),
            None if content_source == ContentSourceKind::Markdown => {
                return Err(ConfigError::Missing("SITE_BASE_URL"));
            }
            None => None,
        };

        let cache = match var_or("SITEMAP_CACHE", "shared").as_str() {
            "request" => CacheKind::Request,
            "shared" => CacheKind::Shared,
            "ttl" => {
                let secs: u64 = parse_var(&lookup, "SITEMAP_CACHE_TTL_SECS", 3600)?;
                CacheKind::Ttl(Duration::from_secs(secs))
            }
            other => {
                return Err(invalid("SITEMAP_CACHE", other, "expected request, shared or ttl"));
            }
        };

        let filter = match var_or("SITEMAP_FILTER", "standard").as_str() {
            "no-template" => FilterKind::NoTemplate,
            "standard" => FilterKind::Standard,
            other => {
                return Err(invalid("SITEMAP_FILTER", other, "expected no-template or standard"));
            }
        };

        let sitemap_path = var_or("SITEMAP_PATH", "/sitemap.xml");
        if !sitemap_path.starts_with('/') {
            return Err(invalid("SITEMAP_PATH", &sitemap_path, "must start with '/'"));
        }

        Ok(Self {
            bind_address: var_or("BIND_ADDRESS", "0.0.0.0:3000"),
            sitemap_path,
            content_source,
            database_url,
            max_connections: parse_var(&lookup, "MAX_CONNECTIONS", 15)?,
            content_dir: PathBuf::from(var_or("CONTENT_DIR", "./content/md")),
            site_base_url,
            cache,
            filter,
            max_entries: parse_var(&lookup, "SITEMAP_MAX_ENTRIES", 50_000)?,
            single_flight: parse_var(&lookup, "SITEMAP_SINGLE_FLIGHT", true)?,
            watch_content: parse_var(&lookup, "WATCH_CONTENT", true)?,
            log_level: var_or("LOG_LEVEL", "info"),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(name, &raw, &e.to_string())),
        None => Ok(default),
    }
}

// relative joins need a trailing slash or the last path segment gets replaced
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url =
        Url::parse(&with_slash).map_err(|e| invalid("SITE_BASE_URL", raw, &e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("SITE_BASE_URL", raw, "must be an absolute http(s) url"));
    }
    Ok(url)
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
