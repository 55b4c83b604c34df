use crate::content::model::NodeFrontMatter;
use crate::content::{ContentError, ContentSource};
use crate::domain::ContentNode;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use gray_matter::{Matter, engine::YAML};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;
use walkdir::WalkDir;

/// Serves a directory of markdown files as the content tree.
///
/// Each `.md` file is one node; directories only contribute structure. Front matter decides
/// the node's template, publication state and URL.
pub struct MarkdownContentSource {
    pub root_path: PathBuf,
    pub base_url: Url,
}

impl MarkdownContentSource {
    pub fn new(root_path: PathBuf, base_url: Url) -> Self {
        Self {
            root_path,
            base_url,
        }
    }
}

#[async_trait]
impl ContentSource for MarkdownContentSource {
    async fn get_all_nodes(&self) -> Result<Vec<ContentNode>, ContentError> {
        let root = self.root_path.clone();
        let base_url = self.base_url.clone();

        // walking and reading the tree is blocking fs work
        tokio::task::spawn_blocking(move || walk_content_dir(&root, &base_url))
            .await
            .map_err(|e| ContentError::unavailable("content walker task failed", e))?
    }
}

fn walk_content_dir(root: &Path, base_url: &Url) -> Result<Vec<ContentNode>, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::Unavailable {
            reason: format!("content dir {} is not a directory", root.display()),
            source: None,
        });
    }

    let mut nodes = Vec::new();

    // sort_by_file_name gives a stable depth-first pre-order
    for result_entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match result_entry {
            Ok(val) => val,
            Err(e) => {
                warn!("skipping unreadable content entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|s| s.to_str()) != Some("md")
        {
            continue;
        }

        match read_node(root, entry.path(), base_url) {
            Ok(node) => nodes.push(node),
            Err(e) => warn!("skipping content file {}: {}", entry.path().display(), e),
        }
    }

    Ok(nodes)
}

fn read_node(root: &Path, path: &Path, base_url: &Url) -> Result<ContentNode> {
    let relative_path = path
        .strip_prefix(root)
        .map_err(|_| anyhow!("{} is outside of content dir", path.display()))?;

    let id = relative_path.to_string_lossy().replace('\\', "/");

    let raw_markdown = fs::read_to_string(path)?;
    let frontmatter = extract_frontmatter(&raw_markdown, &id)?;

    let os_modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|t| DateTime::<Utc>::from(t).naive_utc());

    let url = match frontmatter.url {
        Some(url) => url,
        None => default_node_url(base_url, relative_path),
    };

    Ok(ContentNode {
        id,
        url,
        template: frontmatter.template,
        published: frontmatter.published.unwrap_or(true),
        hide_from_sitemap: frontmatter.hide_from_sitemap.unwrap_or(false),
        modified_datetime: resolve_datetime(frontmatter.modified_datetime, os_modified),
    })
}

// extracts YAML front matter, the markdown body itself is irrelevant to the sitemap
pub fn extract_frontmatter(md_content: &str, filename: &str) -> Result<NodeFrontMatter> {
    let matter = Matter::<YAML>::new();

    let parsed_matter = matter
        .parse::<NodeFrontMatter>(md_content)
        .map_err(|e| anyhow!("Failed to parse frontmatter in {}: {}", filename, e))?;

    Ok(parsed_matter.data.unwrap_or_default())
}

// "blog/post.md" -> <base>/blog/post, "blog/index.md" -> <base>/blog/, "index.md" -> <base>/
pub fn default_node_url(base_url: &Url, relative_path: &Path) -> String {
    let without_ext = relative_path.with_extension("");
    let mut path = without_ext.to_string_lossy().replace('\\', "/");

    if path == "index" {
        path.clear();
    } else if let Some(dir) = path.strip_suffix("/index") {
        path = format!("{}/", dir);
    }

    match base_url.join(&path) {
        Ok(url) => url.to_string(),
        // leave it to the generator to reject
        Err(_) => path,
    }
}

pub fn resolve_datetime(
    frontmatter_date: Option<String>,
    os_date: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    if let Some(date_str) = frontmatter_date {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&date_str) {
            return Some(dt.naive_utc());
        }

        if let Ok(date) = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    os_date
}
