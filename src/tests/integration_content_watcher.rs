use crate::cache::CacheStrategy;
use crate::features::watcher::{is_content_file, start_content_watcher};
use crate::sitemap::SitemapDocument;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_only_markdown_files_count_as_content() {
    assert!(is_content_file(Path::new("/content/blog/post.md")));
    assert!(!is_content_file(Path::new("/content/blog/.post.md")));
    assert!(!is_content_file(Path::new("/content/blog/post.md~")));
    assert!(!is_content_file(Path::new("/content/blog/post.md.swp")));
    assert!(!is_content_file(Path::new("/content/image.png")));
}

// real filesystem events take a moment and the worker debounces, so poll generously
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_content_change_invalidates_shared_cache() {
    let dir = TempDir::new().unwrap();
    let content_dir = fs::canonicalize(dir.path()).unwrap();
    let cache = CacheStrategy::shared();

    start_content_watcher(&content_dir, cache.clone()).unwrap();

    cache
        .cache_for_request()
        .insert(Arc::new(SitemapDocument::default()));
    assert!(cache.cache_for_request().is_in_cache());

    // give the OS watcher a moment to register before writing
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(content_dir.join("new-page.md"), "---\ntemplate: page\n---\n# New").unwrap();

    let mut invalidated = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        if !cache.cache_for_request().is_in_cache() {
            invalidated = true;
            break;
        }
    }

    assert!(invalidated, "cache should be invalidated after a content change");
}
