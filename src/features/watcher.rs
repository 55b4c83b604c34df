use crate::cache::CacheStrategy;
use anyhow::{Context, Result};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEBOUNCE_MS: u64 = 1500;

/// Spawns a background task that invalidates the sitemap whenever markdown content changes.
///
/// Events are debounced: a burst of saves produces one invalidation once the directory has
/// been quiet for [`DEBOUNCE_MS`].
pub fn start_content_watcher(content_dir: &Path, cache: CacheStrategy) -> Result<()> {
    // the conveyor belt; a full channel already guarantees a pending invalidation
    let (tx, mut rx) = mpsc::channel::<PathBuf>(100);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else {
            return;
        };

        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return;
        }

        for path in event.paths.iter().filter(|p| is_content_file(p)) {
            // Full means an invalidation is queued anyway
            let _ = tx.try_send(path.clone());
        }
    })
    .context("Failed to initialize content watcher")?;

    watcher
        .watch(content_dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", content_dir.display()))?;

    info!("watching {} for content changes", content_dir.display());

    tokio::spawn(async move {
        let _kept_alive_watcher = watcher;

        // wait for the first change, then keep collecting until things go quiet
        while let Some(first) = rx.recv().await {
            let mut changed = vec![first];

            loop {
                match tokio::time::timeout(Duration::from_millis(DEBOUNCE_MS), rx.recv()).await {
                    Ok(Some(path)) => changed.push(path),
                    Ok(None) | Err(_) => break,
                }
            }

            debug!("content changed: {:?}", changed);
            cache.invalidate();
            info!(
                "sitemap invalidated after {} content change(s)",
                changed.len()
            );
        }

        warn!("content watcher channel closed");
    });

    Ok(())
}

// only .md files, and not editor swap/temp files
pub fn is_content_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|s| s.to_str());
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("");

    ext == Some("md") && !filename.starts_with('.') && !filename.ends_with('~')
}
