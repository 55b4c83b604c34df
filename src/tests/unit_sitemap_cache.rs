use crate::cache::{CacheError, CacheStrategy, RequestScopedCache, SharedCache, SitemapCache};
use crate::sitemap::{PageEntry, SitemapDocument, SitemapEntry};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn document(urls: &[&str]) -> Arc<SitemapDocument> {
    let entries = urls
        .iter()
        .map(|u| Arc::new(PageEntry::new(Url::parse(u).unwrap(), None)) as Arc<dyn SitemapEntry>)
        .collect();
    Arc::new(SitemapDocument::new(entries))
}

// every strategy has to honour the same check/insert/retrieve contract
fn assert_round_trip(cache: &dyn SitemapCache) {
    assert!(!cache.is_in_cache());
    assert_eq!(cache.retrieve().unwrap_err(), CacheError::NotFound);

    let doc = document(&["https://example.com/"]);
    cache.insert(doc.clone());
    assert!(cache.is_in_cache());
    assert_eq!(
        cache.retrieve().unwrap().to_xml_bytes().unwrap(),
        doc.to_xml_bytes().unwrap()
    );

    // overwrite
    let newer = document(&["https://example.com/", "https://example.com/new"]);
    cache.insert(newer.clone());
    assert!(Arc::ptr_eq(&cache.retrieve().unwrap(), &newer));

    cache.invalidate();
    assert!(!cache.is_in_cache());
    assert_eq!(cache.retrieve().unwrap_err(), CacheError::NotFound);
}

#[test]
fn test_request_scoped_round_trip() {
    assert_round_trip(&RequestScopedCache::new());
}

#[test]
fn test_shared_round_trip() {
    assert_round_trip(&SharedCache::new());
}

#[tokio::test(start_paused = true)]
async fn test_ttl_round_trip_and_expiry() {
    let cache = SharedCache::with_ttl(Duration::from_secs(10));
    assert_round_trip(&cache);

    cache.insert(document(&["https://example.com/"]));
    tokio::time::advance(Duration::from_secs(9)).await;
    assert!(cache.is_in_cache());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(!cache.is_in_cache());

    // an insert restarts the clock
    cache.insert(document(&["https://example.com/"]));
    assert!(cache.is_in_cache());
}

#[tokio::test(start_paused = true)]
async fn test_expired_document_still_retrievable_within_a_pass() {
    let cache = SharedCache::with_ttl(Duration::from_secs(1));
    let doc = document(&["https://example.com/"]);
    cache.insert(doc.clone());

    assert!(cache.is_in_cache());
    tokio::time::advance(Duration::from_secs(2)).await;

    // check said yes a moment ago, so the read must not fail
    assert!(Arc::ptr_eq(&cache.retrieve().unwrap(), &doc));
}

#[test]
fn test_per_request_strategy_hands_out_fresh_slots() {
    let strategy = CacheStrategy::per_request();

    let first = strategy.cache_for_request();
    first.insert(document(&["https://example.com/"]));

    let second = strategy.cache_for_request();
    assert!(first.is_in_cache());
    assert!(!second.is_in_cache());
}

#[test]
fn test_shared_strategy_hands_out_the_same_slot() {
    let strategy = CacheStrategy::shared();

    strategy
        .cache_for_request()
        .insert(document(&["https://example.com/"]));

    assert!(strategy.cache_for_request().is_in_cache());
    strategy.invalidate();
    assert!(!strategy.cache_for_request().is_in_cache());
}

#[test]
fn test_shared_cache_concurrent_readers_see_whole_documents() {
    let cache = Arc::new(SharedCache::new());
    let small = document(&["https://example.com/"]);
    let large = document(&[
        "https://example.com/",
        "https://example.com/a",
        "https://example.com/b",
    ]);
    cache.insert(small.clone());

    std::thread::scope(|scope| {
        let writer_cache = cache.clone();
        let (small_w, large_w) = (small.clone(), large.clone());
        scope.spawn(move || {
            for i in 0..1000 {
                writer_cache.insert(if i % 2 == 0 { large_w.clone() } else { small_w.clone() });
            }
        });

        for _ in 0..4 {
            let reader_cache = cache.clone();
            scope.spawn(move || {
                for _ in 0..1000 {
                    let len = reader_cache.retrieve().unwrap().len();
                    assert!(len == 1 || len == 3);
                }
            });
        }
    });
}

#[test]
fn test_shared_insert_after_invalidation_is_dropped() {
    let cache = SharedCache::new();
    let generation = cache.generation();

    cache.invalidate();

    assert!(!cache.insert_if_current(document(&["https://example.com/old"]), generation));
    assert!(!cache.is_in_cache());

    // a regeneration that starts after the invalidation stores normally
    let fresh = document(&["https://example.com/new"]);
    assert!(cache.insert_if_current(fresh.clone(), cache.generation()));
    assert!(Arc::ptr_eq(&cache.retrieve().unwrap(), &fresh));
}

#[test]
fn test_request_scoped_conditional_insert_always_stores() {
    let cache = RequestScopedCache::new();

    assert!(cache.insert_if_current(document(&["https://example.com/"]), cache.generation()));
    assert!(cache.is_in_cache());
}
