use crate::AppState;
use crate::cache::CacheStrategy;
use crate::features::sitemap::sitemap_router;
use crate::filter::ContentFilter;
use crate::services::SitemapService;
use crate::sitemap::SitemapGenerator;
use crate::tests::integration_sitemap_service::{MockContentSource, folder, page};
use axum::{body::Body, http::Request};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tower::ServiceExt;

// a big content tree, every tenth node is a template-less folder
fn big_tree(node_count: usize) -> Vec<crate::domain::ContentNode> {
    (0..node_count)
        .map(|i| {
            let url = format!("https://example.com/posts/{}", i);
            if i % 10 == 0 {
                folder(&format!("folder-{}", i), &url)
            } else {
                page(&format!("post-{}", i), &url)
            }
        })
        .collect()
}

// the "Hammer" test: many users asking for the sitemap while it is still being generated
// proves the shared slot serves one consistent document and regenerates only once
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // heavy; run with `cargo test -- --ignored`
async fn test_api_hammer_shared_sitemap() {
    let node_count = 20_000;
    let request_count = 2_000;

    let source = MockContentSource::new(big_tree(node_count)).with_delay(Duration::from_millis(100));
    let service = SitemapService::new(
        ContentFilter::no_template(Arc::new(source.clone())),
        SitemapGenerator::default(),
        CacheStrategy::shared(),
    );
    let app = Arc::new(sitemap_router("/sitemap.xml").with_state(AppState {
        sitemap: Arc::new(service),
    }));

    let mut set = JoinSet::new();
    let start = Instant::now();

    for _ in 0..request_count {
        let app = app.clone();
        set.spawn(async move {
            let response = app
                .as_ref()
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/sitemap.xml")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), 200);
            axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
                .await
                .unwrap()
                .len()
        });
    }

    let mut sizes = Vec::with_capacity(request_count);
    while let Some(size) = set.join_next().await {
        sizes.push(size.unwrap());
    }

    let duration = start.elapsed();
    assert_eq!(source.calls(), 1);
    assert!(sizes.windows(2).all(|pair| pair[0] == pair[1]));

    println!("\nSITEMAP HAMMER TEST RESULT:");
    println!("Nodes in tree: {}", node_count);
    println!("Served {} sitemap requests in {:?}", request_count, duration);
}
