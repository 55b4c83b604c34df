use crate::domain::ContentNode;
use crate::filter::{ContentFilter, HasTemplate, NodePolicy, NotHidden, Published};
use crate::tests::integration_sitemap_service::{MockContentSource, folder, page};
use std::sync::Arc;

fn ids(nodes: &[ContentNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

// [A(template), B(no template), C(template)] -> [A, C]
#[tokio::test]
async fn test_no_template_filter_drops_template_less_nodes() {
    let source = MockContentSource::new(vec![
        page("a", "https://example.com/a"),
        folder("b", "https://example.com/b"),
        page("c", "https://example.com/c"),
    ]);
    let filter = ContentFilter::no_template(Arc::new(source));

    let content = filter.get_content().await.unwrap();

    assert_eq!(ids(&content), vec!["a", "c"]);
}

#[tokio::test]
async fn test_filter_preserves_traversal_order_and_multiplicity() {
    let tree: Vec<ContentNode> = (0..20)
        .map(|i| {
            let id = format!("n{}", i);
            let url = format!("https://example.com/{}", i);
            if i % 3 == 0 { folder(&id, &url) } else { page(&id, &url) }
        })
        .collect();
    let expected: Vec<String> = tree
        .iter()
        .filter(|n| n.has_template())
        .map(|n| n.id.clone())
        .collect();

    let filter = ContentFilter::no_template(Arc::new(MockContentSource::new(tree)));
    let content = filter.get_content().await.unwrap();

    let got: Vec<String> = content.iter().map(|n| n.id.clone()).collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn test_empty_tree_gives_empty_content() {
    let filter = ContentFilter::standard(Arc::new(MockContentSource::new(vec![])));

    let content = filter.get_content().await.unwrap();

    assert!(content.is_empty());
}

#[tokio::test]
async fn test_unavailable_source_is_an_error() {
    let source = MockContentSource::new(vec![page("a", "https://example.com/a")]);
    source.set_unavailable(true);
    let filter = ContentFilter::no_template(Arc::new(source));

    assert!(filter.get_content().await.is_err());
}

#[test]
fn test_blank_template_alias_counts_as_missing() {
    let mut node = page("a", "https://example.com/a");
    node.template = Some("   ".to_string());

    assert!(!HasTemplate.is_eligible(&node));
}

#[test]
fn test_standard_filter_applies_every_policy() {
    let mut unpublished = page("draft", "https://example.com/draft");
    unpublished.published = false;
    let mut hidden = page("hidden", "https://example.com/hidden");
    hidden.hide_from_sitemap = true;

    let nodes = vec![
        page("home", "https://example.com/"),
        unpublished,
        hidden,
        folder("folder", "https://example.com/folder"),
    ];

    let filter = ContentFilter::standard(Arc::new(MockContentSource::new(vec![])));
    assert_eq!(ids(&filter.apply(nodes.clone())), vec!["home"]);

    // the legacy filter only cares about templates
    let legacy = ContentFilter::no_template(Arc::new(MockContentSource::new(vec![])));
    assert_eq!(ids(&legacy.apply(nodes)), vec!["home", "draft", "hidden"]);
}

#[test]
fn test_policies_compose_by_chaining() {
    let nodes = vec![
        page("home", "https://example.com/"),
        page("private", "https://example.com/private/area"),
        page("about", "https://example.com/about"),
    ];

    let filter = ContentFilter::new(Arc::new(MockContentSource::new(vec![])))
        .with_policy(Published)
        .with_policy(NotHidden)
        .with_policy(("robots-disallow", |node: &ContentNode| {
            !node.url.contains("/private/")
        }));

    assert_eq!(ids(&filter.apply(nodes)), vec!["home", "about"]);
}
