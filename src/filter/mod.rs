use crate::content::{ContentError, ContentSource};
use crate::domain::ContentNode;
use std::sync::Arc;
use tracing::debug;

pub mod policy;

pub use self::policy::{HasTemplate, NodePolicy, NotHidden, Published};

/// Produces the nodes eligible for the sitemap.
///
/// Bound to a content source and a chain of [`NodePolicy`] predicates. A node is kept only
/// if every policy accepts it; output preserves the source's traversal order.
pub struct ContentFilter {
    source: Arc<dyn ContentSource>,
    policies: Vec<Box<dyn NodePolicy>>,
}

impl ContentFilter {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            policies: Vec::new(),
        }
    }

    /// The filter the sitemap has always shipped with: pages without a template are dropped.
    pub fn no_template(source: Arc<dyn ContentSource>) -> Self {
        Self::new(source).with_policy(HasTemplate)
    }

    /// Template, publication and hide-flag policies chained together.
    pub fn standard(source: Arc<dyn ContentSource>) -> Self {
        Self::no_template(source)
            .with_policy(Published)
            .with_policy(NotHidden)
    }

    pub fn with_policy(mut self, policy: impl NodePolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub async fn get_content(&self) -> Result<Vec<ContentNode>, ContentError> {
        let nodes = self.source.get_all_nodes().await?;
        Ok(self.apply(nodes))
    }

    pub fn apply(&self, nodes: Vec<ContentNode>) -> Vec<ContentNode> {
        nodes
            .into_iter()
            .filter(|node| match self.rejected_by(node) {
                Some(policy) => {
                    debug!("sitemap filter: {} dropped by {}", node, policy);
                    false
                }
                None => true,
            })
            .collect()
    }

    fn rejected_by(&self, node: &ContentNode) -> Option<&'static str> {
        self.policies
            .iter()
            .find(|policy| !policy.is_eligible(node))
            .map(|policy| policy.name())
    }
}
