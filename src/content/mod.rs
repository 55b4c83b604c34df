use crate::domain::ContentNode;
use async_trait::async_trait;

pub mod markdown;
pub mod model;
pub mod sqlite;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content tree could not be enumerated at all (store unreachable, unreadable dir).
    #[error("content source unavailable: {reason}")]
    Unavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ContentError {
    pub fn unavailable(
        reason: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }
}

// the content repository the sitemap reads from, shared between request tasks
// implementations are read-only: sqlite ("sqlite.rs") and a markdown directory ("markdown.rs")
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every node in the tree, depth-first. Order is not guaranteed to be stable between calls.
    async fn get_all_nodes(&self) -> Result<Vec<ContentNode>, ContentError>;
}
