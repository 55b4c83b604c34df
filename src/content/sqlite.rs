use crate::content::model::DbContentNode;
use crate::content::{ContentError, ContentSource};
use crate::domain::ContentNode;
use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use std::collections::{HashMap, HashSet};

pub struct SqliteContentSource {
    pool: Pool<Sqlite>,
}

impl SqliteContentSource {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentSource for SqliteContentSource {
    async fn get_all_nodes(&self) -> Result<Vec<ContentNode>, ContentError> {
        let db_nodes = sqlx::query_as::<_, DbContentNode>(
            r#"
            SELECT id, parent_id, sort_order, url, template, published,
                   hide_from_sitemap, modified_datetime
            FROM content_nodes
            ORDER BY sort_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContentError::unavailable("failed to query content_nodes", e))?;

        Ok(depth_first(db_nodes))
    }
}

// rows come back sorted by sort_order; rebuild the tree from parent links and walk it
// depth-first. nodes whose parent is missing are treated as extra roots after the real ones.
fn depth_first(db_nodes: Vec<DbContentNode>) -> Vec<ContentNode> {
    let known_ids: HashSet<String> = db_nodes.iter().map(|n| n.id.clone()).collect();

    let mut roots: Vec<DbContentNode> = Vec::new();
    let mut orphans: Vec<DbContentNode> = Vec::new();
    let mut children: HashMap<String, Vec<DbContentNode>> = HashMap::new();

    for db_node in db_nodes {
        match db_node.parent_id.clone() {
            None => roots.push(db_node),
            Some(parent) if known_ids.contains(&parent) => {
                children.entry(parent).or_default().push(db_node)
            }
            Some(_) => orphans.push(db_node),
        }
    }

    roots.extend(orphans);

    let mut ordered = Vec::with_capacity(known_ids.len());
    // explicit stack, pushed in reverse so siblings pop in sort order
    let mut stack: Vec<DbContentNode> = roots.into_iter().rev().collect();

    while let Some(db_node) = stack.pop() {
        if let Some(kids) = children.remove(&db_node.id) {
            stack.extend(kids.into_iter().rev());
        }
        ordered.push(db_node.into());
    }

    ordered
}
