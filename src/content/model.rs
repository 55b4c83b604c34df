use crate::domain::ContentNode;
use chrono::NaiveDateTime;
use derive_more::derive::Display;
use serde::Deserialize;

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone, Display)]
#[display("{}", id)]
pub struct DbContentNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub sort_order: i64,
    pub url: String,
    pub template: Option<String>,
    pub published: bool,
    pub hide_from_sitemap: bool,
    pub modified_datetime: Option<NaiveDateTime>,
}

impl From<DbContentNode> for ContentNode {
    fn from(db_node: DbContentNode) -> Self {
        Self {
            id: db_node.id,
            url: db_node.url,
            template: db_node.template,
            published: db_node.published,
            hide_from_sitemap: db_node.hide_from_sitemap,
            modified_datetime: db_node.modified_datetime,
        }
    }
}

// YAML front matter of a markdown content file, every key is optional
#[derive(Deserialize, Debug, Default, Clone)]
pub struct NodeFrontMatter {
    pub url: Option<String>,
    pub template: Option<String>,
    pub published: Option<bool>,
    pub hide_from_sitemap: Option<bool>,
    pub modified_datetime: Option<String>,
}
