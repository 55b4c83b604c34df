use chrono::NaiveDateTime;
use derive_more::derive::Display;

// read-only view of one page in the content tree, the sitemap never mutates these
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{} ({})", id, url)]
pub struct ContentNode {
    pub id: String,
    // absolute URL as the content source stores it, validated during generation
    pub url: String,
    pub template: Option<String>,
    pub published: bool,
    pub hide_from_sitemap: bool,
    pub modified_datetime: Option<NaiveDateTime>,
}

impl ContentNode {
    pub fn has_template(&self) -> bool {
        self.template
            .as_deref()
            .is_some_and(|alias| !alias.trim().is_empty())
    }
}
