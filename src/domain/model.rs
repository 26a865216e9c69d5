use serde::{Deserialize, Serialize};

/// 記錄來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

/// Structured documents attached to a remote blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContent {
    pub content: Option<serde_json::Value>,
    pub actionable_tips: Option<serde_json::Value>,
    pub examples: Option<serde_json::Value>,
}

impl RichContent {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.actionable_tips.is_none() && self.examples.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub published_date: String,
    pub author: String,
    pub image_prompt: String,
    pub rich_content: Option<RichContent>,
    /// 原始關聯 id（未解析）
    pub related_post_ids: Vec<String>,
    pub related_slugs: Vec<String>,
    pub recommended_post_titles: Vec<String>,
    pub recommended_slugs: Vec<String>,
    pub source: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub duration: String,
    pub actions_taken: String,
    pub results: String,
    pub tags: Vec<String>,
    pub rich_description: Option<serde_json::Value>,
    pub source: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub inquire_label: String,
    pub source: SourceKind,
}

/// One normalized snapshot of every content category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSet {
    pub blog_posts: Vec<BlogPost>,
    pub portfolio_projects: Vec<PortfolioProject>,
    pub services: Vec<Service>,
}

impl ContentSet {
    pub fn is_empty(&self) -> bool {
        self.blog_posts.is_empty() && self.portfolio_projects.is_empty() && self.services.is_empty()
    }

    pub fn total(&self) -> usize {
        self.blog_posts.len() + self.portfolio_projects.len() + self.services.len()
    }
}

/// Anything keyed by a slug can be merged and deduplicated.
pub trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for BlogPost {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for PortfolioProject {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for Service {
    fn slug(&self) -> &str {
        &self.slug
    }
}
