use super::records;
use crate::core::fields::{derive_slug, pick_list, pick_object, pick_text, slugify};
use crate::domain::model::{
    BlogPost, ContentSet, PortfolioProject, RichContent, Service, SourceKind,
};
use serde_json::Value;

/// 解析本地資料集：`{ blogPosts, portfolioProjects, services }`
pub fn normalize_document(doc: &Value) -> ContentSet {
    ContentSet {
        blog_posts: blog_posts(doc.get("blogPosts")),
        portfolio_projects: portfolio_projects(doc.get("portfolioProjects")),
        services: services(doc.get("services")),
    }
}

pub fn blog_posts(items: Option<&Value>) -> Vec<BlogPost> {
    records(items)
        .iter()
        .enumerate()
        .map(|(index, item)| blog_post(item, index))
        .collect()
}

pub fn portfolio_projects(items: Option<&Value>) -> Vec<PortfolioProject> {
    records(items)
        .iter()
        .enumerate()
        .map(|(index, item)| portfolio_project(item, index))
        .collect()
}

pub fn services(items: Option<&Value>) -> Vec<Service> {
    records(items)
        .iter()
        .enumerate()
        .map(|(index, item)| service(item, index))
        .collect()
}

fn blog_post(item: &Value, index: usize) -> BlogPost {
    let title = pick_text([item.get("title_en"), item.get("title")])
        .unwrap_or_else(|| format!("blog-{}", index + 1));
    let id = pick_text([item.get("id")]);
    let explicit_slug = pick_text([item.get("slug")]);
    let slug = derive_slug(
        [explicit_slug.as_deref(), Some(title.as_str()), id.as_deref()],
        "blog",
        index,
    );
    let summary =
        pick_text([item.get("summary_en"), item.get("summary"), item.get("body_en")])
            .unwrap_or_default();

    BlogPost {
        id: id.unwrap_or_else(|| slug.clone()),
        body: pick_text([item.get("body_en"), item.get("body")])
            .unwrap_or_else(|| summary.clone()),
        published_date: pick_text([item.get("publishedDate"), item.get("date")])
            .unwrap_or_default(),
        author: pick_text([item.get("author")]).unwrap_or_default(),
        image_prompt: pick_text([item.get("imagePrompt")]).unwrap_or_default(),
        rich_content: pick_object([item.get("richContent")])
            .and_then(|doc| serde_json::from_value::<RichContent>(doc.clone()).ok())
            .filter(|rich| !rich.is_empty()),
        related_post_ids: pick_list([item.get("relatedPostIds"), item.get("relatedPosts")]),
        related_slugs: slug_list(pick_list([item.get("relatedSlugs")])),
        recommended_post_titles: pick_list([
            item.get("recommendedPostTitles"),
            item.get("recommendedPosts"),
            item.get("relatedTitles"),
        ]),
        recommended_slugs: slug_list(pick_list([item.get("recommendedSlugs")])),
        source: SourceKind::Local,
        title,
        slug,
        summary,
    }
}

fn portfolio_project(item: &Value, index: usize) -> PortfolioProject {
    let title = pick_text([item.get("title_en"), item.get("title")])
        .unwrap_or_else(|| format!("project-{}", index + 1));
    let id = pick_text([item.get("id")]);
    let explicit_slug = pick_text([item.get("slug")]);
    let url = pick_text([item.get("url")]);
    let slug = derive_slug(
        [
            explicit_slug.as_deref(),
            Some(title.as_str()),
            id.as_deref(),
            url.as_deref(),
        ],
        "project",
        index,
    );

    PortfolioProject {
        id: id.unwrap_or_else(|| slug.clone()),
        summary: pick_text([
            item.get("summary_en"),
            item.get("summary"),
            item.get("description_en"),
            item.get("description"),
        ])
        .unwrap_or_default(),
        duration: pick_text([item.get("duration")]).unwrap_or_default(),
        actions_taken: pick_text([item.get("actionsTaken"), item.get("actions")])
            .unwrap_or_default(),
        results: pick_text([item.get("results"), item.get("result_en"), item.get("result")])
            .unwrap_or_default(),
        tags: pick_list([item.get("tags_en"), item.get("tags")]),
        rich_description: pick_object([item.get("richDescription")]).cloned(),
        source: SourceKind::Local,
        title,
        slug,
    }
}

fn service(item: &Value, index: usize) -> Service {
    let title = pick_text([item.get("title_en"), item.get("title")])
        .unwrap_or_else(|| format!("service-{}", index + 1));
    let id = pick_text([item.get("id")]);
    let explicit_slug = pick_text([item.get("slug")]);
    let url = pick_text([item.get("url")]);
    let slug = derive_slug(
        [
            explicit_slug.as_deref(),
            Some(title.as_str()),
            id.as_deref(),
            url.as_deref(),
        ],
        "service",
        index,
    );

    Service {
        id: id.unwrap_or_else(|| slug.clone()),
        summary: pick_text([
            item.get("summary_en"),
            item.get("summary"),
            item.get("description_en"),
            item.get("description"),
        ])
        .unwrap_or_default(),
        highlights: pick_list([
            item.get("highlights"),
            item.get("deliverables"),
            item.get("points"),
            item.get("tags_en"),
            item.get("tags"),
        ]),
        inquire_label: pick_text([item.get("inquireLabel")])
            .unwrap_or_else(|| "Inquire".to_string()),
        source: SourceKind::Local,
        title,
        slug,
    }
}

fn slug_list(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|value| slugify(value))
        .filter(|slug| !slug.is_empty())
        .collect()
}
