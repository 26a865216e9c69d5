use super::{records, SummaryLimits};
use crate::core::fields::{
    derive_slug, non_empty, pick_list, pick_object, pick_text, rich_text_to_plain, to_list,
    trim_summary,
};
use crate::core::remote::EntryBatch;
use crate::domain::model::{
    BlogPost, ContentSet, PortfolioProject, RichContent, Service, SourceKind,
};
use serde_json::Value;
use std::collections::HashMap;

/// Normalizes the three fetched categories of remote entries.
pub fn normalize_batches(
    blog: &EntryBatch,
    projects: &EntryBatch,
    services: &EntryBatch,
    limits: &SummaryLimits,
) -> ContentSet {
    ContentSet {
        blog_posts: blog_posts(&blog.items, &blog.included_entries, limits),
        portfolio_projects: portfolio_projects(&projects.items, limits),
        services: self::services(&services.items, limits),
    }
}

pub fn blog_posts(
    entries: &[Value],
    includes: &HashMap<String, Value>,
    limits: &SummaryLimits,
) -> Vec<BlogPost> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| blog_post(entry, index, includes, limits))
        .collect()
}

pub fn portfolio_projects(entries: &[Value], limits: &SummaryLimits) -> Vec<PortfolioProject> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| portfolio_project(entry, index, limits))
        .collect()
}

pub fn services(entries: &[Value], limits: &SummaryLimits) -> Vec<Service> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| service(entry, index, limits))
        .collect()
}

fn fields_of(entry: &Value) -> &Value {
    entry.get("fields").unwrap_or(&Value::Null)
}

fn explicit_slug(fields: &Value) -> Option<String> {
    pick_text([
        fields.get("slug"),
        fields.get("urlSlug"),
        fields.get("url_slug"),
    ])
}

fn raw_title(fields: &Value) -> Option<String> {
    pick_text([
        fields.get("title"),
        fields.get("title_en"),
        fields.get("titleEn"),
        fields.get("name"),
    ])
}

fn blog_post(
    entry: &Value,
    index: usize,
    includes: &HashMap<String, Value>,
    limits: &SummaryLimits,
) -> BlogPost {
    let fields = fields_of(entry);
    let sys_id = pick_text([entry.pointer("/sys/id")]);
    let title = raw_title(fields);
    let slug = derive_slug(
        [
            explicit_slug(fields).as_deref(),
            title.as_deref(),
            sys_id.as_deref(),
        ],
        "blog",
        index,
    );

    let content_doc = pick_object([fields.get("content"), fields.get("body")]);
    let tips_doc = pick_object([fields.get("actionableTips")]);
    let examples_doc = pick_object([fields.get("examples")]);
    let plain_content = content_doc.map(rich_text_to_plain).unwrap_or_default();

    // 沒有摘要欄位時，依序從內文、建議、範例的純文字推導
    let summary = pick_text([fields.get("summary"), fields.get("summary_en")])
        .or_else(|| non_empty(plain_content.clone()))
        .or_else(|| tips_doc.map(rich_text_to_plain).and_then(non_empty))
        .or_else(|| examples_doc.map(rich_text_to_plain).and_then(non_empty))
        .unwrap_or_default();

    let rich_content = RichContent {
        content: content_doc.cloned(),
        actionable_tips: tips_doc.cloned(),
        examples: examples_doc.cloned(),
    };

    BlogPost {
        id: sys_id.unwrap_or_else(|| slug.clone()),
        title: title.unwrap_or_else(|| "Untitled".to_string()),
        summary: trim_summary(&summary, limits.blog),
        body: trim_summary(&plain_content, limits.blog_body),
        published_date: pick_text([
            fields.get("publishedDate"),
            fields.get("date"),
            entry.pointer("/sys/createdAt"),
        ])
        .unwrap_or_default(),
        author: resolve_author(fields, includes),
        image_prompt: pick_text([fields.get("imagePrompt")]).unwrap_or_default(),
        rich_content: (!rich_content.is_empty()).then_some(rich_content),
        related_post_ids: link_ids(fields.get("relatedPosts")),
        related_slugs: Vec::new(),
        recommended_post_titles: fields
            .get("recommendedPosts")
            .map(to_list)
            .unwrap_or_default(),
        recommended_slugs: Vec::new(),
        source: SourceKind::Remote,
        slug,
    }
}

/// Author through the include graph first, then inline author fields.
fn resolve_author(fields: &Value, includes: &HashMap<String, Value>) -> String {
    let linked = fields
        .pointer("/author/sys/id")
        .and_then(Value::as_str)
        .and_then(|id| includes.get(id));

    match linked {
        Some(author) => pick_text([author.pointer("/fields/name"), author.pointer("/fields/title")]),
        None => pick_text([fields.get("authorName"), fields.get("author")]),
    }
    .unwrap_or_default()
}

/// Ids of linked entries (`[{ sys: { id } }]`); bare strings are accepted too.
fn link_ids(links: Option<&Value>) -> Vec<String> {
    records(links)
        .iter()
        .filter_map(|link| match link {
            Value::String(id) => non_empty(id.clone()),
            other => pick_text([other.pointer("/sys/id")]),
        })
        .collect()
}

fn portfolio_project(entry: &Value, index: usize, limits: &SummaryLimits) -> PortfolioProject {
    let fields = fields_of(entry);
    let sys_id = pick_text([entry.pointer("/sys/id")]);
    let title = raw_title(fields);
    let url = pick_text([fields.get("url")]);
    let slug = derive_slug(
        [
            explicit_slug(fields).as_deref(),
            title.as_deref(),
            url.as_deref(),
            sys_id.as_deref(),
        ],
        "project",
        index,
    );

    let description_doc = pick_object([fields.get("description")]);
    let summary = pick_text([
        fields.get("summary"),
        fields.get("summary_en"),
        fields.get("description"),
    ])
    .or_else(|| description_doc.map(rich_text_to_plain).and_then(non_empty))
    .unwrap_or_default();

    PortfolioProject {
        id: sys_id.unwrap_or_else(|| slug.clone()),
        title: title.unwrap_or_else(|| "Untitled project".to_string()),
        summary: trim_summary(&summary, limits.project),
        duration: pick_text([fields.get("duration")]).unwrap_or_default(),
        actions_taken: pick_text([fields.get("actionsTaken"), fields.get("actions_taken")])
            .unwrap_or_default(),
        results: pick_text([
            fields.get("results"),
            fields.get("result"),
            fields.get("result_en"),
        ])
        .unwrap_or_default(),
        tags: pick_list([fields.get("tags"), fields.get("tags_en")]),
        rich_description: description_doc.cloned(),
        source: SourceKind::Remote,
        slug,
    }
}

fn service(entry: &Value, index: usize, limits: &SummaryLimits) -> Service {
    let fields = fields_of(entry);
    let sys_id = pick_text([entry.pointer("/sys/id")]);
    let title = raw_title(fields);
    let url = pick_text([fields.get("url")]);
    let slug = derive_slug(
        [
            explicit_slug(fields).as_deref(),
            title.as_deref(),
            url.as_deref(),
            sys_id.as_deref(),
        ],
        "service",
        index,
    );

    let summary = pick_text([
        fields.get("summary"),
        fields.get("summary_en"),
        fields.get("description"),
        fields.get("description_en"),
    ])
    .unwrap_or_default();

    Service {
        id: sys_id.unwrap_or_else(|| slug.clone()),
        title: title.unwrap_or_else(|| "Untitled service".to_string()),
        summary: trim_summary(&summary, limits.service),
        highlights: pick_list([
            fields.get("highlights"),
            fields.get("deliverables"),
            fields.get("features"),
            fields.get("points"),
            fields.get("tags"),
        ]),
        inquire_label: pick_text([fields.get("inquireLabel")])
            .unwrap_or_else(|| "Inquire".to_string()),
        source: SourceKind::Remote,
        slug,
    }
}
