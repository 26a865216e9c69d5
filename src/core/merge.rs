use crate::domain::model::{BlogPost, Slugged};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};

/// Unions two lists keyed by lowercased slug. `preferred` entries win on
/// collision; first-seen order is kept. Entries without a slug are dropped.
pub fn merge_by_slug<T: Slugged>(preferred: Vec<T>, fallback: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(preferred.len() + fallback.len());

    for item in preferred.into_iter().chain(fallback) {
        let key = item.slug().trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            merged.push(item);
        } else {
            tracing::debug!("Duplicate slug '{}' discarded", item.slug());
        }
    }

    merged
}

/// Resolves raw cross-references into slugs: `related_post_ids` through the
/// id map, `recommended_post_titles` through the (first-wins) title map.
/// The post's own slug and duplicates are removed; unknown references are
/// dropped.
pub fn resolve_blog_relations(posts: &mut [BlogPost]) {
    let mut id_to_slug: HashMap<String, String> = HashMap::new();
    let mut title_to_slug: HashMap<String, String> = HashMap::new();

    for post in posts.iter() {
        let slug = post.slug.trim();
        if slug.is_empty() {
            continue;
        }
        if !post.id.is_empty() {
            id_to_slug.insert(post.id.clone(), slug.to_string());
        }
        let title_key = post.title.trim().to_lowercase();
        if !title_key.is_empty() {
            title_to_slug
                .entry(title_key)
                .or_insert_with(|| slug.to_string());
        }
    }

    for post in posts.iter_mut() {
        let own_slug = post.slug.trim().to_string();

        let from_ids = post
            .related_post_ids
            .iter()
            .filter_map(|id| id_to_slug.get(id.trim()));
        post.related_slugs = unique_excluding(
            post.related_slugs.iter().chain(from_ids),
            &own_slug,
        );

        let from_titles = post
            .recommended_post_titles
            .iter()
            .filter_map(|title| title_to_slug.get(&title.trim().to_lowercase()));
        post.recommended_slugs = unique_excluding(
            post.recommended_slugs.iter().chain(from_titles),
            &own_slug,
        );
    }
}

fn unique_excluding<'a, I>(slugs: I, own_slug: &str) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    slugs
        .filter(|slug| !slug.is_empty() && slug.as_str() != own_slug)
        .filter(|slug| seen.insert(*slug))
        .cloned()
        .collect()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Hand-authored dates: `2024/01/05`, `March 3, 2024`, `Mar 3 2024`,
/// `3 March 2024`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y"];

/// Milliseconds since the epoch; `None` for anything unparsable.
pub fn parse_publish_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.timestamp_millis());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}

/// Newest first; unparsable dates sort as oldest. Stable for ties.
pub fn sort_by_date_desc(posts: &mut [BlogPost]) {
    posts.sort_by_cached_key(|post| {
        std::cmp::Reverse(parse_publish_date(&post.published_date).unwrap_or(i64::MIN))
    });
}
