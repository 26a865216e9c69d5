//! Field-level helpers shared by both normalizers: ordered-candidate
//! selection, slug derivation, rich-text flattening and list coercion.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub const MAX_SLUG_LEN: usize = 120;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// First candidate that is a non-empty string, number or boolean, rendered
/// as trimmed text.
pub fn pick_text<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().flatten().find_map(scalar_text)
}

/// First candidate that is a non-empty sequence or a non-empty string,
/// coerced to a list of strings.
pub fn pick_list<'a, I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| match value {
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.trim().is_empty(),
            _ => false,
        })
        .map(to_list)
        .unwrap_or_default()
}

/// First candidate that is a non-null object.
pub fn pick_object<'a, I>(candidates: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().flatten().find(|value| value.is_object())
}

/// Wraps a computed string as a candidate result: `None` when blank.
pub fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts a real sequence or a comma-separated string; yields trimmed,
/// non-empty entries in order.
pub fn to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn slugify(input: &str) -> String {
    // 先轉小寫：小寫形式本身可能帶組合符號（İ → i + U+0307）
    let folded: String = input
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let hyphenated = NON_ALNUM.replace_all(&folded, "-");
    let trimmed = hyphenated.trim_matches('-');

    // 只剩 ASCII，可直接依位元組截斷
    let capped = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];
    capped.trim_end_matches('-').to_string()
}

/// Slug from the first candidate that slugifies to something non-empty,
/// else the positional placeholder `<kind>-<index+1>`.
pub fn derive_slug<'a, I>(candidates: I, kind: &str, index: usize) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(slugify)
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| format!("{}-{}", kind, index + 1))
}

/// Flattens a rich-text document (nodes tagged with `nodeType`, leaves
/// carrying `value`, branches carrying `content`) into plain text.
pub fn rich_text_to_plain(node: &Value) -> String {
    match node {
        Value::Array(nodes) => join_plain(nodes),
        Value::Object(map) => {
            if map.get("nodeType").and_then(Value::as_str) == Some("text") {
                return match map.get("value") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
            }
            match map.get("content") {
                Some(Value::Array(children)) => join_plain(children),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

fn join_plain(nodes: &[Value]) -> String {
    nodes
        .iter()
        .map(rich_text_to_plain)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Collapses whitespace and cuts to `max_len` characters, ending in `...`
/// when truncated.
pub fn trim_summary(text: &str, max_len: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }

    let kept: String = collapsed.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= MAX_SLUG_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn test_slugify_basic_title() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --Growth   Tips--  "), "growth-tips");
    }

    #[test]
    fn test_slugify_strips_diacritics() {
        assert_eq!(slugify("Café Crème Brûlée"), "cafe-creme-brulee");
        assert_eq!(slugify("Ärger über Öl"), "arger-uber-ol");
    }

    #[test]
    fn test_slugify_folds_marks_introduced_by_lowercasing() {
        assert_eq!(slugify("İstanbul Guide"), "istanbul-guide");
        assert_eq!(slugify("ÉCOLE"), "ecole");
    }

    #[test]
    fn test_slugify_caps_length_without_trailing_hyphen() {
        let long_title = "word ".repeat(60);
        let slug = slugify(&long_title);

        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_slugify_is_stable_and_idempotent() {
        let repeated = "a-".repeat(80);
        let inputs = [
            "Hello, World!",
            "Résumé & CV — 2024 Edition",
            "___weird___input___",
            "Ωmega 10x Growth",
            repeated.as_str(),
        ];

        for input in inputs {
            let once = slugify(input);
            assert_eq!(once, slugify(input));
            assert_eq!(once, slugify(&once));
            if !once.is_empty() {
                assert!(is_valid_slug(&once), "invalid slug {:?}", once);
            }
        }
    }

    #[test]
    fn test_derive_slug_falls_back_to_placeholder() {
        assert_eq!(derive_slug([Some(""), None], "blog", 2), "blog-3");
        assert_eq!(derive_slug([Some("!!!"), Some("post-7")], "blog", 0), "post-7");
        assert_eq!(derive_slug([None, Some("My Post")], "blog", 0), "my-post");
    }

    #[test]
    fn test_pick_text_skips_blank_and_structured_values() {
        let blank = json!("   ");
        let object = json!({"sys": {"id": "x"}});
        let title = json!("  Title  ");
        assert_eq!(
            pick_text([Some(&blank), None, Some(&object), Some(&title)]),
            Some("Title".to_string())
        );

        let number = json!(42);
        assert_eq!(pick_text([Some(&number)]), Some("42".to_string()));
        assert_eq!(pick_text([Some(&blank)]), None);
    }

    #[test]
    fn test_pick_list_accepts_sequence_or_comma_string() {
        let empty = json!([]);
        let csv = json!(" seo, growth ,, ads ");
        assert_eq!(pick_list([Some(&empty), Some(&csv)]), vec!["seo", "growth", "ads"]);

        let array = json!(["a", " b ", "", 3]);
        assert_eq!(pick_list([Some(&array)]), vec!["a", "b", "3"]);

        let object = json!({"a": 1});
        assert!(pick_list([Some(&object)]).is_empty());
    }

    #[test]
    fn test_pick_object_ignores_null() {
        let null = Value::Null;
        let doc = json!({"nodeType": "document", "content": []});
        assert_eq!(pick_object([Some(&null), Some(&doc)]), Some(&doc));
        assert_eq!(pick_object([Some(&null)]), None);
    }

    #[test]
    fn test_rich_text_to_plain_concatenates_leaves() {
        let doc = json!({
            "nodeType": "document",
            "content": [
                {"nodeType": "paragraph", "content": [
                    {"nodeType": "text", "value": "Grow"},
                    {"nodeType": "text", "value": "faster."}
                ]},
                {"nodeType": "paragraph", "content": [
                    {"nodeType": "hyperlink", "content": [{"nodeType": "text", "value": "Read more"}]}
                ]},
                {"nodeType": "embedded-entry-block", "data": {}}
            ]
        });

        assert_eq!(rich_text_to_plain(&doc), "Grow faster. Read more");
        assert_eq!(rich_text_to_plain(&Value::Null), "");
    }

    #[test]
    fn test_trim_summary() {
        assert_eq!(trim_summary("  short \n text ", 20), "short text");

        let long = "abcdefghij ".repeat(5);
        let trimmed = trim_summary(&long, 20);
        assert_eq!(trimmed.chars().count(), 20);
        assert!(trimmed.ends_with("..."));
        assert_eq!(trimmed, "abcdefghij abcdef...");
    }
}
