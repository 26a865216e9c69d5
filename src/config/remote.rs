use crate::core::fields::to_list;
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_credential, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub const DEFAULT_ENVIRONMENT: &str = "master";

/// Remote CMS source configuration (`contentful-config.json` shape).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSourceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub space_id: String,
    #[serde(default)]
    pub delivery_token: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub content_types: ContentTypes,
}

/// Category → CMS content type ids. Each accepts a string, a comma-separated
/// string or a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypes {
    #[serde(default, deserialize_with = "string_or_list")]
    pub blog_posts: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub portfolio_projects: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub services: Vec<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(to_list(&value))
}

impl RemoteSourceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ContentError::ConfigValidationError {
            field: "remote_config".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    /// 讀取失敗時回傳停用的設定，不影響本地資料
    pub fn from_file_or_disabled<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Remote source config '{}' unavailable, remote source disabled: {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Environment name, `"master"` when absent or blank.
    pub fn environment(&self) -> &str {
        self.environment
            .as_deref()
            .map(str::trim)
            .filter(|env| !env.is_empty())
            .unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn has_credentials(&self) -> bool {
        !self.space_id.trim().is_empty() && !self.delivery_token.trim().is_empty()
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && self.has_credentials()
    }
}

impl Validate for RemoteSourceConfig {
    fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        validate_credential("remote_config.spaceId", &self.space_id)?;
        validate_credential("remote_config.deliveryToken", &self.delivery_token)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_content_types_in_every_shape() {
        let config = RemoteSourceConfig::from_json_str(
            r#"{
                "enabled": true,
                "spaceId": "abc",
                "deliveryToken": "tok",
                "contentTypes": {
                    "blogPosts": ["blogPost", " legacyPost "],
                    "portfolioProjects": "project, caseStudy",
                    "services": "service"
                }
            }"#,
        )
        .unwrap();

        assert!(config.is_usable());
        assert_eq!(config.environment(), "master");
        assert_eq!(config.content_types.blog_posts, vec!["blogPost", "legacyPost"]);
        assert_eq!(
            config.content_types.portfolio_projects,
            vec!["project", "caseStudy"]
        );
        assert_eq!(config.content_types.services, vec!["service"]);
    }

    #[test]
    fn test_blank_environment_defaults_to_master() {
        let config = RemoteSourceConfig::from_json_str(
            r#"{"enabled": true, "spaceId": "a", "deliveryToken": "b", "environment": "  "}"#,
        )
        .unwrap();
        assert_eq!(config.environment(), "master");
    }

    #[test]
    fn test_missing_credentials_disable_source() {
        let config =
            RemoteSourceConfig::from_json_str(r#"{"enabled": true, "spaceId": "a"}"#).unwrap();
        assert!(!config.is_usable());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unreadable_config_falls_back_to_disabled() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ not json").unwrap();

        let config = RemoteSourceConfig::from_file_or_disabled(temp_file.path());
        assert!(!config.enabled);

        let missing = RemoteSourceConfig::from_file_or_disabled("/nonexistent/remote.json");
        assert!(!missing.is_usable());
    }
}
