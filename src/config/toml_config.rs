use crate::core::cache::{DEFAULT_MAX_ENTRY_BYTES, DEFAULT_TTL_MS};
use crate::core::normalize::SummaryLimits;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{
    validate_http_url, validate_location, validate_page_size, validate_summary_limit,
    validate_ttl_ms, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATASET: &str = "content/site-content.json";
pub const DEFAULT_REMOTE_CONFIG: &str = "content/contentful-config.json";
pub const DEFAULT_API_BASE: &str = "https://cdn.contentful.com";
pub const DEFAULT_ORDER: &str = "-fields.publishedDate,-sys.createdAt";

/// 內容匯整設定（TOML）。所有區段皆可省略。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub sources: SourcesSettings,
    pub remote: RemoteSettings,
    pub cache: CacheSettings,
    pub summary: SummaryLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesSettings {
    /// Bundled dataset: a file path or an http(s) URL.
    pub dataset: String,
    /// Remote source JSON config; remote source is disabled when unset.
    pub remote_config: Option<String>,
}

impl Default for SourcesSettings {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            remote_config: Some(DEFAULT_REMOTE_CONFIG.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub api_base: String,
    pub page_size: usize,
    pub include_depth: u32,
    pub order: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: 100,
            include_depth: 2,
            order: DEFAULT_ORDER.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_ms: i64,
    pub max_entry_bytes: usize,
    /// Persistent store directory; entries live in memory when unset.
    pub dir: Option<String>,
    /// Base relative URLs resolve against first.
    pub asset_base: Option<String>,
    /// Site origin, used for root-relative resolution.
    pub origin: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: DEFAULT_TTL_MS,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            dir: None,
            asset_base: None,
            origin: None,
        }
    }
}

impl HubSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ContentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DELIVERY_TOKEN})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn dataset_is_url(&self) -> bool {
        is_http_url(&self.sources.dataset)
    }
}

pub fn is_http_url(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl ConfigProvider for HubSettings {
    fn dataset(&self) -> &str {
        &self.sources.dataset
    }

    fn remote_config_path(&self) -> Option<&str> {
        self.sources.remote_config.as_deref()
    }

    fn remote_settings(&self) -> &RemoteSettings {
        &self.remote
    }

    fn cache_settings(&self) -> &CacheSettings {
        &self.cache
    }

    fn summary_limits(&self) -> SummaryLimits {
        self.summary
    }
}

impl Validate for HubSettings {
    fn validate(&self) -> Result<()> {
        validate_location("sources.dataset", &self.sources.dataset)?;
        if let Some(remote_config) = &self.sources.remote_config {
            validate_location("sources.remote_config", remote_config)?;
        }

        validate_http_url("remote.api_base", &self.remote.api_base)?;
        validate_page_size("remote.page_size", self.remote.page_size)?;

        validate_ttl_ms("cache.ttl_ms", self.cache.ttl_ms)?;
        if let Some(asset_base) = &self.cache.asset_base {
            validate_http_url("cache.asset_base", asset_base)?;
        }
        if let Some(origin) = &self.cache.origin {
            validate_http_url("cache.origin", origin)?;
        }

        for (field, value) in [
            ("summary.blog", self.summary.blog),
            ("summary.blog_body", self.summary.blog_body),
            ("summary.project", self.summary.project),
            ("summary.service", self.summary.service),
        ] {
            validate_summary_limit(field, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings = HubSettings::from_toml_str("").unwrap();

        assert_eq!(settings.sources.dataset, DEFAULT_DATASET);
        assert_eq!(settings.remote.page_size, 100);
        assert_eq!(settings.remote.include_depth, 2);
        assert_eq!(settings.cache.ttl_ms, 5 * 60 * 1000);
        assert_eq!(settings.summary, SummaryLimits::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
[sources]
dataset = "https://example.com/content/site-content.json"
remote_config = "config/remote.json"

[remote]
api_base = "https://cms.example.com"
page_size = 50
timeout_seconds = 10

[cache]
ttl_ms = 1000
dir = ".cache/content"
asset_base = "https://example.com/assets/"

[summary]
blog = 120
"#;

        let settings = HubSettings::from_toml_str(toml_content).unwrap();

        assert!(settings.dataset_is_url());
        assert_eq!(settings.remote.page_size, 50);
        assert_eq!(settings.remote.order, DEFAULT_ORDER);
        assert_eq!(settings.cache.dir.as_deref(), Some(".cache/content"));
        assert_eq!(settings.summary.blog, 120);
        assert_eq!(settings.summary.service, 220);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTENT_HUB_TEST_API_BASE", "https://cms.test.com");

        let toml_content = r#"
[remote]
api_base = "${CONTENT_HUB_TEST_API_BASE}"
"#;

        let settings = HubSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.remote.api_base, "https://cms.test.com");

        std::env::remove_var("CONTENT_HUB_TEST_API_BASE");
    }

    #[test]
    fn test_settings_validation() {
        let settings = HubSettings::from_toml_str(
            r#"
[remote]
api_base = "invalid-url"
"#,
        )
        .unwrap();
        assert!(settings.validate().is_err());

        let settings = HubSettings::from_toml_str(
            r#"
[remote]
page_size = 0
"#,
        )
        .unwrap();
        assert!(settings.validate().is_err());

        let settings = HubSettings::from_toml_str("[cache]\nttl_ms = -1\n").unwrap();
        assert!(settings.validate().is_err());

        let settings = HubSettings::from_toml_str("[summary]\nservice = 3\n").unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("summary.service"));
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[sources]\ndataset = \"data/site.json\"\n")
            .unwrap();

        let settings = HubSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.dataset(), "data/site.json");
        assert_eq!(settings.remote_config_path(), Some(DEFAULT_REMOTE_CONFIG));
    }
}
