use crate::config::remote::RemoteSourceConfig;
use crate::config::toml_config::RemoteSettings;
use crate::core::normalize::{remote as normalize_remote, SummaryLimits};
use crate::domain::model::ContentSet;
use crate::domain::ports::ContentSource;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Entries of one or more content types plus the linked entities/assets the
/// API attached to them, keyed by `sys.id`.
#[derive(Debug, Clone, Default)]
pub struct EntryBatch {
    pub items: Vec<Value>,
    pub included_entries: HashMap<String, Value>,
    pub included_assets: HashMap<String, Value>,
}

impl EntryBatch {
    fn absorb(&mut self, other: EntryBatch) {
        self.items.extend(other.items);
        self.included_entries.extend(other.included_entries);
        self.included_assets.extend(other.included_assets);
    }
}

/// Result of fetching a category: the accumulated batch and how many of its
/// declared types failed.
#[derive(Debug, Clone, Default)]
pub struct CategoryFetch {
    pub batch: EntryBatch,
    pub requested_types: usize,
    pub failed_types: usize,
}

#[derive(Debug, Deserialize)]
struct EntriesPage {
    #[serde(default)]
    items: Vec<Value>,
    total: Option<u64>,
    limit: Option<u64>,
    #[serde(default)]
    includes: PageIncludes,
}

#[derive(Debug, Default, Deserialize)]
struct PageIncludes {
    #[serde(rename = "Entry", default)]
    entries: Vec<Value>,
    #[serde(rename = "Asset", default)]
    assets: Vec<Value>,
}

fn index_by_sys_id(target: &mut HashMap<String, Value>, linked: Vec<Value>) {
    for item in linked {
        let id = item
            .pointer("/sys/id")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(id) = id {
            target.insert(id, item);
        }
    }
}

/// 遠端 CMS 客戶端（分頁讀取 entries API）
pub struct RemoteClient {
    config: RemoteSourceConfig,
    settings: RemoteSettings,
    limits: SummaryLimits,
    client: Client,
}

impl RemoteClient {
    pub fn new(config: RemoteSourceConfig, settings: RemoteSettings) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
            Client::new()
        });

        Self {
            config,
            settings,
            limits: SummaryLimits::default(),
            client,
        }
    }

    pub fn with_summary_limits(mut self, limits: SummaryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &RemoteSourceConfig {
        &self.config
    }

    /// Enabled and carrying both a space id and a delivery token.
    pub fn is_enabled(&self) -> bool {
        self.config.is_usable()
    }

    fn entries_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.settings.api_base).map_err(|e| {
            ContentError::InvalidConfigValueError {
                field: "remote.api_base".to_string(),
                value: self.settings.api_base.clone(),
                reason: e.to_string(),
            }
        })?;

        url.path_segments_mut()
            .map_err(|_| ContentError::InvalidConfigValueError {
                field: "remote.api_base".to_string(),
                value: self.settings.api_base.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend([
                "spaces",
                self.config.space_id.trim(),
                "environments",
                self.config.environment(),
                "entries",
            ]);

        Ok(url)
    }

    /// Pages through every entry of one content type. Any non-2xx response
    /// aborts this type with an error.
    pub async fn fetch_type(&self, content_type: &str) -> Result<EntryBatch> {
        let endpoint = self.entries_url()?;
        let page_size = self.settings.page_size.max(1) as u64;
        let include_depth = self.settings.include_depth.to_string();
        let limit_param = page_size.to_string();

        let mut batch = EntryBatch::default();
        let mut skip: u64 = 0;

        loop {
            tracing::debug!(
                "📡 Fetching '{}' entries (skip={}, limit={})",
                content_type,
                skip,
                page_size
            );

            let response = self
                .client
                .get(endpoint.clone())
                .query(&[
                    ("access_token", self.config.delivery_token.trim()),
                    ("content_type", content_type),
                    ("include", include_depth.as_str()),
                    ("limit", limit_param.as_str()),
                    ("skip", skip.to_string().as_str()),
                    ("order", self.settings.order.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ContentError::RemoteStatusError {
                    content_type: content_type.to_string(),
                    status: status.as_u16(),
                });
            }

            let page: EntriesPage = response.json().await?;
            let page_len = page.items.len();
            batch.items.extend(page.items);
            index_by_sys_id(&mut batch.included_entries, page.includes.entries);
            index_by_sys_id(&mut batch.included_assets, page.includes.assets);

            let total = page.total.unwrap_or(batch.items.len() as u64);
            skip += page.limit.filter(|limit| *limit > 0).unwrap_or(page_size);

            // 空頁或已達總數即停止
            if page_len == 0 || skip >= total {
                break;
            }
        }

        tracing::debug!(
            "📡 Fetched {} '{}' entries ({} linked entries, {} assets)",
            batch.items.len(),
            content_type,
            batch.included_entries.len(),
            batch.included_assets.len()
        );

        Ok(batch)
    }

    /// Fetches every declared type of a category concurrently. A failing
    /// type contributes an empty batch instead of failing the category.
    pub async fn fetch_category(&self, content_types: &[String]) -> CategoryFetch {
        let results = join_all(
            content_types
                .iter()
                .map(|content_type| self.fetch_type(content_type)),
        )
        .await;

        let mut fetch = CategoryFetch {
            requested_types: content_types.len(),
            ..Default::default()
        };

        for (content_type, result) in content_types.iter().zip(results) {
            match result {
                Ok(batch) => fetch.batch.absorb(batch),
                Err(e) => {
                    fetch.failed_types += 1;
                    tracing::warn!("⚠️ Remote content type '{}' skipped: {}", content_type, e);
                }
            }
        }

        fetch
    }

    /// Fetches and normalizes all three categories. Errors only when the
    /// source is disabled or every declared content type failed.
    pub async fn fetch_content(&self) -> Result<ContentSet> {
        if !self.is_enabled() {
            return Err(ContentError::SourceUnavailable {
                origin: self.name().to_string(),
                reason: "disabled or missing credentials".to_string(),
            });
        }

        let types = &self.config.content_types;
        let (blog, projects, services) = tokio::join!(
            self.fetch_category(&types.blog_posts),
            self.fetch_category(&types.portfolio_projects),
            self.fetch_category(&types.services),
        );

        let requested = blog.requested_types + projects.requested_types + services.requested_types;
        let failed = blog.failed_types + projects.failed_types + services.failed_types;
        if requested > 0 && failed == requested {
            return Err(ContentError::SourceUnavailable {
                origin: self.name().to_string(),
                reason: format!("all {} content type requests failed", requested),
            });
        }

        let set = normalize_remote::normalize_batches(
            &blog.batch,
            &projects.batch,
            &services.batch,
            &self.limits,
        );
        tracing::info!(
            "📡 Remote source: {} posts, {} projects, {} services",
            set.blog_posts.len(),
            set.portfolio_projects.len(),
            set.services.len()
        );
        Ok(set)
    }
}

#[async_trait]
impl ContentSource for RemoteClient {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self) -> Result<ContentSet> {
        self.fetch_content().await
    }
}
