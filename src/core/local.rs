use crate::core::cache::{FetchOptions, JsonCache};
use crate::core::normalize::local as normalize_local;
use crate::domain::model::ContentSet;
use crate::domain::ports::{ContentSource, Storage};
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// 讀取隨站附帶的本地資料集（必要來源）
pub struct LocalReader<S: Storage> {
    storage: S,
    dataset: String,
    cache: Option<(JsonCache, FetchOptions)>,
}

impl<S: Storage> LocalReader<S> {
    pub fn new(storage: S, dataset: impl Into<String>) -> Self {
        Self {
            storage,
            dataset: dataset.into(),
            cache: None,
        }
    }

    /// Retrieve the dataset over HTTP through the JSON cache instead of the
    /// storage backend.
    pub fn with_cache(mut self, cache: JsonCache, options: FetchOptions) -> Self {
        self.cache = Some((cache, options));
        self
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    async fn read_document(&self) -> Result<Value> {
        match &self.cache {
            Some((cache, options)) => cache.fetch_json(&self.dataset, options).await,
            None => {
                let bytes = self.storage.read_file(&self.dataset).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        }
    }

    /// Fails only when the document cannot be retrieved or parsed.
    pub async fn read(&self) -> Result<ContentSet> {
        let document = self
            .read_document()
            .await
            .map_err(|e| ContentError::LocalReadError {
                path: self.dataset.clone(),
                message: e.to_string(),
            })?;

        if !document.is_object() {
            return Err(ContentError::LocalReadError {
                path: self.dataset.clone(),
                message: "dataset root must be a JSON object".to_string(),
            });
        }

        let set = normalize_local::normalize_document(&document);
        tracing::info!(
            "📂 Local dataset: {} posts, {} projects, {} services",
            set.blog_posts.len(),
            set.portfolio_projects.len(),
            set.services.len()
        );
        Ok(set)
    }
}

#[async_trait]
impl<S: Storage> ContentSource for LocalReader<S> {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch(&self) -> Result<ContentSet> {
        self.read().await
    }
}
