use crate::core::normalize::SummaryLimits;
use crate::domain::model::ContentSet;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Key/value area the JSON cache persists into. Calls may fail (quota,
/// disabled storage); callers treat every failure as a cache miss.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset(&self) -> &str;
    fn remote_config_path(&self) -> Option<&str>;
    fn remote_settings(&self) -> &crate::config::toml_config::RemoteSettings;
    fn cache_settings(&self) -> &crate::config::toml_config::CacheSettings;
    fn summary_limits(&self) -> SummaryLimits;
}

/// 一個內容來源（本地資料集或遠端 CMS）
#[async_trait]
pub trait ContentSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the normalized content of this source, or an error when the
    /// source produced nothing usable.
    async fn fetch(&self) -> Result<ContentSet>;
}
