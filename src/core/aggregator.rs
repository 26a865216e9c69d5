//! Facade: loads both sources concurrently, merges them and memoizes the
//! result so concurrent callers share a single load.

use crate::adapters::{FileStore, MemoryStore};
use crate::config::remote::RemoteSourceConfig;
use crate::config::toml_config::{is_http_url, CacheSettings};
use crate::config::LocalStorage;
use crate::core::cache::{FetchOptions, JsonCache};
use crate::core::local::LocalReader;
use crate::core::merge::{merge_by_slug, resolve_blog_relations, sort_by_date_desc};
use crate::core::remote::RemoteClient;
use crate::domain::model::{BlogPost, ContentSet, PortfolioProject, Service};
use crate::domain::ports::{CacheStore, ConfigProvider, ContentSource};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::Validate;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};

type LoadOutput = std::result::Result<Arc<ContentSet>, Arc<ContentError>>;
type LoadFuture = Shared<BoxFuture<'static, LoadOutput>>;

struct Sources {
    local: Arc<dyn ContentSource>,
    remote: Arc<dyn ContentSource>,
}

pub struct ContentAggregator {
    sources: Arc<Sources>,
    memo: Mutex<Option<LoadFuture>>,
}

impl ContentAggregator {
    pub fn new(local: Arc<dyn ContentSource>, remote: Arc<dyn ContentSource>) -> Self {
        Self {
            sources: Arc::new(Sources { local, remote }),
            memo: Mutex::new(None),
        }
    }

    /// 依設定建立本地讀取器、遠端客戶端與快取
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let dataset = config.dataset();
        let cache_settings = config.cache_settings();
        let limits = config.summary_limits();

        let mut reader = LocalReader::new(LocalStorage::new("."), dataset);
        if is_http_url(dataset) || cache_settings.asset_base.is_some() {
            let options = if cache_settings.enabled {
                FetchOptions::default().with_ttl_ms(cache_settings.ttl_ms)
            } else {
                FetchOptions::bypass()
            };
            reader = reader.with_cache(build_cache(cache_settings)?, options);
            tracing::debug!("Dataset '{}' is read through the JSON cache", dataset);
        }

        let remote_config = match config.remote_config_path() {
            Some(path) => RemoteSourceConfig::from_file_or_disabled(path),
            None => {
                tracing::info!("Remote source not configured, using bundled dataset only");
                RemoteSourceConfig::default()
            }
        };
        if let Err(e) = remote_config.validate() {
            tracing::warn!("⚠️ Remote source will stay disabled: {}", e);
        }

        let remote = RemoteClient::new(remote_config, config.remote_settings().clone())
            .with_summary_limits(limits);

        Ok(Self::new(Arc::new(reader), Arc::new(remote)))
    }

    /// Loads, merges and sorts content. Concurrent and repeated calls share
    /// one result; a failed load is forgotten so the next call retries.
    pub async fn load(&self) -> Result<Arc<ContentSet>> {
        let future = {
            let mut memo = self.memo.lock().unwrap_or_else(|p| p.into_inner());
            match memo.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let sources = Arc::clone(&self.sources);
                    let future = async move {
                        run_cycle(&sources).await.map(Arc::new).map_err(Arc::new)
                    }
                    .boxed()
                    .shared();
                    *memo = Some(future.clone());
                    future
                }
            }
        };

        match future.clone().await {
            Ok(set) => Ok(set),
            Err(e) => {
                let mut memo = self.memo.lock().unwrap_or_else(|p| p.into_inner());
                // 只清除自己這一輪，避免蓋掉之後已開始的新載入
                if memo.as_ref().is_some_and(|current| current.ptr_eq(&future)) {
                    *memo = None;
                }
                Err(ContentError::LoadFailed(e))
            }
        }
    }

    /// Drops the memoized result; the next `load` starts a fresh cycle.
    pub fn invalidate(&self) {
        let mut memo = self.memo.lock().unwrap_or_else(|p| p.into_inner());
        *memo = None;
    }

    pub async fn get_blog_posts(&self) -> Result<Vec<BlogPost>> {
        Ok(self.load().await?.blog_posts.clone())
    }

    pub async fn get_portfolio_projects(&self) -> Result<Vec<PortfolioProject>> {
        Ok(self.load().await?.portfolio_projects.clone())
    }

    pub async fn get_services(&self) -> Result<Vec<Service>> {
        Ok(self.load().await?.services.clone())
    }
}

fn build_cache(settings: &CacheSettings) -> Result<JsonCache> {
    let store: Arc<dyn CacheStore> = match &settings.dir {
        Some(dir) => Arc::new(FileStore::new(dir).map_err(|e| ContentError::ConfigError {
            message: format!("cache.dir '{}' is not usable: {}", dir, e),
        })?),
        None => Arc::new(MemoryStore::new()),
    };

    let mut cache = JsonCache::new(store).with_max_entry_bytes(settings.max_entry_bytes);
    if let Some(asset_base) = &settings.asset_base {
        cache = cache.with_asset_base(asset_base)?;
    }
    if let Some(origin) = &settings.origin {
        cache = cache.with_origin(origin)?;
    }
    Ok(cache)
}

async fn run_cycle(sources: &Sources) -> Result<ContentSet> {
    let (local, remote) = tokio::join!(sources.local.fetch(), sources.remote.fetch());

    let remote = match remote {
        Ok(set) => Some(set),
        Err(e) => {
            tracing::warn!("⚠️ {} source unavailable: {}", sources.remote.name(), e);
            None
        }
    };

    let local = match (local, &remote) {
        (Ok(set), _) => set,
        (Err(e), Some(_)) => {
            tracing::warn!(
                "⚠️ {} source failed, continuing with {} content: {}",
                sources.local.name(),
                sources.remote.name(),
                e
            );
            ContentSet::default()
        }
        (Err(e), None) => {
            tracing::error!("❌ No content source produced data: {}", e);
            return Err(e);
        }
    };
    let remote = remote.unwrap_or_default();

    // 先排序：同標題時推薦指向最新的一篇
    let mut blog_posts = merge_by_slug(remote.blog_posts, local.blog_posts);
    sort_by_date_desc(&mut blog_posts);
    resolve_blog_relations(&mut blog_posts);

    let set = ContentSet {
        blog_posts,
        portfolio_projects: merge_by_slug(remote.portfolio_projects, local.portfolio_projects),
        services: merge_by_slug(remote.services, local.services),
    };

    tracing::info!(
        "✅ Content loaded: {} posts, {} projects, {} services",
        set.blog_posts.len(),
        set.portfolio_projects.len(),
        set.services.len()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SourceKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeSource {
        name: &'static str,
        calls: AtomicUsize,
        fail_first: usize,
        content: ContentSet,
    }

    impl FakeSource {
        fn ok(name: &'static str, content: ContentSet) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: AtomicUsize::new(0),
                fail_first: 0,
                content,
            })
        }

        fn failing(name: &'static str, fail_first: usize, content: ContentSet) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: AtomicUsize::new(0),
                fail_first,
                content,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self) -> Result<ContentSet> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if call < self.fail_first {
                return Err(ContentError::SourceUnavailable {
                    origin: self.name.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(self.content.clone())
        }
    }

    fn service(slug: &str, title: &str, source: SourceKind) -> Service {
        Service {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            summary: String::new(),
            highlights: Vec::new(),
            inquire_label: "Inquire".to_string(),
            source,
        }
    }

    fn post(slug: &str, title: &str, date: &str, source: SourceKind) -> BlogPost {
        BlogPost {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            summary: String::new(),
            body: String::new(),
            published_date: date.to_string(),
            author: String::new(),
            image_prompt: String::new(),
            rich_content: None,
            related_post_ids: Vec::new(),
            related_slugs: Vec::new(),
            recommended_post_titles: Vec::new(),
            recommended_slugs: Vec::new(),
            source,
        }
    }

    fn services(items: Vec<Service>) -> ContentSet {
        ContentSet {
            services: items,
            ..ContentSet::default()
        }
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_cycle() {
        let local = FakeSource::ok("local", services(vec![service("a", "A", SourceKind::Local)]));
        let remote = FakeSource::ok("remote", ContentSet::default());
        let aggregator = ContentAggregator::new(local.clone(), remote.clone());

        let (first, second) = tokio::join!(aggregator.load(), aggregator.load());
        let first = first.unwrap();
        let second = second.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(local.calls(), 1);
        assert_eq!(remote.calls(), 1);

        let third = aggregator.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_starts_new_cycle() {
        let local = FakeSource::ok("local", ContentSet::default());
        let remote = FakeSource::ok("remote", ContentSet::default());
        let aggregator = ContentAggregator::new(local.clone(), remote.clone());

        aggregator.load().await.unwrap();
        aggregator.invalidate();
        aggregator.load().await.unwrap();

        assert_eq!(local.calls(), 2);
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_wins_on_slug_collision() {
        let local = FakeSource::ok(
            "local",
            services(vec![
                service("seo", "Local SEO", SourceKind::Local),
                service("ads", "Local Ads", SourceKind::Local),
            ]),
        );
        let remote = FakeSource::ok(
            "remote",
            services(vec![service("SEO", "Remote SEO", SourceKind::Remote)]),
        );
        let aggregator = ContentAggregator::new(local, remote);

        let result = aggregator.get_services().await.unwrap();
        let titles: Vec<&str> = result.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["Remote SEO", "Local Ads"]);
    }

    #[tokio::test]
    async fn test_local_failure_with_remote_content_is_not_fatal() {
        let local = FakeSource::failing("local", usize::MAX, ContentSet::default());
        let remote = FakeSource::ok(
            "remote",
            services(vec![service("r", "Remote", SourceKind::Remote)]),
        );
        let aggregator = ContentAggregator::new(local, remote);

        let result = aggregator.load().await.unwrap();
        assert_eq!(result.services.len(), 1);
        assert_eq!(result.services[0].source, SourceKind::Remote);
    }

    #[tokio::test]
    async fn test_fatal_failure_is_not_memoized() {
        let local = FakeSource::failing(
            "local",
            1,
            services(vec![service("a", "A", SourceKind::Local)]),
        );
        let remote = FakeSource::failing("remote", usize::MAX, ContentSet::default());
        let aggregator = ContentAggregator::new(local.clone(), remote);

        let err = aggregator.load().await.unwrap_err();
        assert!(matches!(err, ContentError::LoadFailed(_)));

        let retried = aggregator.load().await.unwrap();
        assert_eq!(retried.services.len(), 1);
        assert_eq!(local.calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_failure_alone_keeps_local_content() {
        let local = FakeSource::ok("local", services(vec![service("a", "A", SourceKind::Local)]));
        let remote = FakeSource::failing("remote", usize::MAX, ContentSet::default());
        let aggregator = ContentAggregator::new(local, remote);

        let result = aggregator.get_services().await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source, SourceKind::Local);
    }

    #[tokio::test]
    async fn test_recommended_title_resolves_to_newest_post() {
        let remote = FakeSource::ok(
            "remote",
            ContentSet {
                blog_posts: vec![post("tips-2019", "Tips", "2019-03-01", SourceKind::Remote)],
                ..ContentSet::default()
            },
        );
        let mut reader = post("reader", "Reader", "2020-01-01", SourceKind::Local);
        reader.recommended_post_titles = vec!["Tips".to_string()];
        let local = FakeSource::ok(
            "local",
            ContentSet {
                blog_posts: vec![
                    post("tips-2024", "Tips", "2024-05-01", SourceKind::Local),
                    reader,
                ],
                ..ContentSet::default()
            },
        );
        let aggregator = ContentAggregator::new(local, remote);

        let posts = aggregator.get_blog_posts().await.unwrap();
        let order: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["tips-2024", "reader", "tips-2019"]);

        let reader = posts.iter().find(|p| p.slug == "reader").unwrap();
        assert_eq!(reader.recommended_slugs, vec!["tips-2024"]);
    }
}
