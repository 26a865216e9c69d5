pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Category, CliConfig};
pub use config::{HubSettings, LocalStorage, RemoteSourceConfig};

pub use adapters::{FileStore, ManualClock, MemoryStore, SystemClock};
pub use core::{
    aggregator::ContentAggregator,
    cache::{CacheMode, FetchOptions, JsonCache},
    local::LocalReader,
    remote::RemoteClient,
};
pub use domain::model::{BlogPost, ContentSet, PortfolioProject, Service, SourceKind};
pub use utils::error::{ContentError, Result};
