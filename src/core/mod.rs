pub mod aggregator;
pub mod cache;
pub mod fields;
pub mod local;
pub mod merge;
pub mod normalize;
pub mod remote;

pub use crate::domain::model::{BlogPost, ContentSet, PortfolioProject, Service, SourceKind};
pub use crate::domain::ports::{CacheStore, Clock, ConfigProvider, ContentSource, Storage};
pub use crate::utils::error::Result;
pub use aggregator::ContentAggregator;
pub use cache::{CacheMode, FetchOptions, JsonCache};
pub use local::LocalReader;
pub use remote::RemoteClient;
