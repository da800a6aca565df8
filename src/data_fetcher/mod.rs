pub mod api;
pub mod cache;
pub mod processors;
pub mod provider;

pub use api::HttpProvider;
pub use cache::{CachedProvider, MemoStats};
pub use provider::{ArsenalMetric, PlayerRole, StatKind, StatsProvider, TableRequest};
