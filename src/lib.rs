//! Metrics Cache - per-entity monitoring cache
//!
//! Bounded in-memory cache of entity metrics with LRU eviction, TTL
//! expiration and multi-resolution history compaction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::MetricsCache;
pub use config::Config;
pub use tasks::{spawn_cleanup_task, spawn_collector_task, MetricsSource};
