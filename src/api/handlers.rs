//! API Handlers
//!
//! HTTP request handlers exposing the metrics cache.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::cache::{CacheStore, EntityKey, MetricsCache};
use crate::error::{CacheError, Result};
use crate::models::{
    ConfigRequest, ConfigResponse, EntityMetricsResponse, HealthResponse, RecordResponse,
    RemovedResponse, SampleRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: MetricsCache,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(store: CacheStore) -> Self {
        Self {
            cache: MetricsCache::from_store(store),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            cache: MetricsCache::from_config(config),
        }
    }
}

/// Handler for GET /metrics/:namespace/:name
///
/// Returns current usage and history for one entity.
pub async fn get_metrics_handler(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<EntityMetricsResponse>> {
    let key = EntityKey::new(namespace, name);
    let entry = state
        .cache
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

    Ok(Json(entry.into()))
}

/// Handler for PUT /metrics/:namespace/:name
///
/// Records a fresh sample for one entity.
pub async fn record_sample_handler(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(req): Json<SampleRequest>,
) -> Result<Json<RecordResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = EntityKey::new(namespace, name);
    let response = RecordResponse::new(key.to_string());
    state.cache.set(key, req.into_sample(Utc::now())).await;

    Ok(Json(response))
}

/// Handler for DELETE /metrics
///
/// Drops every cached entity.
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear().await;
    Json(RemovedResponse::cleared(removed))
}

/// Handler for POST /metrics/cleanup
///
/// Removes stale entities immediately instead of waiting for the sweep.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clean_expired().await;
    Json(RemovedResponse::expired(removed))
}

/// Handler for GET /config
pub async fn get_config_handler(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(config_snapshot(&state.cache).await)
}

/// Handler for PUT /config
///
/// Non-positive values are accepted and replaced by the cache defaults.
pub async fn update_config_handler(
    State(state): State<AppState>,
    Json(req): Json<ConfigRequest>,
) -> Json<ConfigResponse> {
    if let Some(max_entries) = req.capacity() {
        state.cache.set_max_entries(max_entries).await;
    }
    if let Some(interval) = req.aggregation_interval() {
        state.cache.set_aggregation_interval(interval).await;
    }
    Json(config_snapshot(&state.cache).await)
}

async fn config_snapshot(cache: &MetricsCache) -> ConfigResponse {
    ConfigResponse {
        max_entries: cache.max_entries().await,
        ttl_secs: cache.ttl().await.as_secs(),
        aggregation_interval_secs: cache.aggregation_interval().await.as_secs(),
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
