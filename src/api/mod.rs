//! API Module
//!
//! HTTP handlers and routing for the metrics cache REST API.
//!
//! # Endpoints
//! - `GET /metrics/:namespace/:name` - Current usage and history for an entity
//! - `PUT /metrics/:namespace/:name` - Record a sample
//! - `DELETE /metrics` - Clear the cache
//! - `POST /metrics/cleanup` - Remove stale entities
//! - `GET /config`, `PUT /config` - Cache configuration
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
