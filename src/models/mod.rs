//! Request and Response models for the metrics cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ConfigRequest, SampleRequest};
pub use responses::{
    ConfigResponse, EntityMetricsResponse, HealthResponse, RecordResponse, RemovedResponse,
    StatsResponse,
};
