//! Benchmark orchestration service library.

// Core engines
pub mod aggregation;
pub mod orchestrator;

// Collaborators
pub mod error;
pub mod store;

// Surface and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
