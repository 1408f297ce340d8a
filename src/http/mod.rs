//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / echo x-request-id)
//!     → handlers.rs
//!         GET  /health                  → store ping
//!         GET  /db/user-profile/{email} → ProfileOrchestrator
//!         POST /analytics/aggregate     → OrderAggregator
//!         POST /json/aggregate          → OrderAggregator (bare array)
//!     → ServiceError / JSON body → client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{X_CLIENT_ID, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
