//! Order aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! POST /analytics/aggregate | /json/aggregate (raw body)
//!     → aggregator.rs: parse_batch | parse_orders (400 on malformed input,
//!       no pool access)
//!     → pool.rs: acquire PooledAccumulator
//!     → accumulator.rs: fold completed orders
//!     → snapshot maps into AggregateResult
//!     → guard drop: clear + return to pool
//! ```
//!
//! # Design Decisions
//! - The pool is an injected object, not a process-wide static
//! - Loans are RAII guards, so release cannot be skipped
//! - Responses carry copies of the maps; pooled maps never escape

pub mod accumulator;
pub mod aggregator;
pub mod pool;
pub mod types;

pub use accumulator::Accumulator;
pub use aggregator::{parse_batch, parse_orders, OrderAggregator};
pub use pool::{AccumulatorPool, PooledAccumulator};
pub use types::{AggregateResult, AnalyticsRequest, JsonAggregateResult, LineItem, Order, COMPLETED};
