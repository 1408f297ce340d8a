use std::sync::Arc;

use crate::aggregation::pool::AccumulatorPool;
use crate::aggregation::types::{AggregateResult, AnalyticsRequest, Order};
use crate::error::{ServiceError, ServiceResult};
use crate::observability::metrics;

/// Parse a raw request body into a batch.
///
/// Runs before any accumulator is taken from the pool, so a malformed body
/// costs no pool traffic.
pub fn parse_batch(body: &[u8]) -> ServiceResult<AnalyticsRequest> {
    serde_json::from_slice(body).map_err(|e| ServiceError::Input(format!("invalid order batch: {e}")))
}

/// Parse a raw request body holding a bare JSON array of orders. Like
/// [`parse_batch`], this never touches the pool.
pub fn parse_orders(body: &[u8]) -> ServiceResult<Vec<Order>> {
    serde_json::from_slice(body).map_err(|e| ServiceError::Input(format!("invalid order list: {e}")))
}

/// Folds order batches using accumulators borrowed from a shared pool.
#[derive(Clone)]
pub struct OrderAggregator {
    pool: Arc<AccumulatorPool>,
}

impl OrderAggregator {
    pub fn new(pool: Arc<AccumulatorPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AccumulatorPool {
        &self.pool
    }

    /// Aggregate `orders`, echoing `client_id` verbatim (empty if absent).
    pub fn aggregate(&self, orders: &[Order], client_id: Option<&str>) -> AggregateResult {
        let mut accumulator = self.pool.acquire();
        for order in orders {
            accumulator.fold(order);
        }

        let processed_orders = accumulator.processed();
        let (amount_by_country, quantity_by_category) = accumulator.snapshot();
        drop(accumulator);

        tracing::debug!(
            batch_size = orders.len(),
            processed_orders,
            countries = amount_by_country.len(),
            categories = quantity_by_category.len(),
            "Batch aggregated"
        );
        metrics::record_aggregation(processed_orders);

        AggregateResult {
            processed_orders,
            amount_by_country,
            quantity_by_category,
            echoed_client_id: client_id.unwrap_or_default().to_string(),
        }
    }
}
