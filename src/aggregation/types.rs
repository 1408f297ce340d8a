//! Wire shapes for order aggregation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The only status that takes part in aggregation. Case-sensitive.
pub const COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineItem {
    #[serde(alias = "qty")]
    pub quantity: i32,
    pub category: String,
}

/// One order of a batch. `amount` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Order {
    pub status: String,
    pub amount: i64,
    pub country: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsRequest {
    pub orders: Vec<Order>,
}

/// Per-key totals for one batch. Owns its maps; nothing here points back
/// into the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub processed_orders: u32,
    pub amount_by_country: HashMap<String, i64>,
    pub quantity_by_category: HashMap<String, i32>,
    pub echoed_client_id: String,
}

/// Response of the bare-array `/json/aggregate` surface. Same totals as
/// [`AggregateResult`], under the field names that endpoint has always used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAggregateResult {
    pub processed_orders: u32,
    pub results: HashMap<String, i64>,
    pub category_stats: HashMap<String, i32>,
}

impl From<AggregateResult> for JsonAggregateResult {
    fn from(result: AggregateResult) -> Self {
        Self {
            processed_orders: result.processed_orders,
            results: result.amount_by_country,
            category_stats: result.quantity_by_category,
        }
    }
}
