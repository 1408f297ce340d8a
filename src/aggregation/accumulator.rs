//! Reusable aggregation state.

use std::collections::HashMap;

use crate::aggregation::types::Order;

/// Per-key running totals for a single batch.
///
/// Totals saturate at the bounds of their integer type instead of wrapping.
#[derive(Debug, Default)]
pub struct Accumulator {
    processed: u32,
    amount_by_country: HashMap<String, i64>,
    quantity_by_category: HashMap<String, i32>,
}

impl Accumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            processed: 0,
            amount_by_country: HashMap::with_capacity(capacity),
            quantity_by_category: HashMap::with_capacity(capacity),
        }
    }

    /// Fold one order in. Returns `false` and leaves all totals untouched
    /// when the order is not completed.
    pub fn fold(&mut self, order: &Order) -> bool {
        if !order.is_completed() {
            return false;
        }

        self.processed = self.processed.saturating_add(1);

        let amount = self
            .amount_by_country
            .entry(order.country.clone())
            .or_insert(0);
        *amount = amount.saturating_add(order.amount);

        for item in &order.items {
            let quantity = self
                .quantity_by_category
                .entry(item.category.clone())
                .or_insert(0);
            *quantity = quantity.saturating_add(item.quantity);
        }

        true
    }

    pub fn processed(&self) -> u32 {
        self.processed
    }

    pub fn is_empty(&self) -> bool {
        self.processed == 0 && self.amount_by_country.is_empty() && self.quantity_by_category.is_empty()
    }

    /// Remove every entry, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.processed = 0;
        self.amount_by_country.clear();
        self.quantity_by_category.clear();
    }

    /// Owned copies of both maps.
    pub fn snapshot(&self) -> (HashMap<String, i64>, HashMap<String, i32>) {
        (self.amount_by_country.clone(), self.quantity_by_category.clone())
    }

    pub(crate) fn capacity(&self) -> usize {
        self.amount_by_country.capacity().min(self.quantity_by_category.capacity())
    }
}
