//! Pool of idle accumulators.
//!
//! [`AccumulatorPool::acquire`] hands out a [`PooledAccumulator`] that owns
//! its accumulator exclusively. Dropping the guard clears the accumulator
//! and puts it back, so release happens on every exit path including
//! unwinding.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::aggregation::accumulator::Accumulator;
use crate::config::AggregationConfig;
use crate::observability::metrics;

pub struct AccumulatorPool {
    idle: Mutex<Vec<Accumulator>>,
    initial_capacity: usize,
    max_idle: usize,
    created: AtomicUsize,
}

impl AccumulatorPool {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            initial_capacity: config.initial_capacity,
            max_idle: config.max_idle,
            created: AtomicUsize::new(0),
        }
    }

    /// Take an idle accumulator, or create one if none is idle.
    pub fn acquire(&self) -> PooledAccumulator<'_> {
        let reused = self.idle.lock().pop();
        let accumulator = match reused {
            Some(accumulator) => accumulator,
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                metrics::record_accumulator_created();
                Accumulator::with_capacity(self.initial_capacity)
            }
        };

        PooledAccumulator {
            pool: self,
            accumulator: Some(accumulator),
        }
    }

    /// Total accumulators ever created by this pool.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn idle_len(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, mut accumulator: Accumulator) {
        accumulator.clear();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(accumulator);
        }
    }
}

/// Exclusive, scoped loan of an [`Accumulator`].
pub struct PooledAccumulator<'a> {
    pool: &'a AccumulatorPool,
    accumulator: Option<Accumulator>,
}

impl Deref for PooledAccumulator<'_> {
    type Target = Accumulator;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the accumulator out.
        self.accumulator.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledAccumulator<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.accumulator.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledAccumulator<'_> {
    fn drop(&mut self) {
        if let Some(accumulator) = self.accumulator.take() {
            self.pool.release(accumulator);
        }
    }
}
