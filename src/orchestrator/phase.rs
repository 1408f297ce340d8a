//! Barrier-synchronised phases.
//!
//! A phase starts both of its operations before awaiting either, then waits
//! for *both* to settle. A failing operation never short-circuits the join:
//! its sibling is still driven to completion, so no store call is left
//! in flight when the phase returns.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use crate::store::StoreError;

/// Outcome of one operation inside a phase. Consumed once, at the join.
pub type PhaseResult<T> = Result<T, StoreError>;

/// Which barrier of the workflow an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Independent reads keyed by the request: subject + trending.
    Lookup,
    /// Operations keyed by the subject id produced by [`Phase::Lookup`].
    Refresh,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lookup => write!(f, "lookup"),
            Phase::Refresh => write!(f, "refresh"),
        }
    }
}

/// Run two independent operations concurrently and wait for both.
///
/// The futures are polled together on the calling task; dropping the
/// returned future cancels both cooperatively.
pub async fn join_phase<A, B, FA, FB>(phase: Phase, left: FA, right: FB) -> (PhaseResult<A>, PhaseResult<B>)
where
    FA: Future<Output = PhaseResult<A>>,
    FB: Future<Output = PhaseResult<B>>,
{
    let started = Instant::now();
    let (left, right) = tokio::join!(left, right);

    tracing::debug!(
        phase = %phase,
        elapsed_us = started.elapsed().as_micros() as u64,
        left_ok = left.is_ok(),
        right_ok = right.is_ok(),
        "Phase joined"
    );

    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_both_operations_run_concurrently() {
        let started = Instant::now();
        let (a, b) = join_phase(
            Phase::Lookup,
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, StoreError>(1)
            },
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, StoreError>(2)
            },
        )
        .await;

        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 2);
        assert!(started.elapsed() < Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_failure_does_not_abandon_sibling() {
        let sibling_done = AtomicBool::new(false);

        let (a, b) = join_phase(
            Phase::Refresh,
            async { Err::<(), _>(StoreError::Unavailable("boom".into())) },
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                sibling_done.store(true, Ordering::SeqCst);
                Ok::<_, StoreError>(())
            },
        )
        .await;

        assert!(a.is_err());
        assert!(b.is_ok());
        assert!(sibling_done.load(Ordering::SeqCst));
    }
}
