//! Transaction counters for observability.
//!
//! Counters are collected with atomics for thread-safe, low-overhead
//! instrumentation, and mirrored to the [`metrics`] crate facade so a
//! recorder (e.g. a Prometheus exporter) can pick them up.
//!
//! Each session owns one [`TransactionCounters`] instance. Callers observe
//! the effect of a single query execution by taking a snapshot before and
//! after and diffing the two:
//!
//! ```ignore
//! let before = session.counters();
//! session.execute(query, ctx, stream)?;
//! let diff = session.counters().diff_since(before);
//! assert_eq!(diff.commits, 3);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Session-scoped commit and rollback counters.
///
/// The counters are append-only: they are only ever incremented, and only by
/// the transaction boundary controller. Concurrent sessions must each own
/// their own instance.
#[derive(Debug, Default)]
pub struct TransactionCounters {
    /// Number of committed transactions.
    commits: AtomicU64,
    /// Number of rolled back transactions.
    rollbacks: AtomicU64,
}

impl TransactionCounters {
    /// Create a new counters instance with both counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transaction commit.
    pub fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("graphbatch_transactions_committed_total").increment(1);
    }

    /// Record a transaction rollback.
    pub fn record_rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("graphbatch_transactions_rolled_back_total").increment(1);
    }

    /// Get a point-in-time snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            commits: self.commits.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of [`TransactionCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    /// Committed transactions at snapshot time.
    pub commits: u64,
    /// Rolled back transactions at snapshot time.
    pub rollbacks: u64,
}

impl CountersSnapshot {
    /// The counter movement between an earlier snapshot and this one.
    ///
    /// Counters are monotonic, so the difference is well-defined whenever
    /// `earlier` was taken from the same session before this snapshot.
    #[must_use]
    pub const fn diff_since(self, earlier: Self) -> Self {
        Self {
            commits: self.commits - earlier.commits,
            rollbacks: self.rollbacks - earlier.rollbacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let counters = TransactionCounters::new();
        counters.record_commit();
        counters.record_commit();
        counters.record_rollback();

        let snap = counters.snapshot();
        assert_eq!(snap.commits, 2);
        assert_eq!(snap.rollbacks, 1);
    }

    #[test]
    fn diff_since_subtracts_baseline() {
        let counters = TransactionCounters::new();
        counters.record_commit();

        let before = counters.snapshot();
        counters.record_commit();
        counters.record_commit();
        counters.record_rollback();

        let diff = counters.snapshot().diff_since(before);
        assert_eq!(diff, CountersSnapshot { commits: 2, rollbacks: 1 });
    }
}
