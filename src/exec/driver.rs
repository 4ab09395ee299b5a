//! The periodic-commit batch execution driver.
//!
//! The driver consumes a query's update stream one unit at a time inside a
//! sequence of bounded transactions. After each unit it polls the engine's
//! write statistics; every time the delta since the last boundary covers a
//! full batch it commits and reopens. When the stream is exhausted it issues
//! one unconditional terminal commit, so a successful run with `W` write
//! primitives and batch size `B` commits exactly `floor(W / B) + 1` times.

use tracing::{debug, warn};

use crate::error::Result;
use crate::exec::row::ResultSet;
use crate::exec::stream::UpdateStream;
use crate::parser::PeriodicCommitHint;
use crate::storage::StorageEngine;
use crate::transaction::TransactionController;

/// Executes one query as a sequence of batch-bounded transactions.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicCommitExecutor {
    batch_size: u64,
}

impl PeriodicCommitExecutor {
    /// Create an executor for a validated hint.
    #[must_use]
    pub const fn new(hint: &PeriodicCommitHint) -> Self {
        Self { batch_size: hint.effective_batch_size() }
    }

    /// Create an executor with an explicit batch size. `batch_size` must be
    /// positive.
    #[must_use]
    pub const fn with_batch_size(batch_size: u64) -> Self {
        debug_assert!(batch_size > 0, "batch size must be positive");
        Self { batch_size }
    }

    /// The batch size this executor commits at.
    #[must_use]
    pub const fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Run the update stream to completion under periodic commit.
    ///
    /// The controller must have no open transaction; the driver opens the
    /// first one before pulling the first unit and guarantees exactly one
    /// open transaction at a time while the stream is being consumed.
    ///
    /// On success all batches plus one terminal commit are durable. On a
    /// unit failure the in-flight transaction is rolled back, no new one is
    /// opened, and the unit's error is returned unchanged; work committed in
    /// prior batches stays durable.
    ///
    /// # Errors
    ///
    /// Returns whatever error the failing unit raised, or a storage error
    /// from a commit, or [`crate::Error::TransactionState`] if the
    /// controller already held an open transaction.
    pub fn run<'e, E, S>(
        &self,
        controller: &mut TransactionController<'e, E>,
        mut stream: S,
    ) -> Result<ResultSet>
    where
        E: StorageEngine,
        S: UpdateStream<E::Transaction<'e>>,
    {
        let schema = stream.schema();
        let stats = controller.write_statistics();

        controller.open()?;
        // Delta tracking is local to this run: the tracker itself is a
        // monotonic engine-wide counter and is never reset.
        let mut last_boundary = stats.primitives();
        let mut rows = Vec::new();

        loop {
            let unit = stream.next_unit(controller.current_mut()?);
            match unit {
                None => break,
                Some(Ok(mut emitted)) => {
                    rows.append(&mut emitted);

                    // A multi-primitive unit can cross one or more batch
                    // boundaries at once; each boundary commit is charged
                    // exactly one batch and the overshoot carries over.
                    while stats.primitives() - last_boundary >= self.batch_size {
                        debug!(batch_size = self.batch_size, "batch boundary reached");
                        controller.commit()?;
                        controller.open()?;
                        last_boundary += self.batch_size;
                    }
                }
                Some(Err(err)) => {
                    warn!(error = %err, "unit failed, rolling back in-flight batch");
                    if let Err(rollback_err) = controller.rollback() {
                        // The original failure is what the caller must see.
                        warn!(error = %rollback_err, "rollback failed");
                    }
                    return Err(err);
                }
            }
        }

        // The terminal commit is unconditional: even with a zero delta the
        // final transaction carries pending read results that must be made
        // visible to the caller.
        controller.commit()?;

        Ok(ResultSet::with_rows(schema, rows))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::exec::row::{Row, Schema};
    use crate::metrics::TransactionCounters;
    use crate::storage::{MemoryEngine, Transaction};

    struct EmptyStream;

    impl<T: Transaction> UpdateStream<T> for EmptyStream {
        fn schema(&self) -> Arc<Schema> {
            Arc::new(Schema::empty())
        }

        fn next_unit(&mut self, _tx: &mut T) -> Option<Result<Vec<Row>>> {
            None
        }
    }

    #[test]
    fn empty_stream_still_gets_the_terminal_commit() {
        let engine = MemoryEngine::new();
        let counters = TransactionCounters::new();
        let mut controller = TransactionController::new(&engine, &counters);

        let executor = PeriodicCommitExecutor::with_batch_size(10);
        let result = executor.run(&mut controller, EmptyStream).unwrap();

        assert!(result.is_empty());
        assert_eq!(counters.snapshot().commits, 1);
        assert_eq!(counters.snapshot().rollbacks, 0);
        assert!(!controller.is_open());
    }

    struct CreateNodes {
        remaining: u64,
    }

    impl<T: Transaction> UpdateStream<T> for CreateNodes {
        fn schema(&self) -> Arc<Schema> {
            Arc::new(Schema::empty())
        }

        fn next_unit(&mut self, tx: &mut T) -> Option<Result<Vec<Row>>> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            Some(tx.create_node(&[]).map(|_| Vec::new()).map_err(Into::into))
        }
    }

    #[test]
    fn boundary_commits_follow_the_floor_formula() {
        let engine = MemoryEngine::new();
        let counters = TransactionCounters::new();
        let mut controller = TransactionController::new(&engine, &counters);

        // 7 single-primitive units at batch size 3: floor(7/3) + 1 = 3.
        let hint = PeriodicCommitHint::with_batch_size(3).unwrap();
        let executor = PeriodicCommitExecutor::new(&hint);
        assert_eq!(executor.batch_size(), 3);
        executor.run(&mut controller, CreateNodes { remaining: 7 }).unwrap();

        assert_eq!(counters.snapshot().commits, 3);
        assert_eq!(engine.node_count().unwrap(), 7);
    }
}
