//! Transaction boundary control.
//!
//! [`TransactionController`] is a thin wrapper around the storage engine's
//! open/commit/rollback primitives. It holds the at-most-one open
//! transaction of an execution and is the sole place where the session's
//! [`TransactionCounters`] are mutated, keeping the counting independent of
//! the driver's batching arithmetic.

use tracing::debug;

use crate::error::{Error, Result};
use crate::metrics::TransactionCounters;
use crate::storage::{StorageEngine, Transaction, WriteStatistics};

/// Controls the transaction lifecycle for one query execution.
pub struct TransactionController<'e, E: StorageEngine> {
    engine: &'e E,
    counters: &'e TransactionCounters,
    current: Option<E::Transaction<'e>>,
}

impl<'e, E: StorageEngine> TransactionController<'e, E> {
    /// Create a controller with no open transaction.
    pub fn new(engine: &'e E, counters: &'e TransactionCounters) -> Self {
        Self { engine, counters, current: None }
    }

    /// Open a new write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionState`] if a transaction is already open,
    /// or a storage error if the engine cannot start one.
    pub fn open(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::TransactionState(
                "cannot open a transaction while one is already open".to_string(),
            ));
        }
        self.current = Some(self.engine.begin_write()?);
        debug!("opened write transaction");
        Ok(())
    }

    /// The currently open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionState`] if no transaction is open.
    pub fn current_mut(&mut self) -> Result<&mut E::Transaction<'e>> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::TransactionState("no open transaction".to_string()))
    }

    /// Whether a transaction is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Commit the current transaction and record the commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionState`] if no transaction is open, or the
    /// storage error if the commit itself fails (in which case the commit is
    /// not counted).
    pub fn commit(&mut self) -> Result<()> {
        let tx = self.current.take().ok_or_else(|| {
            Error::TransactionState("commit on a transaction that is not open".to_string())
        })?;
        tx.commit()?;
        self.counters.record_commit();
        debug!("committed transaction");
        Ok(())
    }

    /// Roll back the current transaction and record the rollback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionState`] if no transaction is open, or the
    /// storage error if the rollback itself fails.
    pub fn rollback(&mut self) -> Result<()> {
        let tx = self.current.take().ok_or_else(|| {
            Error::TransactionState("rollback on a transaction that is not open".to_string())
        })?;
        tx.rollback()?;
        self.counters.record_rollback();
        debug!("rolled back transaction");
        Ok(())
    }

    /// The engine's write-statistics tracker.
    #[must_use]
    pub fn write_statistics(&self) -> &'e WriteStatistics {
        self.engine.write_statistics()
    }
}
