//! The update stream consumed by the batch driver.

use std::sync::Arc;

use crate::error::Result;
use crate::exec::row::{Row, Schema};
use crate::storage::Transaction;

/// A lazy, finite, non-restartable sequence of query work units.
///
/// Each unit applies zero or more write primitives against the transaction
/// it is handed (the storage layer counts them in its write statistics) and
/// may emit rows from trailing read or projection work, e.g. an aggregation
/// over the written data.
///
/// The driver passes in whichever transaction is currently open, so a stream
/// must not hold on to a transaction across pulls: batching replaces the
/// transaction at every commit boundary.
pub trait UpdateStream<T: Transaction> {
    /// The schema of the rows this stream emits.
    fn schema(&self) -> Arc<Schema>;

    /// Pull the next unit and apply it against `tx`.
    ///
    /// Returns `None` once the stream is exhausted. An `Err` aborts the
    /// execution: the driver rolls back the in-flight transaction and stops
    /// pulling.
    fn next_unit(&mut self, tx: &mut T) -> Option<Result<Vec<Row>>>;
}
