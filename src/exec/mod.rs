//! Query execution.
//!
//! [`Session`] is the front door: it owns a storage engine and the
//! session-scoped transaction counters, extracts and validates the
//! periodic-commit hint, and runs the query either batched (hint present)
//! or inside a single transaction (no hint). Both paths return the same
//! result-set shape, so batched execution is a drop-in replacement for
//! ordinary execution.

pub mod context;
pub mod driver;
pub mod row;
pub mod stream;

use tracing::warn;

use crate::config::ExecutorConfig;
use crate::error::Result;
use crate::metrics::{CountersSnapshot, TransactionCounters};
use crate::parser;
use crate::storage::StorageEngine;
use crate::transaction::TransactionController;

pub use context::QueryContext;
pub use driver::PeriodicCommitExecutor;
pub use row::{ResultSet, Row, Schema};
pub use stream::UpdateStream;

/// A single-caller session against a storage engine.
///
/// Each session owns its own [`TransactionCounters`]; concurrent sessions
/// never share a counters instance. Executions within a session are strictly
/// sequential, and the engine must not be driven by another execution at the
/// same time: batch boundaries are derived from deltas of the engine's
/// [`crate::storage::WriteStatistics`], which only hold if nothing else
/// moves the counter mid-run.
pub struct Session<E: StorageEngine> {
    engine: E,
    counters: TransactionCounters,
    config: ExecutorConfig,
}

impl<E: StorageEngine> Session<E> {
    /// Create a session with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ExecutorConfig::new())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(engine: E, config: ExecutorConfig) -> Self {
        Self { engine, counters: TransactionCounters::new(), config }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// A snapshot of this session's transaction counters.
    ///
    /// Callers observe one execution by snapshotting before and after and
    /// diffing with [`CountersSnapshot::diff_since`].
    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    /// Execute a query.
    ///
    /// `query` is scanned for a leading `USING PERIODIC COMMIT` hint; the
    /// remaining body belongs to the planner that produced `stream`. With a
    /// hint the stream runs under the batch driver; without one it runs in a
    /// single transaction. Validation failures are raised before any
    /// transaction is opened, so they are side-effect free.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Syntax`] or
    /// [`crate::Error::TransactionState`] for an invalid hint or context,
    /// and otherwise whatever error execution raised after rolling back the
    /// in-flight transaction.
    pub fn execute<'s, S>(&'s self, query: &str, ctx: QueryContext, stream: S) -> Result<ResultSet>
    where
        S: UpdateStream<E::Transaction<'s>>,
    {
        let parsed = parser::parse_query(query)?;

        match parsed.hint {
            Some(hint) => {
                parser::validate_hint(&hint, &ctx)?;
                let batch_size =
                    hint.batch_size().unwrap_or(self.config.default_batch_size);
                let executor = PeriodicCommitExecutor::with_batch_size(batch_size);
                let mut controller = TransactionController::new(&self.engine, &self.counters);
                executor.run(&mut controller, stream)
            }
            None => self.run_single(stream),
        }
    }

    /// Run a stream inside one ordinary transaction.
    fn run_single<'s, S>(&'s self, mut stream: S) -> Result<ResultSet>
    where
        S: UpdateStream<E::Transaction<'s>>,
    {
        let schema = stream.schema();
        let mut controller = TransactionController::new(&self.engine, &self.counters);

        controller.open()?;
        let mut rows = Vec::new();

        loop {
            match stream.next_unit(controller.current_mut()?) {
                None => break,
                Some(Ok(mut emitted)) => rows.append(&mut emitted),
                Some(Err(err)) => {
                    if let Err(rollback_err) = controller.rollback() {
                        warn!(error = %rollback_err, "rollback failed");
                    }
                    return Err(err);
                }
            }
        }

        controller.commit()?;
        Ok(ResultSet::with_rows(schema, rows))
    }
}
