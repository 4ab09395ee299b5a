//! `graphbatch`
//!
//! Periodic-commit batched execution for graph stores: a write-heavy query
//! runs as a sequence of bounded transactions instead of one unbounded
//! transaction, so memory and lock footprint stay proportional to the batch
//! size rather than to the size of the query.
//!
//! A query opts in with a leading hint:
//!
//! ```text
//! USING PERIODIC COMMIT 1000 <write query>
//! ```
//!
//! The driver pulls the query's update stream one unit at a time, commits
//! and reopens the transaction every time a full batch of write primitives
//! has been applied, and always issues one final commit when the stream is
//! exhausted. A run with `W` write primitives and batch size `B` therefore
//! commits exactly `floor(W / B) + 1` times. If a unit fails, only the
//! in-flight batch is rolled back; earlier batches stay durable and the
//! original error reaches the caller unchanged.
//!
//! # Example
//!
//! ```ignore
//! use graphbatch::{MemoryEngine, QueryContext, Session};
//!
//! let session = Session::new(MemoryEngine::new());
//! let ctx = QueryContext::new().with_updates(true);
//!
//! let before = session.counters();
//! let result = session.execute("USING PERIODIC COMMIT 2 LOAD ...", ctx, stream)?;
//! let diff = session.counters().diff_since(before);
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod metrics;
pub mod parser;
pub mod storage;
pub mod transaction;
pub mod value;

pub use config::{ExecutorConfig, DEFAULT_BATCH_SIZE};
pub use error::{Error, Result};
pub use exec::{
    PeriodicCommitExecutor, QueryContext, ResultSet, Row, Schema, Session, UpdateStream,
};
pub use metrics::{CountersSnapshot, TransactionCounters};
pub use parser::{parse_query, validate_hint, ParsedQuery, PeriodicCommitHint};
pub use storage::{
    MemoryEngine, MemoryTransaction, NodeId, RelationshipId, StorageEngine, StorageError,
    Transaction, WriteStatistics,
};
pub use transaction::TransactionController;
pub use value::Value;
