//! Storage engine traits and write statistics.
//!
//! This module defines the seam between the batching layer and the storage
//! engine that performs individual graph writes:
//!
//! - [`StorageEngine`] - entry point for starting write transactions
//! - [`Transaction`] - a single transaction's write and read surface
//! - [`WriteStatistics`] - the monotonic per-primitive write counter

pub mod memory;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

pub use memory::{MemoryEngine, MemoryTransaction};

/// Identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a node ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Identifier for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipId(u64);

impl RelationshipId {
    /// Create a relationship ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A transaction could not be started, committed, or rolled back.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write referenced a node that does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(u64),

    /// A write violated a storage-level constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// A storage engine that can start write transactions.
///
/// Implementations must be thread-safe (`Send + Sync`). Write transactions
/// for one periodic-commit execution are strictly sequential: the driver
/// holds at most one open transaction at a time.
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be
    /// started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// The engine's write-statistics tracker.
    ///
    /// The tracker is shared by every transaction the engine produces and is
    /// incremented once per write primitive applied.
    fn write_statistics(&self) -> &WriteStatistics;
}

/// A graph write transaction.
///
/// Every write method applies exactly one or more write primitives, each of
/// which bumps the engine's [`WriteStatistics`] by one. Transactions must be
/// explicitly committed; dropping without committing rolls back.
pub trait Transaction {
    /// Create a node with the given labels.
    ///
    /// Counts as `1 + labels.len()` write primitives: one for the node, one
    /// per label set on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn create_node(&mut self, labels: &[&str]) -> Result<NodeId, StorageError>;

    /// Add a label to an existing node. One write primitive.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] if the node does not exist.
    fn set_label(&mut self, node: NodeId, label: &str) -> Result<(), StorageError>;

    /// Set a property on an existing node. One write primitive.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] if the node does not exist.
    fn set_property(&mut self, node: NodeId, key: &str, value: Value)
        -> Result<(), StorageError>;

    /// Create a relationship between two existing nodes. One write primitive.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] if either endpoint does not
    /// exist.
    fn create_relationship(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId, StorageError>;

    /// Number of nodes visible to this transaction, including its own
    /// uncommitted writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn node_count(&self) -> Result<u64, StorageError>;

    /// Commit the transaction, making all changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;
}

/// Monotonic counter of applied write primitives.
///
/// The storage layer increments the counter once per discrete write
/// primitive: node creation, relationship creation, property set, label set.
/// The batch driver never resets it; each execution snapshots a baseline and
/// tracks its own delta. The only decrement is the retraction of a rolled
/// back transaction's pending writes.
///
/// The delta arithmetic assumes the counter moves only under the execution
/// that took the baseline: run at most one execution at a time against an
/// engine. Concurrent executions sharing one engine would interleave their
/// increments and corrupt each other's batch boundaries.
#[derive(Debug, Default)]
pub struct WriteStatistics {
    primitives: AtomicU64,
}

impl WriteStatistics {
    /// Create a tracker with the counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one applied write primitive.
    pub fn record_primitive(&self) {
        self.primitives.fetch_add(1, Ordering::Relaxed);
    }

    /// Retract `count` primitives after a rollback.
    pub fn retract(&self, count: u64) {
        self.primitives.fetch_sub(count, Ordering::Relaxed);
    }

    /// Total primitives applied so far.
    #[must_use]
    pub fn primitives(&self) -> u64 {
        self.primitives.load(Ordering::Relaxed)
    }
}
