//! In-memory storage backend.
//!
//! [`MemoryEngine`] keeps the whole graph in a mutex-protected map. A write
//! transaction clones the committed state into a private working set; commit
//! swaps the working set back in, rollback discards it. This gives the same
//! consume-on-commit transaction shape as a durable backend without any I/O,
//! which is what the tests and benches run against.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{NodeId, RelationshipId, StorageEngine, StorageError, Transaction, WriteStatistics};
use crate::value::Value;

/// A node's labels and properties.
#[derive(Debug, Clone, Default)]
struct NodeRecord {
    labels: Vec<String>,
    properties: HashMap<String, Value>,
}

/// A relationship between two nodes.
#[derive(Debug, Clone)]
struct RelationshipRecord {
    source: NodeId,
    target: NodeId,
    rel_type: String,
}

/// The committed graph state.
#[derive(Debug, Clone, Default)]
struct GraphData {
    nodes: HashMap<NodeId, NodeRecord>,
    relationships: HashMap<RelationshipId, RelationshipRecord>,
    next_node_id: u64,
    next_relationship_id: u64,
}

/// An in-memory storage engine.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    committed: Mutex<GraphData>,
    stats: WriteStatistics,
}

impl MemoryEngine {
    /// Create an empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of durably committed nodes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the state lock is poisoned.
    pub fn node_count(&self) -> Result<u64, StorageError> {
        Ok(self.committed()?.nodes.len() as u64)
    }

    /// Number of durably committed relationships.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the state lock is poisoned.
    pub fn relationship_count(&self) -> Result<u64, StorageError> {
        Ok(self.committed()?.relationships.len() as u64)
    }

    /// Whether a committed relationship of the given type links the two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the state lock is poisoned.
    pub fn has_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        rel_type: &str,
    ) -> Result<bool, StorageError> {
        Ok(self.committed()?.relationships.values().any(|r| {
            r.source == source && r.target == target && r.rel_type == rel_type
        }))
    }

    fn committed(&self) -> Result<std::sync::MutexGuard<'_, GraphData>, StorageError> {
        self.committed
            .lock()
            .map_err(|_| StorageError::Transaction("storage state lock poisoned".to_string()))
    }
}

impl StorageEngine for MemoryEngine {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let working = self.committed()?.clone();
        Ok(MemoryTransaction { engine: self, working, pending_primitives: 0 })
    }

    fn write_statistics(&self) -> &WriteStatistics {
        &self.stats
    }
}

/// A write transaction against a [`MemoryEngine`].
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    engine: &'a MemoryEngine,
    working: GraphData,
    /// Primitives applied by this transaction, not yet committed.
    pending_primitives: u64,
}

impl MemoryTransaction<'_> {
    fn record_primitive(&mut self) {
        self.engine.stats.record_primitive();
        self.pending_primitives += 1;
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, StorageError> {
        self.working.nodes.get_mut(&node).ok_or(StorageError::NodeNotFound(node.as_u64()))
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn create_node(&mut self, labels: &[&str]) -> Result<NodeId, StorageError> {
        let id = NodeId::new(self.working.next_node_id);
        self.working.next_node_id += 1;
        self.working.nodes.insert(id, NodeRecord::default());
        self.record_primitive();

        for label in labels {
            self.set_label(id, label)?;
        }
        Ok(id)
    }

    fn set_label(&mut self, node: NodeId, label: &str) -> Result<(), StorageError> {
        let record = self.node_mut(node)?;
        if !record.labels.iter().any(|l| l == label) {
            record.labels.push(label.to_string());
        }
        self.record_primitive();
        Ok(())
    }

    fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        self.node_mut(node)?.properties.insert(key.to_string(), value);
        self.record_primitive();
        Ok(())
    }

    fn create_relationship(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId, StorageError> {
        if !self.working.nodes.contains_key(&source) {
            return Err(StorageError::NodeNotFound(source.as_u64()));
        }
        if !self.working.nodes.contains_key(&target) {
            return Err(StorageError::NodeNotFound(target.as_u64()));
        }

        let id = RelationshipId::new(self.working.next_relationship_id);
        self.working.next_relationship_id += 1;
        self.working.relationships.insert(
            id,
            RelationshipRecord { source, target, rel_type: rel_type.to_string() },
        );
        self.record_primitive();
        Ok(id)
    }

    fn node_count(&self) -> Result<u64, StorageError> {
        Ok(self.working.nodes.len() as u64)
    }

    fn commit(mut self) -> Result<(), StorageError> {
        let working = std::mem::take(&mut self.working);
        *self.engine.committed()? = working;
        // Committed primitives stay in the engine-wide statistics.
        self.pending_primitives = 0;
        Ok(())
    }

    fn rollback(mut self) -> Result<(), StorageError> {
        self.engine.stats.retract(self.pending_primitives);
        self.pending_primitives = 0;
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        // Dropping without commit is an implicit rollback: the working set is
        // discarded and its pending primitives leave the statistics.
        if self.pending_primitives > 0 {
            self.engine.stats.retract(self.pending_primitives);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_persists_writes() {
        let engine = MemoryEngine::new();

        let mut tx = engine.begin_write().unwrap();
        let node = tx.create_node(&["Person"]).unwrap();
        tx.set_property(node, "name", Value::from("Alice")).unwrap();
        tx.set_property(node, "active", Value::from(true)).unwrap();
        tx.commit().unwrap();

        assert_eq!(engine.node_count().unwrap(), 1);
        // node + label + two properties
        assert_eq!(engine.write_statistics().primitives(), 4);
    }

    #[test]
    fn rollback_discards_writes_and_retracts_statistics() {
        let engine = MemoryEngine::new();

        let mut tx = engine.begin_write().unwrap();
        tx.create_node(&[]).unwrap();
        tx.create_node(&[]).unwrap();
        assert_eq!(engine.write_statistics().primitives(), 2);
        tx.rollback().unwrap();

        assert_eq!(engine.node_count().unwrap(), 0);
        assert_eq!(engine.write_statistics().primitives(), 0);
    }

    #[test]
    fn drop_without_commit_rolls_back() {
        let engine = MemoryEngine::new();

        {
            let mut tx = engine.begin_write().unwrap();
            tx.create_node(&[]).unwrap();
        }

        assert_eq!(engine.node_count().unwrap(), 0);
        assert_eq!(engine.write_statistics().primitives(), 0);
    }

    #[test]
    fn relationship_requires_both_endpoints() {
        let engine = MemoryEngine::new();

        let mut tx = engine.begin_write().unwrap();
        let a = tx.create_node(&[]).unwrap();
        let b = tx.create_node(&[]).unwrap();
        tx.create_relationship(a, b, "KNOWS").unwrap();

        let missing = NodeId::new(9999);
        let err = tx.create_relationship(a, missing, "KNOWS").unwrap_err();
        assert!(matches!(err, StorageError::NodeNotFound(9999)));

        tx.commit().unwrap();
        assert_eq!(engine.relationship_count().unwrap(), 1);
        assert!(engine.has_relationship(a, b, "KNOWS").unwrap());
        assert!(!engine.has_relationship(b, a, "KNOWS").unwrap());
    }

    #[test]
    fn transaction_sees_its_own_writes() {
        let engine = MemoryEngine::new();

        let mut tx = engine.begin_write().unwrap();
        tx.create_node(&[]).unwrap();
        assert_eq!(tx.node_count().unwrap(), 1);
        // Not yet visible outside the transaction.
        assert_eq!(engine.node_count().unwrap(), 0);
        tx.commit().unwrap();
        assert_eq!(engine.node_count().unwrap(), 1);
    }
}
