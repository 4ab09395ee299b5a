//! Query execution context.

/// The caller-supplied context a query runs in.
///
/// Both flags are derived externally: the transaction flag by the session
/// layer that tracks explicit transactions, the updating flag by the query
/// planner from the plan's write clauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryContext {
    in_explicit_transaction: bool,
    updating: bool,
}

impl QueryContext {
    /// A context outside any explicit transaction, for a read-only query.
    #[must_use]
    pub const fn new() -> Self {
        Self { in_explicit_transaction: false, updating: false }
    }

    /// Mark whether the caller already holds an explicit open transaction.
    #[must_use]
    pub const fn with_explicit_transaction(mut self, open: bool) -> Self {
        self.in_explicit_transaction = open;
        self
    }

    /// Mark whether the query plan contains at least one write operation.
    #[must_use]
    pub const fn with_updates(mut self, updating: bool) -> Self {
        self.updating = updating;
        self
    }

    /// Whether the caller already holds an explicit open transaction.
    #[must_use]
    pub const fn in_explicit_transaction(&self) -> bool {
        self.in_explicit_transaction
    }

    /// Whether the query plan contains at least one write operation.
    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.updating
    }
}
