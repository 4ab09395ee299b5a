//! Error types for the crate.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur when parsing or executing a periodic-commit query.
#[derive(Debug, Error)]
pub enum Error {
    /// A static validation failure detectable before execution starts:
    /// a non-positive batch size, or a periodic-commit hint on a query
    /// that performs no writes. Never leaves partial state.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A transaction context violation: a periodic-commit hint used while
    /// an explicit transaction is already open, or a commit/rollback issued
    /// against a handle that is not open.
    #[error("transaction state error: {0}")]
    TransactionState(String),

    /// A storage-layer failure raised while applying a write or committing.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A failure raised while evaluating an expression during streaming,
    /// e.g. an arithmetic fault. Surfaced to the caller unchanged after the
    /// in-flight transaction is rolled back.
    #[error("execution error: {0}")]
    Execution(String),
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Syntax("batch size must be a positive integer".to_string());
        assert!(err.to_string().starts_with("syntax error"));

        let err = Error::TransactionState("no open transaction".to_string());
        assert!(err.to_string().contains("transaction state"));
    }
}
