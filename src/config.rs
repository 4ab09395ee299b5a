//! Executor configuration.

/// The batch size used when a periodic-commit hint omits an explicit value.
///
/// A thousand primitives per transaction keeps the lock and memory footprint
/// of a batch small while still amortizing commit cost across many writes.
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// Configuration options for periodic-commit execution.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Batch size applied when a hint carries no explicit value.
    pub default_batch_size: u64,
}

impl ExecutorConfig {
    /// Create a configuration with the built-in defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self { default_batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Override the batch size used for hints without an explicit value.
    #[must_use]
    pub const fn default_batch_size(mut self, size: u64) -> Self {
        self.default_batch_size = size;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new()
    }
}
