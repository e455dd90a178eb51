//! Error types for RouteForge

use thiserror::Error;

/// Main error type for RouteForge operations.
///
/// Only construction and configuration can fail. Evaluating a move never
/// produces an error: infeasibility is a `false` return value.
#[derive(Debug, Error)]
pub enum RouteForgeError {
    /// Path topology is malformed (bad start/end nodes, duplicates).
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A per-node or per-path input vector has the wrong length.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A node id is outside `[0, num_nodes)`.
    #[error("Node {node} out of range (num_nodes = {num_nodes})")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    /// Error in filter configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for RouteForge operations
pub type Result<T> = std::result::Result<T, RouteForgeError>;

/// Fails with [`RouteForgeError::DimensionMismatch`] unless `actual == expected`.
pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(RouteForgeError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}
