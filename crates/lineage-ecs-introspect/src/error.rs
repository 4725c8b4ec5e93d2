//! Error types for introspection operations.

use lineage_ecs::ManagerId;
use thiserror::Error;

/// Errors that can occur while capturing or writing a snapshot.
#[derive(Debug, Error)]
pub enum IntrospectError {
    /// The starting manager does not exist in the world.
    #[error("Manager not found: {0:?}")]
    ManagerNotFound(ManagerId),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a dump file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
