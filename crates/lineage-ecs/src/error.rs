//! Engine error types.

use thiserror::Error;

use crate::{component::ComponentId, manager::ManagerId, tree::NodeId};

/// Engine error type.
///
/// Normal use never fails: out-of-range access grows columns and lookups
/// that find nothing return `None`. These errors cover misuse that would
/// otherwise corrupt data silently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A column was read as a different element type than it stores.
    #[error("invalid component type: expected column of `{expected}`, found `{found}`")]
    InvalidComponentType {
        expected: &'static str,
        found: &'static str,
    },

    /// No node with this handle exists in the arena.
    #[error("unknown column node: {0:?}")]
    UnknownNode(NodeId),

    /// No manager with this handle exists.
    #[error("unknown type manager: {0:?}")]
    UnknownManager(ManagerId),

    /// No component type with this ID is registered.
    #[error("unknown component: {0:?}")]
    UnknownComponent(ComponentId),

    /// A view asked for the same component type more than once.
    #[error("component `{0}` requested twice in one view")]
    DuplicateComponent(&'static str),
}

/// Result type for engine operations.
pub type Result<T, E = EcsError> = std::result::Result<T, E>;
