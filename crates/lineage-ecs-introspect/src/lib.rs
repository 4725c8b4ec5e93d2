//! Introspection layer for Lineage ECS.
//!
//! Captures the structure of a world as seen from one type manager: every
//! manager and column node reachable by following parent, registry,
//! component, subtype and child links. The snapshot renders to Graphviz DOT
//! (one record per node, one edge per link) or to JSON.
//!
//! # Usage
//!
//! ```ignore
//! use lineage_ecs_introspect::WorldSnapshot;
//!
//! let node = world.manager_for::<Node>();
//! let snapshot = WorldSnapshot::capture(&world, node)?;
//! snapshot.write_dot("node.dot")?;
//! ```

#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod dot;
mod error;
mod snapshot;

pub use dot::Dot;
pub use error::IntrospectError;
pub use snapshot::{ColumnRecord, ComponentLink, ManagerRecord, WorldSnapshot};

/// Result type for introspection operations.
pub type Result<T, E = IntrospectError> = std::result::Result<T, E>;
