// Allow missing docs for now
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::float_cmp)]
#![forbid(unsafe_code)]

//! Lineage ECS - columnar storage for inheritance-related entity types
//!
//! Entity types form a single-inheritance hierarchy. Components are stored
//! one column per (entity type, component type), and the columns of one
//! component type are linked into a tree that mirrors the hierarchy. Walking
//! that tree visits a base type and all of its subtypes without any
//! per-entity lookups.
//!
//! # Key Concepts
//!
//! - **Entity type**: a struct implementing [`Entity`], naming its supertype
//! - **Type manager**: per-type bookkeeping, created lazily by the [`World`]
//! - **Column**: dense storage of one component for one entity type
//! - **Buffer tree**: the columns of one component, linked parent to child
//! - **View**: lockstep iteration of several component trees
//!
//! # Example
//!
//! ```
//! use lineage_ecs::prelude::*;
//!
//! #[derive(Default, Entity)]
//! struct Node {
//!     header: EntityHeader,
//! }
//!
//! #[derive(Default, Entity)]
//! #[entity(extends = Node)]
//! struct Sprite {
//!     header: EntityHeader,
//! }
//!
//! #[derive(Default, Clone, Copy)]
//! struct Velocity {
//!     dx: f32,
//!     dy: f32,
//! }
//!
//! let mut world = World::new();
//! let node = world.create::<Node>();
//! let sprite = world.create::<Sprite>();
//! node.component::<Velocity>().set(&mut world, Velocity { dx: 1.0, dy: 0.0 });
//! sprite.component::<Velocity>().set(&mut world, Velocity { dx: 0.0, dy: 1.0 });
//!
//! for (velocity,) in world.view::<Node, (Velocity,)>().unwrap() {
//!     velocity.dx *= 2.0;
//! }
//!
//! assert_eq!(sprite.component::<Velocity>().get(&world).map(|v| v.dy), Some(1.0));
//! ```

#[allow(unused_extern_crates)]
extern crate self as lineage_ecs;

mod component;
mod entity;
mod error;
mod iter;
mod manager;
mod storage;
mod tree;
mod view;
mod world;

pub use component::{Component, ComponentId, ComponentInfo, ComponentRegistry, short_type_name};
pub use entity::{
    ComponentRef, Entity, EntityFlags, EntityHeader, EntityId, EntityKey, EntityRef, Root,
    Supertype,
};
pub use error::{EcsError, Result};
pub use iter::{ColumnIter, EntityIter, TreeCursor};
pub use lineage_ecs_derive::Entity;
pub use manager::{ManagerId, ManagerRegistry, TypeManager};
pub use storage::{AnyColumn, Column, RegistryColumn};
pub use tree::{
    ColumnArena, ColumnKey, ColumnNode, NodeId, Subtree, Topology, TopologySnapshot, subtree,
    successor,
};
pub use view::{ComponentTrack, NodeMap, NodeSet, View, ViewEntities, ViewPosition, ViewQuery};
pub use world::{World, WorldConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Component, ComponentRef, Entity, EntityHeader, EntityKey, EntityRef, Root, World,
        WorldConfig,
    };
}
