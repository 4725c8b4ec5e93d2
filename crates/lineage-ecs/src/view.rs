//! Join views - iterating several component columns in lockstep.
//!
//! A view is anchored on the registry tree of a base entity type. Every step
//! yields one tuple of `&mut` references, all belonging to the entity the
//! anchor currently points at.
//!
//! ```ignore
//! for (pos, vel) in world.view::<Node, (Position, Velocity)>()? {
//!     pos.x += vel.dx;
//!     pos.y += vel.dy;
//! }
//! ```
//!
//! # Alignment
//!
//! Construction creates any missing column for every entity type under the
//! base and grows it to that type's entity count. Only the anchor cursor
//! walks a tree: at each registry slot the view reads the same slot of the
//! column owned by the same entity type. Component trees may nest
//! differently from the registry tree (a column can exist on a type with no
//! entities of its own) and columns may run past the registry; neither
//! affects which rows are paired. The view holds the world mutably, so no
//! entity can be created while it is alive.

use std::slice::IterMut;

use hashbrown::{HashMap, HashSet};
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::{
    component::{Component, ComponentId, ComponentRegistry},
    entity::EntityKey,
    error::Result,
    iter::TreeCursor,
    storage::Column,
    tree::{ColumnNode, NodeId, Topology, TopologySnapshot},
};

/// Set of column nodes belonging to one tree of a view.
pub type NodeSet = HashSet<NodeId, FxBuildHasher>;

/// Column node to registry node of the same entity type.
pub type NodeMap = HashMap<NodeId, NodeId, FxBuildHasher>;

/// A tuple of component types a view can join.
///
/// Implemented for tuples of one to eight distinct [`Component`] types.
pub trait ViewQuery: 'static {
    /// What one step of the view yields.
    type Item<'w>
    where
        Self: 'w;

    /// Per-component mutable access, one [`ComponentTrack`] per type.
    type Tracks<'w>
    where
        Self: 'w;

    /// Register every component type, in tuple order.
    fn register(components: &mut ComponentRegistry) -> SmallVec<[ComponentId; 4]>;

    /// Hand out mutable access to the nodes in `members[k]` for the k-th
    /// component type, keyed by the registry node they pair with.
    fn bind<'w>(
        nodes: impl Iterator<Item = (NodeId, &'w mut ColumnNode)>,
        members: &[NodeMap],
    ) -> Result<Self::Tracks<'w>>;

    /// Take the next element of every column paired with `registry`.
    fn fetch<'w>(tracks: &mut Self::Tracks<'w>, registry: NodeId) -> Option<Self::Item<'w>>;
}

/// Sequential mutable access to the column nodes of one component tree.
///
/// Each column is keyed by the registry node of its entity type and handed
/// out front to back. Slots past the registry's length are never reached.
pub struct ComponentTrack<'w, C> {
    rows: FxHashMap<NodeId, IterMut<'w, C>>,
}

impl<'w, C: Component> ComponentTrack<'w, C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: FxHashMap::default(),
        }
    }

    /// Take mutable access to the column paired with `registry`.
    pub fn insert(&mut self, registry: NodeId, node: &'w mut ColumnNode) -> Result<()> {
        let column = node.downcast_mut::<Column<C>>()?;
        self.rows.insert(registry, column.iter_mut());
        Ok(())
    }

    /// Next unvisited element of the column paired with `registry`.
    pub fn next_at(&mut self, registry: NodeId) -> Option<&'w mut C> {
        self.rows.get_mut(&registry)?.next()
    }
}

impl<C: Component> Default for ComponentTrack<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_view_query {
    ($(($ty:ident, $idx:tt)),+) => {
        impl<$($ty: Component),+> ViewQuery for ($($ty,)+) {
            type Item<'w> = ($(&'w mut $ty,)+) where Self: 'w;
            type Tracks<'w> = ($(ComponentTrack<'w, $ty>,)+) where Self: 'w;

            fn register(components: &mut ComponentRegistry) -> SmallVec<[ComponentId; 4]> {
                let mut ids = SmallVec::new();
                $(ids.push(components.register::<$ty>());)+
                ids
            }

            #[allow(clippy::single_match)]
            fn bind<'w>(
                nodes: impl Iterator<Item = (NodeId, &'w mut ColumnNode)>,
                members: &[NodeMap],
            ) -> Result<Self::Tracks<'w>> {
                let mut tracks = ($(ComponentTrack::<'w, $ty>::new(),)+);
                for (id, node) in nodes {
                    let Some((slot, registry)) = members
                        .iter()
                        .enumerate()
                        .find_map(|(slot, map)| map.get(&id).map(|&registry| (slot, registry)))
                    else {
                        continue;
                    };
                    match slot {
                        $($idx => tracks.$idx.insert(registry, node)?,)+
                        _ => {}
                    }
                }
                Ok(tracks)
            }

            fn fetch<'w>(tracks: &mut Self::Tracks<'w>, registry: NodeId) -> Option<Self::Item<'w>> {
                Some(($(tracks.$idx.next_at(registry)?,)+))
            }
        }
    };
}

impl_view_query!((A, 0));
impl_view_query!((A, 0), (B, 1));
impl_view_query!((A, 0), (B, 1), (C, 2));
impl_view_query!((A, 0), (B, 1), (C, 2), (D, 3));
impl_view_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_view_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_view_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_view_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));

/// Where a view currently stands: the anchor cursor plus one cursor per
/// component. Two positions are equal only if every cursor is.
///
/// A component cursor points at the slot the next row reads: the anchor's
/// index in the column of the anchor's entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewPosition {
    pub anchor: TreeCursor,
    pub components: SmallVec<[TreeCursor; 4]>,
}

impl ViewPosition {
    /// The position of any finished view over `components` component types.
    #[must_use]
    pub fn exhausted(components: usize) -> Self {
        Self {
            anchor: TreeCursor::exhausted(),
            components: std::iter::repeat_n(TreeCursor::exhausted(), components).collect(),
        }
    }
}

/// The columns of one requested component, as seen from the registry.
pub(crate) struct ViewColumn {
    /// Column node of the base entity type.
    pub(crate) root: NodeId,
    /// Registry node to the column node of the same entity type.
    pub(crate) nodes: FxHashMap<NodeId, NodeId>,
}

/// Lockstep iterator over a registry tree and several component trees.
///
/// Created by [`World::view`](crate::World::view).
pub struct View<'w, Q: ViewQuery> {
    topology: TopologySnapshot,
    anchor: TreeCursor,
    anchor_rows: FxHashMap<NodeId, &'w ColumnNode>,
    columns: SmallVec<[ViewColumn; 4]>,
    tracks: Q::Tracks<'w>,
}

impl<'w, Q: ViewQuery> View<'w, Q> {
    pub(crate) fn new(
        topology: TopologySnapshot,
        anchor_root: NodeId,
        anchor_rows: FxHashMap<NodeId, &'w ColumnNode>,
        columns: SmallVec<[ViewColumn; 4]>,
        tracks: Q::Tracks<'w>,
    ) -> Self {
        let anchor = TreeCursor::new(&topology, Some(anchor_root));

        Self {
            topology,
            anchor,
            anchor_rows,
            columns,
            tracks,
        }
    }

    #[must_use]
    pub fn position(&self) -> ViewPosition {
        let components = self
            .columns
            .iter()
            .map(|column| match self.anchor.node() {
                Some(registry) => TreeCursor::at(
                    column.root,
                    column.nodes.get(&registry).copied(),
                    self.anchor.index(),
                ),
                None => TreeCursor::exhausted(),
            })
            .collect();

        ViewPosition {
            anchor: self.anchor,
            components,
        }
    }

    /// Yield the anchor entity's key alongside each tuple.
    #[must_use]
    pub fn entities(self) -> ViewEntities<'w, Q> {
        ViewEntities { view: self }
    }

    fn step(&mut self) -> Option<(EntityKey, Q::Item<'w>)> {
        let node = self.anchor.node()?;
        let row: &'w ColumnNode = self.anchor_rows.get(&node).copied()?;
        let header = row.storage().header(self.anchor.index())?;
        let key = EntityKey {
            manager: self.topology.manager(node)?,
            id: header.id(),
        };

        let item = Q::fetch(&mut self.tracks, node)?;
        self.anchor.advance(&self.topology);

        Some((key, item))
    }
}

impl<'w, Q: ViewQuery> Iterator for View<'w, Q> {
    type Item = Q::Item<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().map(|(_, item)| item)
    }
}

/// A [`View`] that also yields each row's [`EntityKey`].
pub struct ViewEntities<'w, Q: ViewQuery> {
    view: View<'w, Q>,
}

impl<'w, Q: ViewQuery> ViewEntities<'w, Q> {
    #[must_use]
    pub fn position(&self) -> ViewPosition {
        self.view.position()
    }
}

impl<'w, Q: ViewQuery> Iterator for ViewEntities<'w, Q> {
    type Item = (EntityKey, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        self.view.step()
    }
}
