//! The buffer tree - arena-allocated column nodes and their links.
//!
//! Every column in a world lives in one [`ColumnArena`] and is addressed by
//! [`NodeId`]. Columns sharing a [`ColumnKey`] are linked into a tree that
//! mirrors the part of the manager hierarchy that uses the key: a node's
//! parent is the column of the nearest supertype that has one.
//!
//! ```text
//!   Node:Velocity
//!     ├── Sprite:Velocity
//!     │     └── AnimatedSprite:Velocity
//!     └── Label:Velocity
//! ```
//!
//! Children form a singly linked list (`children` head, `next` sibling)
//! ordered by manager ID, so every tree over the same managers has the same
//! pre-order.

use std::fmt;

use crate::{
    component::ComponentId,
    error::{EcsError, Result},
    manager::ManagerId,
    storage::AnyColumn,
};

/// Handle to a column node in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a column stores: entity records or one component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    Registry,
    Component(ComponentId),
}

/// A column plus its position in the buffer tree.
pub struct ColumnNode {
    manager: ManagerId,
    key: ColumnKey,
    parent: Option<NodeId>,
    children: Option<NodeId>,
    next: Option<NodeId>,
    storage: Box<dyn AnyColumn>,
}

impl ColumnNode {
    /// Manager of the entity type this column belongs to.
    #[must_use]
    pub const fn manager(&self) -> ManagerId {
        self.manager
    }

    #[must_use]
    pub const fn key(&self) -> ColumnKey {
        self.key
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Head of the child list.
    #[must_use]
    pub const fn children(&self) -> Option<NodeId> {
        self.children
    }

    /// Next sibling.
    #[must_use]
    pub const fn next(&self) -> Option<NodeId> {
        self.next
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Full name of the stored element type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.storage.type_name()
    }

    #[must_use]
    pub fn storage(&self) -> &dyn AnyColumn {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn AnyColumn {
        self.storage.as_mut()
    }

    /// Checked downcast to the concrete column type.
    pub fn downcast<T: AnyColumn>(&self) -> Result<&T> {
        let found = self.storage.type_name();
        self.storage
            .as_any()
            .downcast_ref::<T>()
            .ok_or(EcsError::InvalidComponentType {
                expected: std::any::type_name::<T>(),
                found,
            })
    }

    /// Checked mutable downcast to the concrete column type.
    pub fn downcast_mut<T: AnyColumn>(&mut self) -> Result<&mut T> {
        let found = self.storage.type_name();
        self.storage
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(EcsError::InvalidComponentType {
                expected: std::any::type_name::<T>(),
                found,
            })
    }
}

impl fmt::Debug for ColumnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnNode")
            .field("manager", &self.manager)
            .field("key", &self.key)
            .field("type", &self.type_name())
            .field("len", &self.len())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("next", &self.next)
            .finish()
    }
}

/// Read access to buffer-tree structure.
///
/// Implemented by the live arena and by [`TopologySnapshot`], so traversal
/// code works against either. A node handle from another arena has no links,
/// no manager and no elements.
pub trait Topology {
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn first_child(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn manager(&self, node: NodeId) -> Option<ManagerId>;
    fn len(&self, node: NodeId) -> usize;
}

/// Pre-order successor of `node`, confined to the subtree rooted at `root`.
///
/// Goes to the first child if there is one; otherwise to the next sibling of
/// the nearest node (starting at `node`) that has one, without climbing past
/// `root`.
pub fn successor<T: Topology + ?Sized>(topology: &T, root: NodeId, node: NodeId) -> Option<NodeId> {
    if let Some(child) = topology.first_child(node) {
        return Some(child);
    }

    let mut current = node;
    loop {
        if current == root {
            return None;
        }
        if let Some(next) = topology.next_sibling(current) {
            return Some(next);
        }
        current = topology.parent(current)?;
    }
}

/// Pre-order walk over the nodes of the subtree rooted at `root`.
pub fn subtree<T: Topology + ?Sized>(topology: &T, root: NodeId) -> Subtree<'_, T> {
    Subtree {
        topology,
        root,
        next: Some(root),
    }
}

/// Iterator returned by [`subtree`].
pub struct Subtree<'a, T: ?Sized> {
    topology: &'a T,
    root: NodeId,
    next: Option<NodeId>,
}

impl<T: Topology + ?Sized> Iterator for Subtree<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = successor(self.topology, self.root, current);
        Some(current)
    }
}

/// Owner of every column node in a world.
#[derive(Default)]
pub struct ColumnArena {
    nodes: Vec<ColumnNode>,
}

impl ColumnArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unlinked node.
    pub(crate) fn push(
        &mut self,
        manager: ManagerId,
        key: ColumnKey,
        storage: Box<dyn AnyColumn>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ColumnNode {
            manager,
            key,
            parent: None,
            children: None,
            next: None,
            storage,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ColumnNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ColumnNode> {
        self.nodes.get_mut(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ColumnNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut ColumnNode)> {
        self.nodes
            .iter_mut()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Direct children of `node`, in list order.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(node).and_then(ColumnNode::children), |&child| {
            self.get(child).and_then(ColumnNode::next)
        })
    }

    /// Link `child` (currently unlinked) under `parent`, keeping the child
    /// list ordered by manager ID.
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());

        let manager = self.nodes[child.index()].manager;
        let mut prev: Option<NodeId> = None;
        let mut cursor = self.nodes[parent.index()].children;

        while let Some(current) = cursor {
            if self.nodes[current.index()].manager > manager {
                break;
            }
            prev = Some(current);
            cursor = self.nodes[current.index()].next;
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[child.index()].next = cursor;
        match prev {
            Some(prev) => self.nodes[prev.index()].next = Some(child),
            None => self.nodes[parent.index()].children = Some(child),
        }
    }

    /// Detach `node` from its parent's child list. Its own children stay.
    pub(crate) fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.index()].parent else {
            return;
        };
        let next = self.nodes[node.index()].next;

        if self.nodes[parent.index()].children == Some(node) {
            self.nodes[parent.index()].children = next;
        } else {
            let mut cursor = self.nodes[parent.index()].children;
            while let Some(current) = cursor {
                if self.nodes[current.index()].next == Some(node) {
                    self.nodes[current.index()].next = next;
                    break;
                }
                cursor = self.nodes[current.index()].next;
            }
        }

        self.nodes[node.index()].parent = None;
        self.nodes[node.index()].next = None;
    }

    /// Copy the link structure and lengths of every node.
    #[must_use]
    pub fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot {
            links: self
                .nodes
                .iter()
                .map(|node| NodeLinks {
                    manager: node.manager,
                    parent: node.parent,
                    children: node.children,
                    next: node.next,
                    len: node.len(),
                })
                .collect(),
        }
    }
}

impl Topology for ColumnArena {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.children
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.next
    }

    fn manager(&self, node: NodeId) -> Option<ManagerId> {
        self.get(node).map(ColumnNode::manager)
    }

    fn len(&self, node: NodeId) -> usize {
        self.get(node).map_or(0, ColumnNode::len)
    }
}

impl fmt::Debug for ColumnArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}

#[derive(Clone, Copy, Debug)]
struct NodeLinks {
    manager: ManagerId,
    parent: Option<NodeId>,
    children: Option<NodeId>,
    next: Option<NodeId>,
    len: usize,
}

/// Frozen copy of the arena's structure.
///
/// Lets traversal continue while the column data itself is mutably
/// borrowed elsewhere.
#[derive(Clone, Debug)]
pub struct TopologySnapshot {
    links: Vec<NodeLinks>,
}

impl TopologySnapshot {
    fn links(&self, node: NodeId) -> Option<&NodeLinks> {
        self.links.get(node.index())
    }
}

impl Topology for TopologySnapshot {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.links(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.links(node)?.children
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.links(node)?.next
    }

    fn manager(&self, node: NodeId) -> Option<ManagerId> {
        self.links(node).map(|links| links.manager)
    }

    fn len(&self, node: NodeId) -> usize {
        self.links(node).map_or(0, |links| links.len)
    }
}
