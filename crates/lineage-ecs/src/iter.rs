//! Tree iteration - flattening a buffer tree into one sequence.
//!
//! A [`TreeCursor`] walks the elements of every column node in a subtree in
//! pre-order: the node's own elements first, then each child subtree in
//! sibling order. Empty nodes are skipped. Because a supertype's column is
//! always the parent of its subtypes' columns, a cursor started at the column
//! of entity type `B` visits the values of `B` and of every subtype of `B`.

use crate::{
    component::Component,
    entity::EntityKey,
    storage::Column,
    tree::{ColumnArena, NodeId, Topology, successor},
};

/// Position in a flattened buffer tree: a node and an index inside it.
///
/// Two cursors are equal when they point at the same slot of the same node,
/// or when both are exhausted.
#[derive(Clone, Copy, Debug)]
pub struct TreeCursor {
    root: Option<NodeId>,
    node: Option<NodeId>,
    index: usize,
}

impl TreeCursor {
    /// Cursor at the first element of the subtree rooted at `root`.
    ///
    /// `None` yields an exhausted cursor.
    pub fn new<T: Topology + ?Sized>(topology: &T, root: Option<NodeId>) -> Self {
        let mut cursor = Self {
            root,
            node: root,
            index: 0,
        };
        cursor.settle(topology);
        cursor
    }

    /// A cursor past the end of any tree.
    #[must_use]
    pub const fn exhausted() -> Self {
        Self {
            root: None,
            node: None,
            index: 0,
        }
    }

    /// Cursor at slot `index` of `node` inside the tree rooted at `root`.
    ///
    /// A missing `node` yields an exhausted cursor.
    pub(crate) const fn at(root: NodeId, node: Option<NodeId>, index: usize) -> Self {
        match node {
            Some(_) => Self {
                root: Some(root),
                node,
                index,
            },
            None => Self::exhausted(),
        }
    }

    /// Root of the subtree this cursor walks.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node holding the current element.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Index of the current element inside [`node`](Self::node).
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.node.is_none()
    }

    /// Step to the next element.
    pub fn advance<T: Topology + ?Sized>(&mut self, topology: &T) {
        if self.node.is_some() {
            self.index += 1;
            self.settle(topology);
        }
    }

    /// Skip forward until the cursor points at an element or runs out.
    fn settle<T: Topology + ?Sized>(&mut self, topology: &T) {
        while let (Some(node), Some(root)) = (self.node, self.root) {
            if self.index < topology.len(node) {
                return;
            }
            self.node = successor(topology, root, node);
            self.index = 0;
        }
        self.node = None;
        self.index = 0;
    }
}

impl PartialEq for TreeCursor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.index == other.index
    }
}

impl Eq for TreeCursor {}

/// Read-only iterator over the values of one component type across an
/// entity type and all its subtypes.
///
/// Created by [`World::iter`](crate::World::iter).
pub struct ColumnIter<'w, C> {
    arena: &'w ColumnArena,
    cursor: TreeCursor,
    current: Option<(NodeId, &'w [C])>,
}

impl<'w, C: Component> ColumnIter<'w, C> {
    pub(crate) fn new(arena: &'w ColumnArena, root: Option<NodeId>) -> Self {
        Self {
            arena,
            cursor: TreeCursor::new(arena, root),
            current: None,
        }
    }

    /// Position of the next element to be yielded.
    #[must_use]
    pub const fn cursor(&self) -> TreeCursor {
        self.cursor
    }

    fn slice(&mut self, node: NodeId) -> Option<&'w [C]> {
        match self.current {
            Some((current, slice)) if current == node => Some(slice),
            _ => {
                let column = self.arena.get(node)?.downcast::<Column<C>>().ok()?;
                let slice = column.as_slice();
                self.current = Some((node, slice));
                Some(slice)
            }
        }
    }
}

impl<'w, C: Component> Iterator for ColumnIter<'w, C> {
    type Item = &'w C;

    fn next(&mut self) -> Option<&'w C> {
        let node = self.cursor.node()?;
        let item = self.slice(node)?.get(self.cursor.index())?;
        self.cursor.advance(self.arena);
        Some(item)
    }
}

impl<C> PartialEq for ColumnIter<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor
    }
}

/// Entity-level iterator over a registry subtree.
///
/// Yields the [`EntityKey`] of every record of an entity type and all its
/// subtypes, in the same order a view visits them. Created by
/// [`World::entities`](crate::World::entities).
pub struct EntityIter<'w> {
    arena: &'w ColumnArena,
    cursor: TreeCursor,
}

impl<'w> EntityIter<'w> {
    pub(crate) fn new(arena: &'w ColumnArena, root: Option<NodeId>) -> Self {
        Self {
            arena,
            cursor: TreeCursor::new(arena, root),
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> TreeCursor {
        self.cursor
    }
}

impl Iterator for EntityIter<'_> {
    type Item = EntityKey;

    fn next(&mut self) -> Option<EntityKey> {
        let node = self.arena.get(self.cursor.node()?)?;
        let header = node.storage().header(self.cursor.index())?;
        let key = EntityKey {
            manager: node.manager(),
            id: header.id(),
        };
        self.cursor.advance(self.arena);
        Some(key)
    }
}
