//! Type managers - one node per entity type.
//!
//! Managers mirror the entity-type inheritance graph. Each one records its
//! supertype's manager, the subtypes seen so far, the registry column of
//! its records and one column node per component type used on it.

use std::{any::TypeId, fmt};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    component::{ComponentId, short_type_name},
    entity::Entity,
    tree::{ColumnKey, NodeId},
};

/// Unique identifier for a type manager, assigned in creation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(u32);

impl ManagerId {
    /// Create a manager ID from a raw value.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManagerId({})", self.0)
    }
}

/// Per-entity-type bookkeeping.
pub struct TypeManager {
    id: ManagerId,
    type_id: TypeId,
    type_name: &'static str,
    /// Manager of the immediate supertype; `None` for top-level types.
    parent: Option<ManagerId>,
    /// Managers of direct subtypes, in creation order.
    subtypes: SmallVec<[ManagerId; 4]>,
    /// Column node holding this type's entity records.
    registry: Option<NodeId>,
    /// Column node per component type used on this entity type.
    components: FxHashMap<ComponentId, NodeId>,
}

impl TypeManager {
    fn new<E: Entity>(id: ManagerId, parent: Option<ManagerId>) -> Self {
        Self {
            id,
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            parent,
            subtypes: SmallVec::new(),
            registry: None,
            components: FxHashMap::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ManagerId {
        self.id
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full name of the entity type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Entity type name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<ManagerId> {
        self.parent
    }

    #[must_use]
    pub fn subtypes(&self) -> &[ManagerId] {
        &self.subtypes
    }

    #[must_use]
    pub const fn registry(&self) -> Option<NodeId> {
        self.registry
    }

    /// Column node for a component type, without creating it.
    #[must_use]
    pub fn column(&self, component: ComponentId) -> Option<NodeId> {
        self.components.get(&component).copied()
    }

    /// Component column nodes, sorted by component ID.
    #[must_use]
    pub fn columns(&self) -> SmallVec<[(ComponentId, NodeId); 8]> {
        let mut columns: SmallVec<[(ComponentId, NodeId); 8]> =
            self.components.iter().map(|(&c, &n)| (c, n)).collect();
        columns.sort_unstable();
        columns
    }

    /// Column node for any key, without creating it.
    #[must_use]
    pub fn node(&self, key: ColumnKey) -> Option<NodeId> {
        match key {
            ColumnKey::Registry => self.registry,
            ColumnKey::Component(component) => self.column(component),
        }
    }

    pub(crate) fn set_node(&mut self, key: ColumnKey, node: NodeId) {
        match key {
            ColumnKey::Registry => self.registry = Some(node),
            ColumnKey::Component(component) => {
                self.components.insert(component, node);
            }
        }
    }
}

impl fmt::Debug for TypeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeManager")
            .field("id", &self.id)
            .field("type", &self.short_name())
            .field("parent", &self.parent)
            .field("subtypes", &self.subtypes)
            .field("registry", &self.registry)
            .field("columns", &self.components.len())
            .finish()
    }
}

/// All managers of a world, addressable by ID or by entity type.
#[derive(Default)]
pub struct ManagerRegistry {
    by_type: FxHashMap<TypeId, ManagerId>,
    managers: Vec<TypeManager>,
}

impl ManagerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager of `E`, if it has been created.
    #[must_use]
    pub fn lookup<E: Entity>(&self) -> Option<ManagerId> {
        self.by_type.get(&TypeId::of::<E>()).copied()
    }

    /// Add the manager for `E` and link it under `parent`.
    ///
    /// The caller must have checked that `E` has no manager yet.
    pub(crate) fn insert<E: Entity>(&mut self, parent: Option<ManagerId>) -> ManagerId {
        debug_assert!(self.lookup::<E>().is_none(), "manager created twice");

        let id = ManagerId(self.managers.len() as u32);
        self.managers.push(TypeManager::new::<E>(id, parent));
        self.by_type.insert(TypeId::of::<E>(), id);

        if let Some(parent) = parent {
            self.managers[parent.0 as usize].subtypes.push(id);
        }

        id
    }

    #[must_use]
    pub fn get(&self, id: ManagerId) -> Option<&TypeManager> {
        self.managers.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: ManagerId) -> Option<&mut TypeManager> {
        self.managers.get_mut(id.0 as usize)
    }

    /// Walk from `id` up to the top-level type, starting with `id` itself.
    pub fn ancestry(&self, id: ManagerId) -> impl Iterator<Item = &TypeManager> {
        std::iter::successors(self.get(id), |manager| {
            manager.parent.and_then(|parent| self.get(parent))
        })
    }

    /// Whether `ancestor` is `id` or one of its supertypes.
    #[must_use]
    pub fn is_same_or_subtype(&self, id: ManagerId, ancestor: ManagerId) -> bool {
        self.ancestry(id).any(|manager| manager.id == ancestor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeManager> {
        self.managers.iter()
    }
}

impl fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.managers).finish()
    }
}
