//! World - the owner of every manager, column and entity record.
//!
//! The World holds the component registry, one [`TypeManager`] per entity
//! type and the arena of column nodes. Managers and columns are created
//! lazily the first time something asks for them, and live until the World
//! is dropped.

use std::any::type_name;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    component::{Component, ComponentId, ComponentInfo, ComponentRegistry, short_type_name},
    entity::{Entity, EntityId, EntityKey, EntityRef, Supertype},
    error::{EcsError, Result},
    iter::{ColumnIter, EntityIter},
    manager::{ManagerId, ManagerRegistry, TypeManager},
    storage::{AnyColumn, Column, RegistryColumn},
    tree::{ColumnArena, ColumnKey, ColumnNode, NodeId, subtree},
    view::{NodeMap, NodeSet, View, ViewColumn, ViewQuery},
};

/// Construction-time settings for a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Elements reserved by every newly created column.
    pub column_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { column_capacity: 16 }
    }
}

/// The ECS world - container for all entity types and their columns.
pub struct World {
    config: WorldConfig,
    /// Component type registry.
    components: ComponentRegistry,
    /// One manager per entity type.
    managers: ManagerRegistry,
    /// Every column node, registry and component alike.
    arena: ColumnArena,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            components: ComponentRegistry::new(),
            managers: ManagerRegistry::new(),
            arena: ColumnArena::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ==================== Managers ====================

    /// Manager of `E`, creating it and any missing supertype managers.
    pub fn manager_for<E: Entity>(&mut self) -> ManagerId {
        if let Some(id) = self.managers.lookup::<E>() {
            return id;
        }

        let parent = <E::Super as Supertype>::manager(self);
        let id = self.managers.insert::<E>(parent);
        debug!(
            "created manager {:?} for {} (parent {:?})",
            id,
            short_type_name(type_name::<E>()),
            parent
        );
        id
    }

    /// Manager of `E`, if it exists.
    #[must_use]
    pub fn manager_id<E: Entity>(&self) -> Option<ManagerId> {
        self.managers.lookup::<E>()
    }

    #[must_use]
    pub fn manager(&self, id: ManagerId) -> Option<&TypeManager> {
        self.managers.get(id)
    }

    #[must_use]
    pub const fn managers(&self) -> &ManagerRegistry {
        &self.managers
    }

    // ==================== Components ====================

    /// Register a component type and return its ID.
    pub fn register_component<C: Component>(&mut self) -> ComponentId {
        self.components.register::<C>()
    }

    #[must_use]
    pub fn component_id<C: Component>(&self) -> Option<ComponentId> {
        self.components.get_id::<C>()
    }

    #[must_use]
    pub fn component_info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.components.get_info(id)
    }

    #[must_use]
    pub const fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    // ==================== Columns ====================

    #[must_use]
    pub const fn arena(&self) -> &ColumnArena {
        &self.arena
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ColumnNode> {
        self.arena.get(id)
    }

    /// Column node of component `C` on `manager`, without creating it.
    #[must_use]
    pub fn column_id<C: Component>(&self, manager: ManagerId) -> Option<NodeId> {
        let component = self.components.get_id::<C>()?;
        self.managers.get(manager)?.column(component)
    }

    /// Column node of component `C` on `manager`, creating it if needed.
    ///
    /// A new column is linked under the nearest supertype column of `C`,
    /// adopts the `C` columns of subtypes and is sized to the manager's
    /// entity count.
    ///
    /// # Panics
    ///
    /// Panics if `manager` was not created by this world.
    pub fn get_or_create_column<C: Component>(&mut self, manager: ManagerId) -> NodeId {
        let component = self.components.register::<C>();
        self.get_or_create_column_by_id(manager, component)
            .expect("manager belongs to this world")
    }

    /// Type-erased form of [`get_or_create_column`](Self::get_or_create_column).
    pub fn get_or_create_column_by_id(
        &mut self,
        manager: ManagerId,
        component: ComponentId,
    ) -> Result<NodeId> {
        let Some(owner) = self.managers.get(manager) else {
            return Err(EcsError::UnknownManager(manager));
        };
        if let Some(node) = owner.column(component) {
            return Ok(node);
        }

        let info = self
            .components
            .get_info(component)
            .ok_or(EcsError::UnknownComponent(component))?;
        let storage = info.new_column(self.config.column_capacity);

        let node = self.insert_node(manager, ColumnKey::Component(component), storage);
        let count = self.entity_count_of(manager);
        if let Some(column) = self.arena.get_mut(node) {
            column.storage_mut().ensure_space(count);
        }
        Ok(node)
    }

    /// Registry column of `E`, creating it if needed.
    pub fn get_or_create_registry<E: Entity>(&mut self) -> NodeId {
        let manager = self.manager_for::<E>();
        if let Some(node) = self.managers.get(manager).and_then(TypeManager::registry) {
            return node;
        }

        let storage = Box::new(RegistryColumn::<E>::with_capacity(self.config.column_capacity));
        self.insert_node(manager, ColumnKey::Registry, storage)
    }

    /// Typed view of a component column node.
    pub fn column<C: Component>(&self, node: NodeId) -> Result<&Column<C>> {
        self.arena
            .get(node)
            .ok_or(EcsError::UnknownNode(node))?
            .downcast::<Column<C>>()
    }

    /// Typed mutable view of a component column node.
    pub fn column_mut<C: Component>(&mut self, node: NodeId) -> Result<&mut Column<C>> {
        self.arena
            .get_mut(node)
            .ok_or(EcsError::UnknownNode(node))?
            .downcast_mut::<Column<C>>()
    }

    /// Push a node for `key` on `manager` and splice it into its tree.
    fn insert_node(
        &mut self,
        manager: ManagerId,
        key: ColumnKey,
        storage: Box<dyn AnyColumn>,
    ) -> NodeId {
        let parent = self
            .managers
            .ancestry(manager)
            .skip(1)
            .find_map(|ancestor| ancestor.node(key));

        let node = self.arena.push(manager, key, storage);
        if let Some(parent) = parent {
            self.arena.link_child(parent, node);
        }
        self.adopt(manager, key, node);

        if let Some(owner) = self.managers.get_mut(manager) {
            owner.set_node(key, node);
        }

        debug!(
            "created {:?} column {:?} on manager {:?} (parent {:?})",
            key, node, manager, parent
        );
        node
    }

    /// Re-parent the `key` columns of subtypes of `manager` under `node`.
    ///
    /// Only the topmost column along each subtype path moves; deeper ones
    /// stay attached to it.
    fn adopt(&mut self, manager: ManagerId, key: ColumnKey, node: NodeId) {
        let mut pending: SmallVec<[ManagerId; 8]> = self
            .managers
            .get(manager)
            .map(|owner| SmallVec::from_slice(owner.subtypes()))
            .unwrap_or_default();

        while let Some(subtype) = pending.pop() {
            let Some(sub) = self.managers.get(subtype) else {
                continue;
            };

            match sub.node(key) {
                Some(existing) => {
                    self.arena.unlink(existing);
                    self.arena.link_child(node, existing);
                    debug!("moved {:?} column {:?} under {:?}", key, existing, node);
                }
                None => pending.extend_from_slice(sub.subtypes()),
            }
        }
    }

    fn entity_count_of(&self, manager: ManagerId) -> usize {
        self.managers
            .get(manager)
            .and_then(TypeManager::registry)
            .and_then(|node| self.arena.get(node))
            .map_or(0, ColumnNode::len)
    }

    // ==================== Entities ====================

    /// Create an entity of type `E`.
    ///
    /// The new record gets the next dense ID of `E`. Every component
    /// declared on `E` or any of its supertypes then gets a column on `E`
    /// long enough to hold the new entity.
    ///
    /// # Panics
    ///
    /// Panics if the registry node of `E` holds records of another type,
    /// which only column APIs outside this module could cause.
    pub fn create<E: Entity>(&mut self) -> EntityRef<E> {
        let manager = self.manager_for::<E>();
        let registry = self.get_or_create_registry::<E>();

        let records = self
            .arena
            .get_mut(registry)
            .and_then(|node| node.downcast_mut::<RegistryColumn<E>>().ok())
            .expect("registry column holds its own entity type")
            .records_mut();

        let index = records.add();
        let id = index as EntityId;
        records.get_or_grow(index).header_mut().stamp(id);

        self.backfill(manager, index + 1);

        trace!("created {}#{}", short_type_name(type_name::<E>()), id);
        EntityRef::new(id)
    }

    /// Grow `manager`'s own column of every component found along its
    /// supertype chain to at least `len`.
    fn backfill(&mut self, manager: ManagerId, len: usize) {
        let mut components: SmallVec<[ComponentId; 8]> = self
            .managers
            .ancestry(manager)
            .flat_map(|ancestor| ancestor.columns().into_iter().map(|(component, _)| component))
            .collect();
        components.sort_unstable();
        components.dedup();

        for component in components {
            let Ok(node) = self.get_or_create_column_by_id(manager, component) else {
                continue;
            };
            if let Some(column) = self.arena.get_mut(node) {
                column.storage_mut().ensure_space(len);
            }
        }
    }

    /// Number of entities of exactly type `E` created so far.
    #[must_use]
    pub fn entity_count<E: Entity>(&self) -> usize {
        self.managers
            .lookup::<E>()
            .map_or(0, |manager| self.entity_count_of(manager))
    }

    /// Type-erased identity of `entity`.
    #[must_use]
    pub fn key_of<E: Entity>(&self, entity: EntityRef<E>) -> Option<EntityKey> {
        Some(EntityKey {
            manager: self.managers.lookup::<E>()?,
            id: entity.id(),
        })
    }

    /// The full record of `entity`.
    #[must_use]
    pub fn record<E: Entity>(&self, entity: EntityRef<E>) -> Option<&E> {
        let registry = self.managers.get(self.managers.lookup::<E>()?)?.registry()?;
        self.arena
            .get(registry)?
            .downcast::<RegistryColumn<E>>()
            .ok()?
            .records()
            .get(entity.index())
    }

    pub fn record_mut<E: Entity>(&mut self, entity: EntityRef<E>) -> Option<&mut E> {
        let registry = self.managers.get(self.managers.lookup::<E>()?)?.registry()?;
        self.arena
            .get_mut(registry)?
            .downcast_mut::<RegistryColumn<E>>()
            .ok()?
            .records_mut()
            .as_mut_slice()
            .get_mut(entity.index())
    }

    /// Read component `C` of `entity` without creating or growing anything.
    #[must_use]
    pub fn get<C: Component, E: Entity>(&self, entity: EntityRef<E>) -> Option<&C> {
        let manager = self.managers.lookup::<E>()?;
        self.column::<C>(self.column_id::<C>(manager)?)
            .ok()?
            .get(entity.index())
    }

    /// Mutable access to component `C` of `entity`, creating and growing
    /// its column as needed.
    ///
    /// # Panics
    ///
    /// Panics if the column node registered for `C` holds another type,
    /// which only column APIs outside this module could cause.
    pub fn get_or_default<C: Component, E: Entity>(&mut self, entity: EntityRef<E>) -> &mut C {
        let manager = self.manager_for::<E>();
        let node = self.get_or_create_column::<C>(manager);
        self.column_mut::<C>(node)
            .expect("component column holds its own type")
            .get_or_grow(entity.index())
    }

    // ==================== Iteration ====================

    /// Values of component `C` on every entity of type `B` and its
    /// subtypes, in tree order.
    ///
    /// Creates the `C` column of `B` if it is missing, so subtype columns
    /// created earlier are gathered under it.
    pub fn iter<B: Entity, C: Component>(&mut self) -> ColumnIter<'_, C> {
        let manager = self.manager_for::<B>();
        let root = self.get_or_create_column::<C>(manager);
        ColumnIter::new(&self.arena, Some(root))
    }

    /// Keys of every entity of type `B` and its subtypes, in tree order.
    pub fn entities<B: Entity>(&mut self) -> EntityIter<'_> {
        let root = self.get_or_create_registry::<B>();
        EntityIter::new(&self.arena, Some(root))
    }

    /// Join the registry of `B` with the columns of every component in `Q`.
    ///
    /// Missing columns are created for every entity type under `B` and
    /// grown to its entity count first. Rows follow the registry of `B`:
    /// each one reads the same slot of every column on the entity's type.
    pub fn view<B: Entity, Q: ViewQuery>(&mut self) -> Result<View<'_, Q>> {
        let base = self.manager_for::<B>();
        let anchor = self.get_or_create_registry::<B>();

        let components = Q::register(&mut self.components);
        for (i, component) in components.iter().enumerate() {
            if components[..i].contains(component) {
                return Err(EcsError::DuplicateComponent(self.component_name(*component)));
            }
        }

        let registries: SmallVec<[(NodeId, ManagerId, usize); 8]> = subtree(&self.arena, anchor)
            .filter_map(|node| {
                let column = self.arena.get(node)?;
                Some((node, column.manager(), column.len()))
            })
            .collect();

        let mut columns: SmallVec<[ViewColumn; 4]> = SmallVec::new();
        for &component in &components {
            let mut nodes = FxHashMap::default();
            for &(registry, manager, len) in &registries {
                let node = self.get_or_create_column_by_id(manager, component)?;
                if let Some(column) = self.arena.get_mut(node) {
                    column.storage_mut().ensure_space(len);
                }
                nodes.insert(registry, node);
            }
            let root = self.get_or_create_column_by_id(base, component)?;
            columns.push(ViewColumn { root, nodes });
        }

        let members: SmallVec<[NodeMap; 4]> = columns
            .iter()
            .map(|column| {
                column
                    .nodes
                    .iter()
                    .map(|(&registry, &node)| (node, registry))
                    .collect()
            })
            .collect();
        let anchor_nodes: NodeSet = registries.iter().map(|&(node, ..)| node).collect();
        let topology = self.arena.snapshot();

        trace!(
            "view over {} with {} components, {} entity types",
            short_type_name(type_name::<B>()),
            components.len(),
            anchor_nodes.len()
        );

        let mut anchor_rows = FxHashMap::default();
        let tracks = Q::bind(
            self.arena.iter_mut().filter_map(|(id, node)| {
                if anchor_nodes.contains(&id) {
                    anchor_rows.insert(id, &*node);
                    None
                } else {
                    Some((id, node))
                }
            }),
            &members,
        )?;

        Ok(View::new(topology, anchor, anchor_rows, columns, tracks))
    }

    fn component_name(&self, component: ComponentId) -> &'static str {
        self.components
            .get_info(component)
            .map_or("<unknown>", ComponentInfo::short_name)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("components", &self.components.len())
            .field("managers", &self.managers)
            .field("nodes", &self.arena.len())
            .finish()
    }
}
