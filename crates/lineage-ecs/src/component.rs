//! Component type registration and metadata.
//!
//! Components are plain data types stored column-wise, one column per
//! (entity type, component type) pair. Each component type gets a
//! world-local ID plus the metadata needed to build its columns without
//! knowing the concrete type at the call site.

use std::{any::TypeId, fmt};

use rustc_hash::FxHashMap;

use crate::storage::{AnyColumn, Column};

/// Marker trait for types that can be stored in a column.
///
/// Columns grow by default-constructing new slots, so every component
/// must implement [`Default`].
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct Velocity { dx: f32, dy: f32 }
/// ```
pub trait Component: Default + 'static {}

// Blanket implementation for all suitable types
impl<T: Default + 'static> Component for T {}

/// Unique identifier for a component type within one [`World`](crate::World).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create a component ID from a raw value.
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

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

type ColumnFactory = fn(usize) -> Box<dyn AnyColumn>;

/// Runtime information about a component type.
#[derive(Clone)]
pub struct ComponentInfo {
    /// Unique ID for this component type.
    id: ComponentId,
    /// Type name for diagnostics.
    name: &'static str,
    /// Rust TypeId for type checking.
    type_id: TypeId,
    /// Builds an empty column of this type with the given capacity.
    new_column: ColumnFactory,
}

impl ComponentInfo {
    /// Create component info for a concrete type.
    #[must_use]
    pub fn of<T: Component>(id: ComponentId) -> Self {
        Self {
            id,
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            new_column: |capacity| {
                Box::new(Column::<T>::with_capacity(capacity)) as Box<dyn AnyColumn>
            },
        }
    }

    /// Get the component ID.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Get the full component type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Get the type name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// Build an empty column for this component type.
    #[must_use]
    pub fn new_column(&self, capacity: usize) -> Box<dyn AnyColumn> {
        (self.new_column)(capacity)
    }

    /// Check if this info is for the given type.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Strip the module path from a type name, keeping generic arguments intact.
#[must_use]
pub fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => full.get(pos + 2..).unwrap_or(full),
        None => full,
    }
}

/// Registry for component types.
///
/// Maps Rust types to `ComponentId`s and stores metadata about each type.
/// IDs are dense and assigned in registration order.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Map from TypeId to ComponentId.
    type_to_id: FxHashMap<TypeId, ComponentId>,
    /// Component info indexed by ComponentId.
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type and return its ID.
    ///
    /// If the type is already registered, returns the existing ID.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();

        if let Some(&id) = self.type_to_id.get(&type_id) {
            return id;
        }

        let id = ComponentId(self.infos.len() as u32);
        self.type_to_id.insert(type_id, id);
        self.infos.push(ComponentInfo::of::<T>(id));

        id
    }

    /// Get the component ID for a type, if registered.
    #[must_use]
    pub fn get_id<T: Component>(&self) -> Option<ComponentId> {
        self.type_to_id.get(&TypeId::of::<T>()).copied()
    }

    /// Get component info by ID.
    #[must_use]
    pub fn get_info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.as_raw() as usize)
    }

    /// Get the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterate over all registered component infos.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.infos.iter()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.len())
            .field("components", &self.infos)
            .finish()
    }
}
