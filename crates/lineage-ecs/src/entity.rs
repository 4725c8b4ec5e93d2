//! Entity types, identities and typed handles.
//!
//! Entity types form a single-inheritance tree: every type names its
//! immediate supertype through [`Entity::Super`], with [`Root`] standing in
//! for the abstract root. Identities are dense per concrete type: the n-th
//! entity created of a type gets ID `n - 1`, and IDs are never reused.

use std::{fmt, hash, marker::PhantomData};

use bitflags::bitflags;

use crate::{component::Component, manager::ManagerId, world::World};

/// Dense index of an entity within its concrete type.
pub type EntityId = u32;

bitflags! {
    /// Per-record flags stored in the [`EntityHeader`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u32 {
        /// The record was produced by [`World::create`], as opposed to a
        /// default-filled slot.
        const CREATED = 1;
    }
}

/// Identity stored at the start of every entity record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityHeader {
    pub(crate) id: EntityId,
    flags: EntityFlags,
}

impl EntityHeader {
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub const fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Whether this record is a created entity rather than padding.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        self.flags.contains(EntityFlags::CREATED)
    }

    pub(crate) fn stamp(&mut self, id: EntityId) {
        self.id = id;
        self.flags.insert(EntityFlags::CREATED);
    }

    /// Insert caller-defined flags. `CREATED` is owned by the engine and
    /// cannot be set this way.
    pub fn insert_flags(&mut self, flags: EntityFlags) {
        self.flags.insert(flags.difference(EntityFlags::CREATED));
    }

    pub fn remove_flags(&mut self, flags: EntityFlags) {
        self.flags.remove(flags.difference(EntityFlags::CREATED));
    }
}

/// A user-declared entity type.
///
/// The record type itself is what the registry column stores, so it carries
/// the [`EntityHeader`] plus any scalar fields specific to the type.
/// Component data lives in separate columns and is reached through
/// [`EntityRef::component`].
///
/// Usually implemented with `#[derive(Entity)]`:
///
/// ```ignore
/// #[derive(Default, Entity)]
/// struct Node { header: EntityHeader }
///
/// #[derive(Default, Entity)]
/// #[entity(extends = Node)]
/// struct Sprite { header: EntityHeader }
/// ```
pub trait Entity: Default + 'static {
    /// Immediate supertype, or [`Root`] for top-level types.
    type Super: Supertype;

    fn header(&self) -> &EntityHeader;

    fn header_mut(&mut self) -> &mut EntityHeader;
}

/// Anything that can appear as [`Entity::Super`].
pub trait Supertype: 'static {
    /// Manager of this type, created on demand. `None` for [`Root`].
    fn manager(world: &mut World) -> Option<ManagerId>;
}

/// The abstract root of every entity hierarchy. It has no manager.
#[derive(Debug)]
pub enum Root {}

impl Supertype for Root {
    fn manager(_world: &mut World) -> Option<ManagerId> {
        None
    }
}

impl<E: Entity> Supertype for E {
    fn manager(world: &mut World) -> Option<ManagerId> {
        Some(world.manager_for::<E>())
    }
}

/// Type-erased identity of an entity: its concrete type's manager and its
/// dense ID within that type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub manager: ManagerId,
    pub id: EntityId,
}

/// Typed handle to an entity of concrete type `E`.
///
/// Handles are only produced by [`World::create`], so the ID always names
/// an existing record.
pub struct EntityRef<E> {
    id: EntityId,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityRef<E> {
    pub(crate) const fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.id as usize
    }

    /// Accessor for component `C` on this entity.
    #[must_use]
    pub const fn component<C: Component>(self) -> ComponentRef<E, C> {
        ComponentRef {
            entity: self,
            _marker: PhantomData,
        }
    }
}

impl<E> Clone for EntityRef<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EntityRef<E> {}

impl<E> PartialEq for EntityRef<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for EntityRef<E> {}

impl<E> hash::Hash for EntityRef<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E> fmt::Debug for EntityRef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = crate::component::short_type_name(std::any::type_name::<E>());
        write!(f, "{name}#{}", self.id)
    }
}

/// Accessor for component `C` of one entity of type `E`.
///
/// Resolves the column through the entity's concrete type on every call, so
/// it stays valid as the world grows.
pub struct ComponentRef<E, C> {
    entity: EntityRef<E>,
    _marker: PhantomData<fn() -> C>,
}

impl<E: Entity, C: Component> ComponentRef<E, C> {
    #[must_use]
    pub const fn entity(&self) -> EntityRef<E> {
        self.entity
    }

    /// Read the value without creating or growing anything.
    ///
    /// Returns `None` if the column does not exist yet or does not reach
    /// this entity.
    #[must_use]
    pub fn get<'w>(&self, world: &'w World) -> Option<&'w C> {
        world.get::<C, E>(self.entity)
    }

    /// Mutable access that creates the column and grows it as needed,
    /// yielding a default value for unset slots.
    pub fn get_mut<'w>(&self, world: &'w mut World) -> &'w mut C {
        world.get_or_default::<C, E>(self.entity)
    }

    /// Overwrite the value.
    pub fn set(&self, world: &mut World, value: C) {
        *self.get_mut(world) = value;
    }
}

impl<E, C> Clone for ComponentRef<E, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, C> Copy for ComponentRef<E, C> {}

impl<E, C> fmt::Debug for ComponentRef<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = crate::component::short_type_name(std::any::type_name::<C>());
        write!(f, "{:?}.{name}", self.entity)
    }
}
