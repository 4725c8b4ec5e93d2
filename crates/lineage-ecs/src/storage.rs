//! Column storage - growable, default-filling sequences of one type.
//!
//! A [`Column`] holds the values of one component type for one entity type,
//! indexed by entity ID. Columns only grow: any access past the end fills the
//! gap with default values instead of failing. [`RegistryColumn`] is the same
//! storage holding whole entity records, with entity-level access on top.
//!
//! Both are reachable through the type-erased [`AnyColumn`] trait so the
//! buffer tree can hold columns of any type side by side.

use std::any::Any;

use crate::{
    component::Component,
    entity::{Entity, EntityHeader},
};

/// Type-erased view of a column.
///
/// Everything the engine needs without knowing the element type: length,
/// growth, a label for diagnostics and a checked path back to the concrete
/// column through [`Any`].
pub trait AnyColumn: Any {
    /// Number of slots in the column.
    fn len(&self) -> usize;

    /// Check if the column has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one default slot and return its index.
    fn add(&mut self) -> usize;

    /// Grow to at least `len` slots. Never shrinks.
    fn ensure_space(&mut self, len: usize);

    /// Full name of the element type.
    fn type_name(&self) -> &'static str;

    /// Entity header stored at `index`, for registry columns only.
    fn header(&self, _index: usize) -> Option<&EntityHeader> {
        None
    }

    /// Whether this column stores entity records.
    fn is_registry(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A column of values of a single type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<T> {
    data: Vec<T>,
}

impl<T: Component> Column<T> {
    /// Create a new empty column.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a column with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Read the slot at `index` without growing.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Get the slot at `index`, growing the column with default values
    /// first if it is too short.
    ///
    /// This is the grow-on-read access path: reading an unset slot yields a
    /// default value and leaves the column at least `index + 1` long.
    pub fn get_or_grow(&mut self, index: usize) -> &mut T {
        self.ensure_space(index + 1);
        &mut self.data[index]
    }

    /// Append one default value and return its index.
    pub fn add(&mut self) -> usize {
        let index = self.data.len();
        self.data.push(T::default());
        index
    }

    /// Grow to at least `len` slots, filling new slots with defaults.
    ///
    /// A no-op when the column is already long enough.
    pub fn ensure_space(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize_with(len, T::default);
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<T: Component> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> AnyColumn for Column<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn add(&mut self) -> usize {
        Column::add(self)
    }

    fn ensure_space(&mut self, len: usize) {
        Column::ensure_space(self, len);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The column holding the records of one entity type.
///
/// Storage is a plain [`Column`] of records; the wrapper adds access to each
/// record's [`EntityHeader`] through [`AnyColumn::header`], which lets
/// iteration walk records of different concrete types uniformly.
#[derive(Debug, Default)]
pub struct RegistryColumn<E: Entity> {
    records: Column<E>,
}

impl<E: Entity> RegistryColumn<E> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Column::with_capacity(capacity),
        }
    }

    /// Read-only access to the records.
    #[must_use]
    pub fn records(&self) -> &Column<E> {
        &self.records
    }

    /// Mutable access to the records.
    pub fn records_mut(&mut self) -> &mut Column<E> {
        &mut self.records
    }
}

impl<E: Entity> AnyColumn for RegistryColumn<E> {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn add(&mut self) -> usize {
        self.records.add()
    }

    fn ensure_space(&mut self, len: usize) {
        self.records.ensure_space(len);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn header(&self, index: usize) -> Option<&EntityHeader> {
        self.records.get(index).map(Entity::header)
    }

    fn is_registry(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Root;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Default)]
    struct Probe {
        header: EntityHeader,
    }

    impl Entity for Probe {
        type Super = Root;

        fn header(&self) -> &EntityHeader {
            &self.header
        }

        fn header_mut(&mut self) -> &mut EntityHeader {
            &mut self.header
        }
    }

    #[test]
    fn test_add_returns_sequential_indices() {
        let mut col = Column::<Velocity>::new();

        assert_eq!(col.add(), 0);
        assert_eq!(col.add(), 1);
        assert_eq!(col.add(), 2);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_get_or_grow_fills_with_defaults() {
        let mut col = Column::<Velocity>::new();

        col.get_or_grow(3).dx = 5.0;

        assert_eq!(col.len(), 4);
        assert_eq!(col.get(0), Some(&Velocity::default()));
        assert_eq!(col.get(3).unwrap().dx, 5.0);
    }

    #[test]
    fn test_get_does_not_grow() {
        let col = Column::<Velocity>::new();

        assert!(col.get(2).is_none());
        assert!(col.is_empty());
    }

    #[test]
    fn test_ensure_space_is_idempotent() {
        let mut col = Column::<u32>::new();
        *col.get_or_grow(0) = 7;
        *col.get_or_grow(1) = 9;

        col.ensure_space(1);
        assert_eq!(col.as_slice(), &[7, 9]);

        col.ensure_space(2);
        assert_eq!(col.as_slice(), &[7, 9]);

        col.ensure_space(4);
        assert_eq!(col.as_slice(), &[7, 9, 0, 0]);
    }

    #[test]
    fn test_erased_column_downcast() {
        let mut erased: Box<dyn AnyColumn> = Box::new(Column::<Velocity>::new());

        erased.ensure_space(2);
        assert_eq!(erased.len(), 2);
        assert!(erased.as_any().downcast_ref::<Column<u32>>().is_none());

        let typed = erased
            .as_any_mut()
            .downcast_mut::<Column<Velocity>>()
            .unwrap();
        typed.get_or_grow(1).dy = 3.0;
        assert_eq!(typed.get(1).unwrap().dy, 3.0);
    }

    #[test]
    fn test_registry_column_exposes_headers() {
        let mut registry = RegistryColumn::<Probe>::default();
        let index = registry.add();
        registry.records_mut().get_or_grow(index).header.id = 42;

        let erased: &dyn AnyColumn = &registry;
        assert!(erased.is_registry());
        assert_eq!(erased.header(0).map(EntityHeader::id), Some(42));
        assert!(erased.header(1).is_none());
    }

    #[test]
    fn test_plain_column_has_no_headers() {
        let mut col = Column::<Velocity>::new();
        col.add();

        let erased: &dyn AnyColumn = &col;
        assert!(!erased.is_registry());
        assert!(erased.header(0).is_none());
    }
}
