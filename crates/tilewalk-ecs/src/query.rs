//! Typed queries over the entity registry.
//!
//! A query is a tuple of [`QueryItem`]s such as `(&Position, &Input)` or
//! `(&Animation, Option<&Render>)`. Iterating it yields
//! `(EntityId, (&C1, &C2, ...))` for every entity that carries all required
//! components, in registry insertion order. Queries are read-only: component
//! replacement goes through [`World::insert`](crate::world::World::insert) or a
//! [`CommandBuffer`](crate::command::CommandBuffer).

use std::marker::PhantomData;

use crate::component::ComponentData;
use crate::entity::EntityId;
use crate::world::Entity;

// ---------------------------------------------------------------------------
// QueryItem trait -- describes one element in a query tuple
// ---------------------------------------------------------------------------

/// A single element of a query: `&T` (required) or `Option<&T>` (optional).
pub trait QueryItem {
    /// The output type yielded per entity.
    type Item<'w>;
    /// Fetch from one entity. `None` means the entity does not match.
    fn fetch<'w>(entity: &'w Entity) -> Option<Self::Item<'w>>;
}

impl<T: ComponentData> QueryItem for &T {
    type Item<'w> = &'w T;

    #[inline]
    fn fetch<'w>(entity: &'w Entity) -> Option<Self::Item<'w>> {
        entity.get::<T>()
    }
}

impl<T: ComponentData> QueryItem for Option<&T> {
    type Item<'w> = Option<&'w T>;

    #[inline]
    fn fetch<'w>(entity: &'w Entity) -> Option<Self::Item<'w>> {
        Some(entity.get::<T>())
    }
}

// ---------------------------------------------------------------------------
// Query trait -- describes a tuple of QueryItems
// ---------------------------------------------------------------------------

/// A tuple of query items: `(&A,)`, `(&A, &B)`, `(&A, Option<&B>)`, ...
pub trait Query {
    /// The per-entity output type.
    type Item<'w>;
    /// Fetch every element from one entity, or `None` if any required
    /// component is missing.
    fn fetch<'w>(entity: &'w Entity) -> Option<Self::Item<'w>>;
}

macro_rules! impl_query_tuple {
    ($($name:ident),+) => {
        impl<$($name: QueryItem),+> Query for ($($name,)+) {
            type Item<'w> = ($($name::Item<'w>,)+);

            #[inline]
            fn fetch<'w>(entity: &'w Entity) -> Option<Self::Item<'w>> {
                Some(($($name::fetch(entity)?,)+))
            }
        }
    };
}

impl_query_tuple!(A);
impl_query_tuple!(A, B);
impl_query_tuple!(A, B, C);
impl_query_tuple!(A, B, C, D);

// ---------------------------------------------------------------------------
// QueryIter
// ---------------------------------------------------------------------------

/// Iterator returned by [`World::query`](crate::world::World::query).
pub struct QueryIter<'w, Q: Query> {
    entities: std::slice::Iter<'w, Entity>,
    _marker: PhantomData<fn() -> Q>,
}

impl<'w, Q: Query> QueryIter<'w, Q> {
    pub(crate) fn new(entities: &'w [Entity]) -> Self {
        Self {
            entities: entities.iter(),
            _marker: PhantomData,
        }
    }
}

impl<'w, Q: Query> Iterator for QueryIter<'w, Q> {
    type Item = (EntityId, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        for entity in self.entities.by_ref() {
            if let Some(item) = Q::fetch(entity) {
                return Some((entity.id(), item));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entities.size_hint().1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
