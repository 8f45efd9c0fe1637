//! The [`World`] is the entity registry: an insertion-ordered list of
//! [`Entity`] records, each holding one optional slot per [`ComponentKind`].
//!
//! Iteration always follows insertion order, so every system pass and every
//! render pass visits entities in the same order frame after frame.

use std::collections::HashMap;

use crate::component::{Component, ComponentData, ComponentKind};
use crate::entity::{EntityAllocator, EntityId};
use crate::query::{Query, QueryIter};
use crate::EcsError;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An entity record: its id plus one slot per component kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    slots: [Option<Component>; ComponentKind::COUNT],
}

impl Entity {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            slots: Default::default(),
        }
    }

    /// This entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The stored value for `kind`, if any.
    #[inline]
    pub fn get_component(&self, kind: ComponentKind) -> Option<&Component> {
        self.slots[kind.index()].as_ref()
    }

    /// The stored value for `T`, if any.
    #[inline]
    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        self.get_component(T::KIND).and_then(T::from_component)
    }

    #[inline]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    #[inline]
    pub fn has<T: ComponentData>(&self) -> bool {
        self.has_component(T::KIND)
    }

    /// All stored components in kind order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.slots.iter().flatten()
    }

    /// Store `component`, returning the value it replaced.
    fn replace(&mut self, component: Component) -> Option<Component> {
        let slot = &mut self.slots[component.kind().index()];
        slot.replace(component)
    }
}

// ---------------------------------------------------------------------------
// ComponentBundle -- spawn-time builder
// ---------------------------------------------------------------------------

/// A set of components to attach to a new entity.
///
/// Later values of the same kind override earlier ones, exactly as repeated
/// [`World::insert`] calls would.
#[derive(Debug, Clone, Default)]
pub struct ComponentBundle {
    components: Vec<Component>,
}

impl ComponentBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component (builder style).
    pub fn with(mut self, component: impl Into<Component>) -> Self {
        self.add(component);
        self
    }

    /// Add a component.
    pub fn add(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Insertion-ordered entity registry.
#[derive(Debug, Default, Clone)]
pub struct World {
    pub(crate) allocator: EntityAllocator,
    pub(crate) entities: Vec<Entity>,
    /// EntityId -> position in `entities`.
    pub(crate) index: HashMap<EntityId, usize>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -- spawning -----------------------------------------------------------

    /// Spawn an entity with no components.
    pub fn spawn(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        self.index.insert(id, self.entities.len());
        self.entities.push(Entity::new(id));
        id
    }

    /// Spawn an entity with a single component.
    pub fn spawn_with(&mut self, component: impl Into<Component>) -> EntityId {
        self.spawn_bundle(ComponentBundle::new().with(component))
    }

    /// Spawn an entity carrying every component in `bundle`.
    pub fn spawn_bundle(&mut self, bundle: ComponentBundle) -> EntityId {
        let id = self.allocator.allocate();
        let mut entity = Entity::new(id);
        for component in bundle.components {
            entity.replace(component);
        }
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    // -- component access ---------------------------------------------------

    /// Store `component` on `entity`, replacing any value of the same kind.
    ///
    /// Returns the replaced value, or `None` if the kind was absent. Values
    /// are never merged: after this call the stored value is exactly
    /// `component`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not in this world.
    pub fn insert(
        &mut self,
        entity: EntityId,
        component: impl Into<Component>,
    ) -> Result<Option<Component>, EcsError> {
        let record = self
            .entity_mut(entity)
            .ok_or(EcsError::UnknownEntity { entity })?;
        Ok(record.replace(component.into()))
    }

    /// The stored value of `kind` on `entity`. `None` if either is missing.
    pub fn get_component(&self, entity: EntityId, kind: ComponentKind) -> Option<&Component> {
        self.entity(entity)?.get_component(kind)
    }

    /// Typed variant of [`get_component`](Self::get_component).
    pub fn get<T: ComponentData>(&self, entity: EntityId) -> Option<&T> {
        self.entity(entity)?.get::<T>()
    }

    /// Whether `entity` exists and carries `kind`.
    pub fn has_component(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.entity(entity)
            .is_some_and(|record| record.has_component(kind))
    }

    /// Typed variant of [`has_component`](Self::has_component).
    pub fn has<T: ComponentData>(&self, entity: EntityId) -> bool {
        self.has_component(entity, T::KIND)
    }

    // -- iteration ----------------------------------------------------------

    /// The record for `entity`, if present.
    pub fn entity(&self, entity: EntityId) -> Option<&Entity> {
        self.index.get(&entity).map(|&i| &self.entities[i])
    }

    fn entity_mut(&mut self, entity: EntityId) -> Option<&mut Entity> {
        let i = *self.index.get(&entity)?;
        Some(&mut self.entities[i])
    }

    /// All entities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Entities carrying every kind in `kinds`, in insertion order.
    pub fn with_kinds<'w>(
        &'w self,
        kinds: &'w [ComponentKind],
    ) -> impl Iterator<Item = &'w Entity> + 'w {
        self.entities
            .iter()
            .filter(move |e| kinds.iter().all(|&k| e.has_component(k)))
    }

    /// Iterate entities matching the component tuple `Q`.
    ///
    /// ```
    /// use tilewalk_ecs::prelude::*;
    ///
    /// let mut world = World::new();
    /// let e = world.spawn_bundle(
    ///     ComponentBundle::new()
    ///         .with(Position::new(1.0, 2.0))
    ///         .with(Input::new(true)),
    /// );
    /// world.spawn_with(Position::new(5.0, 5.0));
    ///
    /// let hits: Vec<_> = world.query::<(&Position, &Input)>().collect();
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(hits[0].0, e);
    /// ```
    pub fn query<Q: Query>(&self) -> QueryIter<'_, Q> {
        QueryIter::new(&self.entities)
    }

    /// Whether `entity` exists in this world.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.index.contains_key(&entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy every entity. Ids allocated afterwards never reuse old ones.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
