//! Tilewalk ECS -- closed-set entity component store for the tilewalk engine.
//!
//! Entities live in an insertion-ordered [`World`](world::World). Each entity
//! holds at most one value per [`ComponentKind`](component::ComponentKind);
//! values are replaced wholesale, never edited in place. Systems read the
//! world through typed queries and queue replacements in a
//! [`CommandBuffer`](command::CommandBuffer).
//!
//! # Quick Start
//!
//! ```
//! use tilewalk_ecs::prelude::*;
//!
//! let mut world = World::new();
//! let player = world.spawn_bundle(
//!     ComponentBundle::new()
//!         .with(Position::new(64.0, 192.0))
//!         .with(Input::new(true)),
//! );
//!
//! world.insert(player, Position::new(65.0, 192.0)).unwrap();
//! assert_eq!(world.get::<Position>(player), Some(&Position::new(65.0, 192.0)));
//! assert!(world.get_component(player, ComponentKind::Ai).is_none());
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod component;
pub mod entity;
pub mod query;
pub mod snapshot;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by ECS operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The entity is not in this world (never spawned here, or torn down).
    #[error("entity {entity} does not exist in this world")]
    UnknownEntity { entity: entity::EntityId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::command::{ApplyReport, CausalReason, Command, CommandBuffer, SystemId};
    pub use crate::component::{
        Ai, AiBehavior, Animation, Component, ComponentData, ComponentKind, Input, Interaction,
        Position, Render,
    };
    pub use crate::entity::EntityId;
    pub use crate::query::{Query, QueryItem, QueryIter};
    pub use crate::snapshot::{EntitySnapshot, WorldSnapshot};
    pub use crate::world::{ComponentBundle, Entity, World};
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
