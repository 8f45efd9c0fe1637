//! World snapshot and restore support.
//!
//! A [`WorldSnapshot`] captures every entity (in registry order) with its
//! components, plus the allocator position, so that a world can be restored
//! to an identical state and compared across runs by
//! [`World::state_hash`].

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::entity::{EntityAllocator, EntityId};
use crate::world::{ComponentBundle, World};

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Serializable state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity_id: EntityId,
    /// Components in kind order.
    pub components: Vec<Component>,
}

/// Serializable state of a whole [`World`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Index the allocator hands out next.
    pub next_index: u32,
    /// All entities in registry order.
    pub entities: Vec<EntitySnapshot>,
}

// ---------------------------------------------------------------------------
// World snapshot/restore impl
// ---------------------------------------------------------------------------

impl World {
    /// Capture the complete world state.
    pub fn capture_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            next_index: self.allocator.next_index(),
            entities: self
                .iter()
                .map(|entity| EntitySnapshot {
                    entity_id: entity.id(),
                    components: entity.components().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Build a world identical to the one `snapshot` was captured from.
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> World {
        let mut world = World::new();
        world.restore_from_snapshot(snapshot);
        world
    }

    /// Replace this world's contents with `snapshot`.
    pub fn restore_from_snapshot(&mut self, snapshot: &WorldSnapshot) {
        self.clear();
        for entry in &snapshot.entities {
            // Re-spawn under the recorded id.
            self.allocator = EntityAllocator::resume_from(entry.entity_id.index());
            let bundle = entry
                .components
                .iter()
                .cloned()
                .fold(ComponentBundle::new(), |bundle, c| bundle.with(c));
            self.spawn_bundle(bundle);
        }
        self.allocator = EntityAllocator::resume_from(snapshot.next_index);
        tracing::debug!(
            entities = snapshot.entities.len(),
            next_index = snapshot.next_index,
            "world restored from snapshot"
        );
    }

    /// BLAKE3 hex digest of the world's canonical JSON form.
    ///
    /// Two worlds with the same entities, ids, and component values in the
    /// same order hash identically.
    pub fn state_hash(&self) -> String {
        self.capture_snapshot().hash()
    }
}

impl WorldSnapshot {
    /// BLAKE3 hex digest of this snapshot's JSON encoding.
    pub fn hash(&self) -> String {
        let json_bytes = serde_json::to_vec(self)
            .expect("WorldSnapshot should always be JSON-serializable");
        blake3::hash(&json_bytes).to_hex().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Animation, Position, Render};

    fn sample_world() -> World {
        let mut world = World::new();
        world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(4.0, 8.0))
                .with(Render::new("walk1.png", 32, 32))
                .with(Animation::new(["walk1.png", "walk2.png"], 0.2, true)),
        );
        world.spawn_with(Position::new(-3.0, 1.5));
        world
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let world = sample_world();
        let snapshot = world.capture_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn restore_preserves_ids_order_and_hash() {
        let mut world = sample_world();
        let hash = world.state_hash();
        let snapshot = world.capture_snapshot();

        world.insert(crate::entity::EntityId::new(1), Position::new(0.0, 0.0)).unwrap();
        assert_ne!(world.state_hash(), hash);

        world.restore_from_snapshot(&snapshot);
        assert_eq!(world.state_hash(), hash);
        let next = world.spawn();
        assert_eq!(next.index(), 2);
    }

    #[test]
    fn hash_is_64_hex_chars() {
        assert_eq!(sample_world().state_hash().len(), 64);
    }
}
