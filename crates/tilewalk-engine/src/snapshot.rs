//! Scene-level snapshot and restore with BLAKE3 hashing.
//!
//! A [`SceneSnapshot`] holds everything the systems read or write: the world,
//! the tile grid, the camera, the message board and the frame counter. The
//! schedule and configuration are not captured; restoring onto the same
//! [`Scene`] keeps them.

use serde::{Deserialize, Serialize};
use tilewalk_ecs::snapshot::WorldSnapshot;
use tilewalk_ecs::world::World;

use crate::camera::Camera;
use crate::scene::{Lifecycle, Scene};
use crate::state::GameState;
use crate::systems::MessageBoard;
use crate::tile::TileGrid;
use crate::EngineError;

/// Serializable state of an entered [`Scene`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub world: WorldSnapshot,
    pub tiles: TileGrid,
    pub camera: Camera,
    pub messages: MessageBoard,
    pub frame: u64,
    /// BLAKE3 hex digest of the fields above.
    pub hash: String,
}

fn compute_hash(
    world: &WorldSnapshot,
    tiles: &TileGrid,
    camera: &Camera,
    messages: &MessageBoard,
    frame: u64,
) -> String {
    #[derive(Serialize)]
    struct HashableState<'a> {
        world: &'a WorldSnapshot,
        tiles: &'a TileGrid,
        camera: &'a Camera,
        messages: &'a MessageBoard,
        frame: u64,
    }

    let json_bytes = serde_json::to_vec(&HashableState {
        world,
        tiles,
        camera,
        messages,
        frame,
    })
    .expect("scene state should always be JSON-serializable");
    blake3::hash(&json_bytes).to_hex().to_string()
}

impl Scene {
    /// Capture the scene's simulation state.
    pub fn capture_snapshot(&self) -> SceneSnapshot {
        let world = self.world.capture_snapshot();
        let hash = compute_hash(&world, &self.tiles, &self.camera, &self.messages, self.frame);
        SceneSnapshot {
            world,
            tiles: self.tiles.clone(),
            camera: self.camera.clone(),
            messages: self.messages.clone(),
            frame: self.frame,
            hash,
        }
    }

    /// BLAKE3 hex digest of the current simulation state.
    pub fn state_hash(&self) -> String {
        compute_hash(
            &self.world.capture_snapshot(),
            &self.tiles,
            &self.camera,
            &self.messages,
            self.frame,
        )
    }

    /// Put the scene back into the captured state.
    ///
    /// # Errors
    ///
    /// [`EngineError::Snapshot`] if the scene is not entered or the
    /// snapshot's hash does not match its contents. The scene is left
    /// untouched in both cases.
    pub fn restore_from_snapshot(&mut self, snapshot: &SceneSnapshot) -> Result<(), EngineError> {
        if self.lifecycle() != Lifecycle::Entered {
            return Err(EngineError::Snapshot(format!(
                "scene {:?} must be entered before restoring, it is {:?}",
                self.name(),
                self.lifecycle()
            )));
        }
        let expected = compute_hash(
            &snapshot.world,
            &snapshot.tiles,
            &snapshot.camera,
            &snapshot.messages,
            snapshot.frame,
        );
        if expected != snapshot.hash {
            return Err(EngineError::Snapshot(format!(
                "snapshot hash mismatch: recorded {}, contents hash to {expected}",
                snapshot.hash
            )));
        }

        self.world = World::from_snapshot(&snapshot.world);
        self.tiles = snapshot.tiles.clone();
        self.camera = snapshot.camera.clone();
        self.messages = snapshot.messages.clone();
        self.frame = snapshot.frame;
        tracing::debug!(frame = snapshot.frame, hash = %snapshot.hash, "scene restored from snapshot");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
