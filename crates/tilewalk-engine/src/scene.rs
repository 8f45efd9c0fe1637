//! [`Scene`]: the standard [`GameState`] built from a tile grid, a world, a
//! system schedule and a camera.
//!
//! A scene is declared with a setup function and filled in on
//! [`enter`](GameState::enter); [`exit`](GameState::exit) tears the world
//! down. Calls outside the entered phase are logged and ignored.

use tilewalk_ecs::prelude::*;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::input::InputSource;
use crate::render::{render_scene, Renderer};
use crate::state::GameState;
use crate::systems::{MessageBoard, Schedule, SystemContext};
use crate::tile::TileGrid;
use crate::ui::hud_lines;
use crate::EngineError;

/// Populates a fresh world and grid. Returns the entity the camera follows.
pub type SetupFn = fn(&mut World, &mut TileGrid) -> Option<EntityId>;

/// Where a scene is in its enter/exit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Entered,
    Exited,
}

/// A tile-map state driven by a schedule of systems.
#[derive(Debug)]
pub struct Scene {
    name: String,
    config: EngineConfig,
    grid_size: (usize, usize),
    setup: SetupFn,
    pub(crate) world: World,
    pub(crate) tiles: TileGrid,
    pub(crate) camera: Camera,
    pub(crate) messages: MessageBoard,
    pub(crate) frame: u64,
    schedule: Schedule,
    lifecycle: Lifecycle,
}

impl Scene {
    /// Declare a scene with a `width` x `height` grid. Nothing is built until
    /// [`enter`](GameState::enter).
    pub fn new(
        name: impl Into<String>,
        config: EngineConfig,
        grid_size: (usize, usize),
        schedule: Schedule,
        setup: SetupFn,
    ) -> Self {
        let tiles = TileGrid::new(0, 0, config.tile_size);
        let camera = Camera::new(config.view_width, config.view_height);
        Self {
            name: name.into(),
            config,
            grid_size,
            setup,
            world: World::new(),
            tiles,
            camera,
            messages: MessageBoard::default(),
            frame: 0,
            schedule,
            lifecycle: Lifecycle::Created,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Updates run since [`enter`](GameState::enter).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Overlay lines for the current frame.
    pub fn overlay(&self) -> Vec<String> {
        hud_lines(&self.config.bindings, &self.messages)
    }

    /// Replace one component of a live entity from outside the schedule,
    /// e.g. a cutscene moving an NPC. Returns the value it replaced.
    ///
    /// # Errors
    ///
    /// [`EngineError::Ecs`] if `entity` is not in this scene's world.
    pub fn insert(
        &mut self,
        entity: EntityId,
        component: impl Into<Component>,
    ) -> Result<Option<Component>, EngineError> {
        let previous = self.world.insert(entity, component)?;
        Ok(previous)
    }

    fn is_live(&self, call: &str) -> bool {
        if self.lifecycle == Lifecycle::Entered {
            return true;
        }
        tracing::warn!(scene = %self.name, lifecycle = ?self.lifecycle, call, "ignoring call outside entered phase");
        false
    }
}

impl GameState for Scene {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            tracing::warn!(scene = %self.name, lifecycle = ?self.lifecycle, "scene cannot be entered again");
            return;
        }
        let (width, height) = self.grid_size;
        self.tiles = TileGrid::new(width, height, self.config.tile_size);
        self.world.clear();
        let target = (self.setup)(&mut self.world, &mut self.tiles);
        match target {
            Some(entity) => self.camera.follow(entity),
            None => self.camera.unfollow(),
        }
        self.frame = 0;
        self.lifecycle = Lifecycle::Entered;
        tracing::info!(
            scene = %self.name,
            entities = self.world.len(),
            width,
            height,
            system_count = self.schedule.system_count(),
            systems = ?self.schedule.system_names(),
            "scene entered"
        );
    }

    fn update(&mut self, dt: f32, input: &dyn InputSource) {
        if !self.is_live("update") {
            return;
        }
        let mut ctx = SystemContext {
            dt,
            input,
            tiles: &self.tiles,
            bindings: &self.config.bindings,
            messages: &mut self.messages,
        };
        self.schedule.run(&mut self.world, &mut ctx);
        self.camera.update(&self.world);
        self.frame += 1;
        tracing::trace!(scene = %self.name, frame = self.frame, "scene updated");
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        if self.lifecycle != Lifecycle::Entered {
            tracing::warn!(scene = %self.name, lifecycle = ?self.lifecycle, "ignoring render outside entered phase");
            return;
        }
        render_scene(renderer, &self.tiles, &self.world, &self.camera, &self.overlay());
    }

    fn exit(&mut self) {
        if !self.is_live("exit") {
            return;
        }
        self.world.clear();
        self.messages.clear();
        self.lifecycle = Lifecycle::Exited;
        tracing::info!(scene = %self.name, frames = self.frame, "scene exited");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
