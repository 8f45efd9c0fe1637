//! Tilewalk Engine -- states, systems and the frame loop for 2D tile games.
//!
//! This crate builds on [`tilewalk_ecs`] to provide the game side: a
//! [`TileGrid`](tile::TileGrid) with solid tiles, the movement, AI, animation
//! and interaction systems, a following [`Camera`](camera::Camera), a stack of
//! [`GameState`](state::GameState)s and the fixed-timestep
//! [`FrameLoop`](frame::FrameLoop) that drives them. Rendering and input go
//! through the [`Renderer`](render::Renderer) and
//! [`InputSource`](input::InputSource) traits, so the whole engine runs
//! headless.
//!
//! # Quick Start
//!
//! ```
//! use tilewalk_engine::prelude::*;
//!
//! let config = EngineConfig { headless: true, ..Default::default() };
//! let mut frame_loop = FrameLoop::new(config.clone());
//! frame_loop.states_mut().push(Box::new(tilewalk_engine::demo::overworld(&config)));
//!
//! let mut feed = ScriptedInput::repeat(&[KeyCode::D], 5);
//! feed.extend([InputFrame::new().with(KeyCode::Escape)]);
//!
//! let mut renderer = RecordingRenderer::new();
//! let summary = frame_loop.run(&mut feed, &mut renderer, &mut Unpaced);
//! assert_eq!(summary.reason, StopReason::QuitRequested);
//! assert_eq!(renderer.frames_presented(), 5);
//! ```

#![deny(unsafe_code)]

use std::path::PathBuf;

pub mod camera;
pub mod config;
pub mod demo;
pub mod frame;
pub mod input;
pub mod render;
pub mod replay;
pub mod resource;
pub mod scene;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod tile;
pub mod ui;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the ECS crate for convenience.
pub use tilewalk_ecs;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to load resource {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Frame pacing was interrupted.
    #[error("frame pacing failed: {0}")]
    Pacing(String),

    #[error(transparent)]
    Ecs(#[from] tilewalk_ecs::EcsError),

    /// A snapshot could not be restored.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// A replay log is malformed.
    #[error("invalid replay log: {0}")]
    Replay(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use tilewalk_ecs::prelude::*;

    pub use crate::camera::{Camera, VisibleTiles};
    pub use crate::config::{EngineConfig, KeyBindings};
    pub use crate::frame::{
        pacer_for, FrameLoop, FramePacer, PacerInterrupt, RunSummary, SleepPacer, StopReason,
        Unpaced,
    };
    pub use crate::input::{InputFeed, InputFrame, InputSource, InputState, KeyCode, ScriptedInput};
    pub use crate::render::{render_scene, DrawCall, LogRenderer, RecordingRenderer, Renderer};
    pub use crate::replay::{
        record, replay, ReplayDivergence, ReplayEntry, ReplayLog, ReplayRecorder, ReplayResult,
    };
    pub use crate::resource::ResourceManager;
    pub use crate::scene::{Lifecycle, Scene, SetupFn};
    pub use crate::snapshot::SceneSnapshot;
    pub use crate::state::{GameState, StateManager};
    pub use crate::systems::{
        ai_system, animation_system, interaction_system, movement_system, MessageBoard, Schedule,
        ScheduleDiagnostics, SystemContext, SystemFn,
    };
    pub use crate::tile::{Tile, TileGrid};
    pub use crate::ui::{controls_hint, hud_lines};
    pub use crate::EngineError;
}
