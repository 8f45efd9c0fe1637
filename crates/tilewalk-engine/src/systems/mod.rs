//! Update systems and the ordered schedule that runs them.
//!
//! A system is a plain function over a read-only [`World`], a
//! [`SystemContext`] with the frame's inputs, and a [`CommandBuffer`] where it
//! queues component replacements. The [`Schedule`] runs systems in
//! registration order and applies the buffer after each one, so every system
//! sees the finished writes of the systems before it.
//!
//! ```
//! use tilewalk_engine::prelude::*;
//!
//! let mut schedule = Schedule::new();
//! schedule.add_system("movement", movement_system);
//! schedule.add_system("animation", animation_system);
//! assert_eq!(schedule.system_names(), vec!["movement", "animation"]);
//! ```

use std::time::{Duration, Instant};

use tilewalk_ecs::prelude::*;

use crate::config::KeyBindings;
use crate::input::InputSource;
use crate::tile::TileGrid;

pub mod ai;
pub mod animation;
pub mod interaction;
pub mod movement;

pub use ai::ai_system;
pub use animation::animation_system;
pub use interaction::{interaction_system, MessageBoard, INTERACTION_RANGE_TILES, MESSAGE_DURATION};
pub use movement::{movement_system, MOVE_SPEED};

// ---------------------------------------------------------------------------
// SystemContext
// ---------------------------------------------------------------------------

/// Everything a system may read besides the world, plus the message board
/// it may post to.
pub struct SystemContext<'a> {
    /// Seconds of simulation this frame.
    pub dt: f32,
    pub input: &'a dyn InputSource,
    pub tiles: &'a TileGrid,
    pub bindings: &'a KeyBindings,
    pub messages: &'a mut MessageBoard,
}

// ---------------------------------------------------------------------------
// SystemFn
// ---------------------------------------------------------------------------

/// A system function run once per frame.
///
/// Systems never mutate the [`World`] directly; every change is a full
/// replacement value queued on the [`CommandBuffer`] under the given
/// [`SystemId`].
pub type SystemFn = fn(&World, &mut SystemContext<'_>, SystemId, &mut CommandBuffer);

#[derive(Debug)]
struct RegisteredSystem {
    name: String,
    func: SystemFn,
}

// ---------------------------------------------------------------------------
// ScheduleDiagnostics
// ---------------------------------------------------------------------------

/// Timing and command counts for the last [`Schedule::run`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleDiagnostics {
    /// Wall-clock time per system (in order of execution).
    pub system_times: Vec<(String, Duration)>,
    /// Commands applied per system (in order of execution).
    pub commands_applied: Vec<(String, usize)>,
    pub total_time: Duration,
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Ordered list of named systems.
#[derive(Debug, Default)]
pub struct Schedule {
    systems: Vec<RegisteredSystem>,
    command_buffer: CommandBuffer,
    last_diagnostics: ScheduleDiagnostics,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system. Systems run in the order they are added.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system(&mut self, name: &str, func: SystemFn) {
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func,
        });
    }

    /// Builder-style [`add_system`](Self::add_system).
    pub fn with_system(mut self, name: &str, func: SystemFn) -> Self {
        self.add_system(name, func);
        self
    }

    /// Run every system once, applying each one's commands before the next
    /// system starts. Returns every processed command in order.
    pub fn run(&mut self, world: &mut World, ctx: &mut SystemContext<'_>) -> Vec<Command> {
        let run_start = Instant::now();
        let mut system_times = Vec::with_capacity(self.systems.len());
        let mut commands_applied = Vec::with_capacity(self.systems.len());
        let mut processed = Vec::new();

        for (i, system) in self.systems.iter().enumerate() {
            let start = Instant::now();
            (system.func)(world, ctx, SystemId(i as u32), &mut self.command_buffer);
            let applied = self.command_buffer.apply(world);
            system_times.push((system.name.clone(), start.elapsed()));
            commands_applied.push((system.name.clone(), applied.len()));

            let report = self.command_buffer.last_apply_report();
            if report.conflict_count > 0 {
                tracing::debug!(
                    system = %system.name,
                    conflicts = report.conflict_count,
                    "system replaced a component more than once"
                );
            }
            processed.extend(applied);
        }

        self.last_diagnostics = ScheduleDiagnostics {
            system_times,
            commands_applied,
            total_time: run_start.elapsed(),
        };
        processed
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// The names of all registered systems, in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn last_diagnostics(&self) -> &ScheduleDiagnostics {
        &self.last_diagnostics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
