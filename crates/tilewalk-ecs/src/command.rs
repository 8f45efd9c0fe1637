//! Command buffer for deferred component replacement.
//!
//! Systems never touch the [`World`] directly: they read it through `&World`
//! and queue replacement values in a [`CommandBuffer`], tagged with the
//! issuing [`SystemId`] and a [`CausalReason`]. The buffer is applied in strict
//! FIFO order, so a system always reads the world as it was when its pass
//! started, and every stored value is a complete replacement.
//!
//! # Example
//!
//! ```
//! use tilewalk_ecs::prelude::*;
//!
//! let mut world = World::new();
//! let entity = world.spawn_with(Position::new(0.0, 0.0));
//!
//! let mut cmds = CommandBuffer::new();
//! cmds.replace(
//!     entity,
//!     Position::new(4.0, 0.0),
//!     SystemId(0),
//!     CausalReason::PlayerInput("move_right".to_owned()),
//! );
//!
//! let applied = cmds.apply(&mut world);
//! assert_eq!(applied.len(), 1);
//! assert_eq!(world.get::<Position>(entity), Some(&Position::new(4.0, 0.0)));
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::component::{Component, ComponentKind};
use crate::entity::EntityId;
use crate::world::World;

// ---------------------------------------------------------------------------
// SystemId
// ---------------------------------------------------------------------------

/// Identifies the system that issued a command (its position in the
/// schedule).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

impl fmt::Debug for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemId({})", self.0)
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CausalReason
// ---------------------------------------------------------------------------

/// Why a replacement was issued. Carried into logs for each applied command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CausalReason {
    /// Caused by player input (e.g. `"move"`).
    PlayerInput(String),
    /// Caused by a game rule (e.g. `"wander_retarget"`).
    GameRule(String),
    /// Caused by a timer advancing (e.g. `"animation_clock"`).
    Timer(String),
    /// Internal system logic -- last resort, prefer a more specific reason.
    SystemInternal(String),
}

impl fmt::Display for CausalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CausalReason::PlayerInput(s) => write!(f, "player_input:{s}"),
            CausalReason::GameRule(s) => write!(f, "game_rule:{s}"),
            CausalReason::Timer(s) => write!(f, "timer:{s}"),
            CausalReason::SystemInternal(s) => write!(f, "internal:{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single queued replacement with its causality metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Entity whose component is replaced.
    pub target: EntityId,
    /// The full replacement value; its kind selects the slot.
    pub component: Component,
    /// Which system issued this command.
    pub issued_by: SystemId,
    /// Why this command was issued.
    pub reason: CausalReason,
    /// Sequential index within the buffer (set on insertion).
    pub command_index: u32,
    /// Set by [`CommandBuffer::apply`]: `false` if the target did not exist.
    #[serde(default)]
    pub applied_successfully: bool,
}

impl Command {
    /// The component kind this command replaces.
    pub fn kind(&self) -> ComponentKind {
        self.component.kind()
    }
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// Summary of the last [`CommandBuffer::apply`] call.
///
/// `conflict_count` counts (entity, kind) pairs replaced more than once in a
/// single apply; the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub conflict_count: usize,
    pub failed_count: usize,
    pub success_count: usize,
}

// ---------------------------------------------------------------------------
// CommandBuffer
// ---------------------------------------------------------------------------

/// Collects replacement commands and applies them in insertion order.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    next_index: u32,
    last_apply_report: ApplyReport,
}

impl CommandBuffer {
    /// Create a new, empty command buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a replacement of `target`'s component of the same kind as
    /// `component`.
    pub fn replace(
        &mut self,
        target: EntityId,
        component: impl Into<Component>,
        issued_by: SystemId,
        reason: CausalReason,
    ) {
        let command_index = self.next_index;
        self.next_index += 1;
        self.commands.push(Command {
            target,
            component: component.into(),
            issued_by,
            reason,
            command_index,
            applied_successfully: false,
        });
    }

    /// Queued commands in insertion order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Report from the last [`apply`](Self::apply) call.
    pub fn last_apply_report(&self) -> &ApplyReport {
        &self.last_apply_report
    }

    /// Apply all commands to the world in insertion order.
    ///
    /// The buffer is drained; the processed commands are returned with
    /// `applied_successfully` filled in. Commands targeting an entity that is
    /// not in the world are skipped with a warning.
    pub fn apply(&mut self, world: &mut World) -> Vec<Command> {
        let mut commands = std::mem::take(&mut self.commands);
        self.next_index = 0;

        let mut report = ApplyReport::default();
        let mut touched: HashSet<(EntityId, ComponentKind)> = HashSet::new();

        for cmd in &mut commands {
            if !touched.insert((cmd.target, cmd.kind())) {
                report.conflict_count += 1;
            }
            match world.insert(cmd.target, cmd.component.clone()) {
                Ok(_) => {
                    cmd.applied_successfully = true;
                    report.success_count += 1;
                    tracing::trace!(
                        entity = %cmd.target,
                        kind = %cmd.kind(),
                        issued_by = %cmd.issued_by,
                        reason = %cmd.reason,
                        "component replaced"
                    );
                }
                Err(e) => {
                    report.failed_count += 1;
                    warn!(
                        error = %e,
                        kind = %cmd.kind(),
                        issued_by = %cmd.issued_by,
                        "dropping replacement for unknown entity"
                    );
                }
            }
        }

        self.last_apply_report = report;
        commands
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Input, Position};

    fn reason() -> CausalReason {
        CausalReason::SystemInternal("test".to_owned())
    }

    #[test]
    fn commands_are_indexed_in_insertion_order() {
        let mut world = World::new();
        let e = world.spawn();
        let mut cmds = CommandBuffer::new();
        cmds.replace(e, Position::new(1.0, 1.0), SystemId(0), reason());
        cmds.replace(e, Input::new(true), SystemId(0), reason());
        let indices: Vec<u32> = cmds.commands().iter().map(|c| c.command_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn apply_drains_and_resets_indices() {
        let mut world = World::new();
        let e = world.spawn();
        let mut cmds = CommandBuffer::new();
        cmds.replace(e, Position::new(1.0, 1.0), SystemId(0), reason());
        let applied = cmds.apply(&mut world);
        assert!(applied[0].applied_successfully);
        assert!(cmds.is_empty());

        cmds.replace(e, Position::new(2.0, 2.0), SystemId(0), reason());
        assert_eq!(cmds.commands()[0].command_index, 0);
    }

    #[test]
    fn last_write_wins_and_conflict_is_counted() {
        let mut world = World::new();
        let e = world.spawn_with(Position::new(0.0, 0.0));
        let mut cmds = CommandBuffer::new();
        cmds.replace(e, Position::new(1.0, 0.0), SystemId(0), reason());
        cmds.replace(e, Position::new(2.0, 0.0), SystemId(1), reason());
        cmds.apply(&mut world);

        assert_eq!(world.get::<Position>(e), Some(&Position::new(2.0, 0.0)));
        let report = cmds.last_apply_report();
        assert_eq!(report.conflict_count, 1);
        assert_eq!(report.success_count, 2);
    }

    #[test]
    fn unknown_target_is_reported_as_failure() {
        let mut world = World::new();
        let mut cmds = CommandBuffer::new();
        cmds.replace(EntityId::new(5), Input::new(true), SystemId(3), reason());
        let applied = cmds.apply(&mut world);
        assert!(!applied[0].applied_successfully);
        assert_eq!(cmds.last_apply_report().failed_count, 1);
    }

    #[test]
    fn causal_reason_display() {
        assert_eq!(
            CausalReason::GameRule("wander_retarget".into()).to_string(),
            "game_rule:wander_retarget"
        );
    }
}
