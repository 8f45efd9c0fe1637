//! Proximity interaction and the on-screen message it produces.

use serde::{Deserialize, Serialize};
use tilewalk_ecs::prelude::*;

use super::SystemContext;

/// Seconds a message stays on screen.
pub const MESSAGE_DURATION: f32 = 3.0;
/// Interaction reach in tiles (Manhattan distance).
pub const INTERACTION_RANGE_TILES: f32 = 1.5;

// ---------------------------------------------------------------------------
// MessageBoard
// ---------------------------------------------------------------------------

/// The single message currently shown to the player, with its time left.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBoard {
    message: Option<String>,
    remaining: f32,
}

impl MessageBoard {
    /// Show `message` for [`MESSAGE_DURATION`], replacing any current one.
    pub fn show(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "interaction message");
        self.message = Some(message);
        self.remaining = MESSAGE_DURATION;
    }

    /// Count down the live message, clearing it once its time is up.
    pub fn tick(&mut self, dt: f32) {
        if self.message.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.message = None;
            self.remaining = 0.0;
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Seconds until the current message disappears.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.remaining = 0.0;
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Count down the message board, then on an interact key press show the
/// message of the first interactable within reach of the player.
///
/// The player is the first controllable entity that has a position. Reach is
/// [`INTERACTION_RANGE_TILES`] tile widths, measured as Manhattan distance.
pub fn interaction_system(
    world: &World,
    ctx: &mut SystemContext<'_>,
    _id: SystemId,
    _cmds: &mut CommandBuffer,
) {
    ctx.messages.tick(ctx.dt);

    if !ctx.input.is_key_just_pressed(ctx.bindings.interact) {
        return;
    }
    let Some(player_pos) = world
        .query::<(&Input, &Position)>()
        .find(|(_, (input, _))| input.controllable)
        .map(|(_, (_, pos))| *pos)
    else {
        return;
    };

    let reach = ctx.tiles.tile_size() as f32 * INTERACTION_RANGE_TILES;
    let hit = world
        .query::<(&Interaction, &Position)>()
        .find(|(_, (interaction, pos))| {
            interaction.can_interact && pos.manhattan_distance(&player_pos) <= reach
        });

    match hit {
        Some((entity, (interaction, _))) => {
            tracing::debug!(%entity, "interaction triggered");
            ctx.messages.show(interaction.message.clone());
        }
        None => tracing::trace!("nothing within reach"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
