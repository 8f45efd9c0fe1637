//! The two built-in scenes.
//!
//! * `bedroom`: a walled 10x8 room with a bed, a window and a teddy bear the
//!   player can inspect. Runs movement and interaction.
//! * `overworld`: an open 50x50 field with a few obstacles, an animated
//!   player, a wandering NPC and an idle guard. Runs movement, AI and
//!   animation.

use tilewalk_ecs::prelude::*;

use crate::config::EngineConfig;
use crate::scene::Scene;
use crate::systems::{ai_system, animation_system, interaction_system, movement_system, Schedule};
use crate::tile::{Tile, TileGrid};

pub const BEDROOM_SIZE: (usize, usize) = (10, 8);
pub const OVERWORLD_SIZE: (usize, usize) = (50, 50);

/// Fixed seed for the overworld's wandering NPC.
pub const WANDERER_SEED: u64 = 0x7f4a_7c15;

pub fn bedroom(config: &EngineConfig) -> Scene {
    let schedule = Schedule::new()
        .with_system("movement", movement_system)
        .with_system("interaction", interaction_system);
    Scene::new("bedroom", config.clone(), BEDROOM_SIZE, schedule, setup_bedroom)
}

pub fn overworld(config: &EngineConfig) -> Scene {
    let schedule = Schedule::new()
        .with_system("movement", movement_system)
        .with_system("ai", ai_system)
        .with_system("animation", animation_system);
    Scene::new("overworld", config.clone(), OVERWORLD_SIZE, schedule, setup_overworld)
}

fn setup_bedroom(world: &mut World, tiles: &mut TileGrid) -> Option<EntityId> {
    tiles.fill_border(Tile::Stone);
    // Bed along the left wall, clear of the spawn cell.
    tiles.set_tile(1, 5, Tile::Tree);
    tiles.set_tile(1, 6, Tile::Tree);
    // Window in the top wall.
    tiles.set_tile(7, 0, Tile::Water);

    let player = world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(64.0, 192.0))
            .with(Render::new("player_down.png", 32, 32))
            .with(Input::new(true)),
    );
    world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(128.0, 96.0))
            .with(Render::new("teddy_bear.png", 32, 32))
            .with(Interaction::new("It's my favorite teddy bear!")),
    );
    Some(player)
}

fn setup_overworld(world: &mut World, tiles: &mut TileGrid) -> Option<EntityId> {
    tiles.set_tile(10, 10, Tile::Stone);
    tiles.set_tile(15, 8, Tile::Tree);
    tiles.set_tile(20, 12, Tile::Water);

    let player = world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(400.0, 300.0))
            .with(Render::new("player.png", 32, 32))
            .with(Input::new(true))
            .with(Animation::new(
                ["player_walk1.png", "player_walk2.png", "player_walk3.png"],
                0.2,
                true,
            )),
    );
    world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(500.0, 400.0))
            .with(Render::new("npc.png", 32, 32))
            .with(Ai::new(AiBehavior::Wander).with_seed(WANDERER_SEED)),
    );
    world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(300.0, 200.0))
            .with(Render::new("guard.png", 32, 32))
            .with(Ai::new(AiBehavior::Idle)),
    );
    Some(player)
}
