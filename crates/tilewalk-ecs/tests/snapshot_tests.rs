//! Integration tests for world snapshot/restore.

use tilewalk_ecs::prelude::*;

fn setup_world() -> (World, EntityId, EntityId) {
    let mut world = World::new();
    let player = world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(400.0, 300.0))
            .with(Render::new("player_walk1.png", 32, 32))
            .with(Input::new(true))
            .with(Animation::new(
                ["player_walk1.png", "player_walk2.png", "player_walk3.png"],
                0.2,
                true,
            )),
    );
    let npc = world.spawn_bundle(
        ComponentBundle::new()
            .with(Position::new(500.0, 400.0))
            .with(Render::new("npc.png", 32, 32))
            .with(Ai::new(AiBehavior::Wander).with_seed(7)),
    );
    (world, player, npc)
}

#[test]
fn restored_world_is_identical() {
    let (world, player, npc) = setup_world();
    let snapshot = world.capture_snapshot();
    let restored = World::from_snapshot(&snapshot);

    assert_eq!(restored.state_hash(), world.state_hash());
    assert_eq!(restored.get::<Position>(player), world.get::<Position>(player));
    assert_eq!(restored.get::<Ai>(npc), world.get::<Ai>(npc));
    let order: Vec<_> = restored.iter().map(Entity::id).collect();
    assert_eq!(order, vec![player, npc]);
}

#[test]
fn snapshot_survives_json_round_trip() {
    let (world, ..) = setup_world();
    let json = serde_json::to_string_pretty(&world.capture_snapshot()).unwrap();
    let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(World::from_snapshot(&back).state_hash(), world.state_hash());
}

#[test]
fn hash_changes_with_any_component_value() {
    let (mut world, player, _) = setup_world();
    let before = world.state_hash();
    world.insert(player, Position::new(400.5, 300.0)).unwrap();
    assert_ne!(world.state_hash(), before);
}

#[test]
fn restored_world_keeps_allocating_fresh_ids() {
    let (world, player, npc) = setup_world();
    let mut restored = World::from_snapshot(&world.capture_snapshot());
    let fresh = restored.spawn();
    assert_ne!(fresh, player);
    assert_ne!(fresh, npc);
}
