//! Player movement with tile collision.

use tilewalk_ecs::prelude::*;

use super::SystemContext;

/// Player speed in pixels per second along each axis.
pub const MOVE_SPEED: f32 = 100.0;

/// Move every controllable entity according to the held direction keys.
///
/// Each held key adds `MOVE_SPEED * dt` on its axis; diagonals are not
/// normalised. The move is taken only when the destination point lies on a
/// walkable tile, otherwise the entity stays where it is. Nothing is emitted
/// when no direction key is held.
pub fn movement_system(
    world: &World,
    ctx: &mut SystemContext<'_>,
    id: SystemId,
    cmds: &mut CommandBuffer,
) {
    let step = MOVE_SPEED * ctx.dt;
    let b = ctx.bindings;
    let held = |key| ctx.input.is_key_pressed(key);

    let mut dx = 0.0;
    let mut dy = 0.0;
    if held(b.up) {
        dy -= step;
    }
    if held(b.down) {
        dy += step;
    }
    if held(b.left) {
        dx -= step;
    }
    if held(b.right) {
        dx += step;
    }
    if !(held(b.up) || held(b.down) || held(b.left) || held(b.right)) {
        return;
    }

    for (entity, (pos, input)) in world.query::<(&Position, &Input)>() {
        if !input.controllable {
            continue;
        }
        let next = Position::new(pos.x + dx, pos.y + dy);
        if ctx.tiles.is_solid_at(next.x, next.y) {
            tracing::trace!(%entity, x = next.x, y = next.y, "move blocked by solid tile");
            continue;
        }
        cmds.replace(entity, next, id, CausalReason::PlayerInput("move".to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::systems::test_support::Harness;
    use crate::tile::{Tile, TileGrid};

    fn setup_world(x: f32, y: f32, controllable: bool) -> (World, EntityId) {
        let mut world = World::new();
        let player = world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(x, y))
                .with(Input::new(controllable)),
        );
        (world, player)
    }

    #[test]
    fn moves_by_speed_times_dt() {
        let (mut world, player) = setup_world(64.0, 64.0, true);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        harness.hold(&[KeyCode::D]);
        harness.run(&mut world, movement_system, 0.1);
        let pos = world.get::<Position>(player).unwrap();
        assert!((pos.x - 74.0).abs() < 1e-4);
        assert_eq!(pos.y, 64.0);
    }

    #[test]
    fn diagonal_is_not_normalised() {
        let (mut world, player) = setup_world(64.0, 64.0, true);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        harness.hold(&[KeyCode::S, KeyCode::A]);
        harness.run(&mut world, movement_system, 0.1);
        let pos = world.get::<Position>(player).unwrap();
        assert!((pos.x - 54.0).abs() < 1e-4);
        assert!((pos.y - 74.0).abs() < 1e-4);
    }

    #[test]
    fn opposite_keys_cancel_but_still_emit() {
        let (mut world, _) = setup_world(64.0, 64.0, true);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        harness.hold(&[KeyCode::A, KeyCode::D]);
        let applied = harness.run(&mut world, movement_system, 0.1);
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn solid_destination_rejects_move() {
        let (mut world, player) = setup_world(60.0, 40.0, true);
        let mut tiles = TileGrid::new(10, 10, 32);
        tiles.set_tile(2, 1, Tile::Water);
        let mut harness = Harness::new(tiles);
        harness.hold(&[KeyCode::D]);
        let applied = harness.run(&mut world, movement_system, 0.1);
        assert!(applied.is_empty());
        assert_eq!(world.get::<Position>(player), Some(&Position::new(60.0, 40.0)));
    }

    #[test]
    fn no_input_emits_nothing() {
        let (mut world, _) = setup_world(64.0, 64.0, true);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        assert!(harness.run(&mut world, movement_system, 0.1).is_empty());
    }

    #[test]
    fn uncontrollable_entities_do_not_move() {
        let (mut world, player) = setup_world(64.0, 64.0, false);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        harness.hold(&[KeyCode::W]);
        harness.run(&mut world, movement_system, 0.1);
        assert_eq!(world.get::<Position>(player), Some(&Position::new(64.0, 64.0)));
    }

    #[test]
    fn rebinding_changes_the_driving_key() {
        let (mut world, player) = setup_world(64.0, 64.0, true);
        let mut harness = Harness::new(TileGrid::new(10, 10, 32));
        harness.bindings.up = KeyCode::Up;
        harness.hold(&[KeyCode::W]);
        harness.run(&mut world, movement_system, 0.1);
        assert_eq!(world.get::<Position>(player), Some(&Position::new(64.0, 64.0)));
        harness.hold(&[KeyCode::Up]);
        harness.run(&mut world, movement_system, 0.1);
        assert!(world.get::<Position>(player).unwrap().y < 64.0);
    }
}
