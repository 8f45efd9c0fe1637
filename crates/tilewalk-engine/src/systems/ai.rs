//! NPC behaviour: idle timers and random wandering.
//!
//! Every random choice is drawn from a [`Pcg32`] whose state is the entity's
//! own [`Ai::seed`] and whose stream is the entity index, so wanderers that
//! share a seed still pick different targets. The successor seed is drawn from
//! the same generator and stored in the replacement component, so a run is
//! reproducible from a world snapshot alone.

use rand::Rng;
use rand_pcg::Pcg32;
use tilewalk_ecs::prelude::*;

use super::SystemContext;

/// Seconds between wander retargets.
pub const WANDER_INTERVAL: f32 = 2.0;
/// Wander speed in pixels per second.
pub const WANDER_SPEED: f32 = 50.0;
/// Side of the square around the entity in which new targets are picked.
pub const WANDER_RANGE: f32 = 100.0;
/// Distance at which a wanderer counts as arrived.
pub const ARRIVE_DISTANCE: f32 = 5.0;

/// Advance one AI component by `dt`.
///
/// `stream` selects the PCG stream for retargeting; [`ai_system`] passes the
/// entity index. Returns the replacement `Ai` and, if the entity moves, its new
/// position.
pub fn tick_ai(ai: &Ai, pos: &Position, dt: f32, stream: u64) -> (Ai, Option<Position>) {
    let timer = ai.timer + dt;
    match ai.behavior {
        AiBehavior::Idle => (Ai { timer, ..*ai }, None),
        AiBehavior::Wander if timer >= WANDER_INTERVAL => {
            let mut rng = Pcg32::new(ai.seed, stream);
            let target_x = pos.x + (rng.gen::<f32>() - 0.5) * WANDER_RANGE;
            let target_y = pos.y + (rng.gen::<f32>() - 0.5) * WANDER_RANGE;
            let seed = rng.gen::<u64>();
            let next = Ai {
                behavior: ai.behavior,
                timer: 0.0,
                target_x,
                target_y,
                seed,
            };
            (next, None)
        }
        AiBehavior::Wander => {
            let dx = ai.target_x - pos.x;
            let dy = ai.target_y - pos.y;
            let distance = (dx * dx + dy * dy).sqrt();
            let moved = (distance > ARRIVE_DISTANCE).then(|| {
                let step = WANDER_SPEED * dt;
                Position::new(pos.x + dx / distance * step, pos.y + dy / distance * step)
            });
            (Ai { timer, ..*ai }, moved)
        }
        AiBehavior::Patrol | AiBehavior::FollowPlayer => (*ai, None),
    }
}

/// Run [`tick_ai`] for every entity with `Ai` and `Position`.
///
/// Wander movement does not check tiles: NPCs may walk through solids.
pub fn ai_system(world: &World, ctx: &mut SystemContext<'_>, id: SystemId, cmds: &mut CommandBuffer) {
    for (entity, (ai, pos)) in world.query::<(&Ai, &Position)>() {
        if matches!(ai.behavior, AiBehavior::Patrol | AiBehavior::FollowPlayer) {
            tracing::trace!(%entity, behavior = ?ai.behavior, "behavior has no driver");
            continue;
        }

        let retarget = ai.behavior == AiBehavior::Wander && ai.timer + ctx.dt >= WANDER_INTERVAL;
        let (next_ai, next_pos) = tick_ai(ai, pos, ctx.dt, u64::from(entity.index()));
        let reason = if retarget {
            tracing::debug!(
                %entity,
                target_x = next_ai.target_x,
                target_y = next_ai.target_y,
                "wander retarget"
            );
            CausalReason::GameRule("wander_retarget".to_owned())
        } else {
            CausalReason::Timer("ai_clock".to_owned())
        };

        if let Some(next_pos) = next_pos {
            cmds.replace(entity, next_pos, id, CausalReason::GameRule("wander_step".to_owned()));
        }
        cmds.replace(entity, next_ai, id, reason);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::Harness;
    use crate::tile::TileGrid;

    #[test]
    fn idle_only_advances_the_timer() {
        let ai = Ai::new(AiBehavior::Idle).with_target(3.0, 4.0);
        let (next, moved) = tick_ai(&ai, &Position::new(0.0, 0.0), 0.5, 0);
        assert_eq!(next.timer, 0.5);
        assert_eq!((next.target_x, next.target_y), (3.0, 4.0));
        assert!(moved.is_none());
    }

    #[test]
    fn wander_retargets_at_interval_without_moving() {
        let ai = Ai {
            timer: 1.99,
            ..Ai::new(AiBehavior::Wander).with_target(500.0, 500.0).with_seed(42)
        };
        let pos = Position::new(100.0, 100.0);
        let (next, moved) = tick_ai(&ai, &pos, 0.016, 0);

        assert_eq!(next.timer, 0.0);
        assert!(moved.is_none());
        assert!((next.target_x - pos.x).abs() <= WANDER_RANGE / 2.0);
        assert!((next.target_y - pos.y).abs() <= WANDER_RANGE / 2.0);
        assert_ne!(next.seed, ai.seed);
    }

    #[test]
    fn wander_retarget_is_deterministic_per_seed() {
        let ai = Ai {
            timer: 2.0,
            ..Ai::new(AiBehavior::Wander).with_seed(7)
        };
        let pos = Position::new(0.0, 0.0);
        assert_eq!(tick_ai(&ai, &pos, 0.0, 0), tick_ai(&ai, &pos, 0.0, 0));
    }

    #[test]
    fn wander_steps_towards_target() {
        let ai = Ai::new(AiBehavior::Wander).with_target(100.0, 0.0);
        let (next, moved) = tick_ai(&ai, &Position::new(0.0, 0.0), 0.1, 0);
        let moved = moved.unwrap();
        assert!((moved.x - 5.0).abs() < 1e-4);
        assert_eq!(moved.y, 0.0);
        assert!((next.timer - 0.1).abs() < 1e-6);
    }

    #[test]
    fn wander_stops_when_close() {
        let ai = Ai::new(AiBehavior::Wander).with_target(3.0, 4.0);
        let (next, moved) = tick_ai(&ai, &Position::new(0.0, 0.0), 0.1, 0);
        assert!(moved.is_none());
        assert!(next.timer > 0.0);
    }

    #[test]
    fn system_resets_timer_and_keeps_position_on_retarget() {
        let mut world = World::new();
        let npc = world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(500.0, 400.0))
                .with(Ai {
                    timer: 2.0,
                    ..Ai::new(AiBehavior::Wander).with_seed(1)
                }),
        );
        let mut harness = Harness::new(TileGrid::new(50, 50, 32));
        harness.run(&mut world, ai_system, 0.016);

        assert_eq!(world.get::<Ai>(npc).unwrap().timer, 0.0);
        assert_eq!(world.get::<Position>(npc), Some(&Position::new(500.0, 400.0)));
    }

    #[test]
    fn wanderers_sharing_a_seed_pick_different_targets() {
        let mut world = World::new();
        let spawn = |world: &mut World, x: f32, y: f32| {
            world.spawn_bundle(
                ComponentBundle::new()
                    .with(Position::new(x, y))
                    .with(Ai {
                        timer: WANDER_INTERVAL,
                        ..Ai::new(AiBehavior::Wander)
                    }),
            )
        };
        let a = spawn(&mut world, 100.0, 100.0);
        let b = spawn(&mut world, 700.0, 300.0);
        let mut harness = Harness::new(TileGrid::new(50, 50, 32));
        harness.run(&mut world, ai_system, 0.016);

        let ai_a = *world.get::<Ai>(a).unwrap();
        let ai_b = *world.get::<Ai>(b).unwrap();
        let offset_a = (ai_a.target_x - 100.0, ai_a.target_y - 100.0);
        let offset_b = (ai_b.target_x - 700.0, ai_b.target_y - 300.0);
        assert!(
            (offset_a.0 - offset_b.0).abs() > 1e-3 || (offset_a.1 - offset_b.1).abs() > 1e-3,
            "same offsets {offset_a:?} and {offset_b:?}"
        );
        assert_ne!(ai_a.seed, ai_b.seed);
    }

    #[test]
    fn stream_changes_the_retarget() {
        let ai = Ai {
            timer: WANDER_INTERVAL,
            ..Ai::new(AiBehavior::Wander).with_seed(7)
        };
        let pos = Position::new(0.0, 0.0);
        assert_eq!(tick_ai(&ai, &pos, 0.0, 3), tick_ai(&ai, &pos, 0.0, 3));
        assert_ne!(tick_ai(&ai, &pos, 0.0, 3).0, tick_ai(&ai, &pos, 0.0, 4).0);
    }

    #[test]
    fn unimplemented_behaviors_are_left_alone() {
        let mut world = World::new();
        world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(0.0, 0.0))
                .with(Ai::new(AiBehavior::Patrol)),
        );
        let mut harness = Harness::new(TileGrid::new(1, 1, 32));
        assert!(harness.run(&mut world, ai_system, 0.016).is_empty());
    }
}
