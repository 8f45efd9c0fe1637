//! Property tests for registry operations.
//!
//! These tests use `proptest` to generate random sequences of spawns and
//! replacements and verify that registry invariants hold after each step.

use tilewalk_ecs::prelude::*;
use proptest::prelude::*;

/// Operations we can perform on the world.
#[derive(Debug, Clone)]
enum EcsOp {
    SpawnEmpty,
    SpawnPos(f32, f32),
    SpawnPosInput(f32, f32, bool),
    InsertPos(usize, f32, f32),
    InsertAi(usize, f32, f32),
    QueryPos,
    QueryPosInput,
}

/// Strategy that generates finite f32 values.
fn finite_f32() -> impl Strategy<Value = f32> {
    (-1_000_000i32..1_000_000i32).prop_map(|v| v as f32 * 0.01)
}

fn ecs_op_strategy() -> impl Strategy<Value = EcsOp> {
    prop_oneof![
        Just(EcsOp::SpawnEmpty),
        (finite_f32(), finite_f32()).prop_map(|(x, y)| EcsOp::SpawnPos(x, y)),
        (finite_f32(), finite_f32(), any::<bool>())
            .prop_map(|(x, y, c)| EcsOp::SpawnPosInput(x, y, c)),
        (0..100usize, finite_f32(), finite_f32())
            .prop_map(|(i, x, y)| EcsOp::InsertPos(i, x, y)),
        (0..100usize, finite_f32(), finite_f32())
            .prop_map(|(i, x, y)| EcsOp::InsertAi(i, x, y)),
        Just(EcsOp::QueryPos),
        Just(EcsOp::QueryPosInput),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn random_ops_preserve_registry_invariants(
        ops in prop::collection::vec(ecs_op_strategy(), 1..60)
    ) {
        let mut world = World::new();
        let mut spawned: Vec<EntityId> = Vec::new();

        for op in ops {
            match op {
                EcsOp::SpawnEmpty => spawned.push(world.spawn()),
                EcsOp::SpawnPos(x, y) => spawned.push(world.spawn_with(Position::new(x, y))),
                EcsOp::SpawnPosInput(x, y, c) => {
                    let e = world.spawn_bundle(
                        ComponentBundle::new()
                            .with(Position::new(x, y))
                            .with(Input::new(c)),
                    );
                    spawned.push(e);
                }
                EcsOp::InsertPos(idx, x, y) => {
                    if !spawned.is_empty() {
                        let e = spawned[idx % spawned.len()];
                        let v = Position::new(x, y);
                        world.insert(e, v).unwrap();
                        prop_assert_eq!(world.get::<Position>(e), Some(&v));
                    }
                }
                EcsOp::InsertAi(idx, x, y) => {
                    if !spawned.is_empty() {
                        let e = spawned[idx % spawned.len()];
                        let v = Ai::new(AiBehavior::Wander).with_target(x, y);
                        world.insert(e, v).unwrap();
                        prop_assert_eq!(world.get::<Ai>(e), Some(&v));
                    }
                }
                EcsOp::QueryPos => {
                    let count = world.query::<(&Position,)>().count();
                    let expected = spawned
                        .iter()
                        .filter(|&&e| world.has_component(e, ComponentKind::Position))
                        .count();
                    prop_assert_eq!(count, expected);
                }
                EcsOp::QueryPosInput => {
                    for (e, _) in world.query::<(&Position, &Input)>() {
                        prop_assert!(world.has::<Position>(e) && world.has::<Input>(e));
                    }
                }
            }

            // Invariant: every spawned id is live, in spawn order, and unique.
            prop_assert_eq!(world.len(), spawned.len());
            let order: Vec<EntityId> = world.iter().map(Entity::id).collect();
            prop_assert_eq!(&order, &spawned);
        }
    }

    /// A replacement of one kind never disturbs the other kinds on the entity.
    #[test]
    fn replacement_leaves_other_kinds_untouched(
        x in finite_f32(),
        y in finite_f32(),
        nx in finite_f32(),
        ny in finite_f32(),
        msg in "[a-z ]{0,24}",
    ) {
        let mut world = World::new();
        let e = world.spawn_bundle(
            ComponentBundle::new()
                .with(Position::new(x, y))
                .with(Interaction::new(msg.clone())),
        );
        world.insert(e, Position::new(nx, ny)).unwrap();

        prop_assert_eq!(world.get::<Position>(e), Some(&Position::new(nx, ny)));
        prop_assert_eq!(
            world.get::<Interaction>(e).map(|i| i.message.as_str()),
            Some(msg.as_str())
        );
    }

    /// Entity ids are never reused, even across a clear.
    #[test]
    fn ids_are_never_reused(first in 0..30usize, second in 0..30usize) {
        let mut world = World::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..first {
            prop_assert!(seen.insert(world.spawn()));
        }
        world.clear();
        for _ in 0..second {
            prop_assert!(seen.insert(world.spawn()));
        }
    }
}
