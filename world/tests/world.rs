use meadow_core::{Agent, EngineUnavailable, SnapshotSource};
use meadow_world::{query, Animal, World};

#[test]
fn seeded_worlds_are_reproducible() {
    let first = World::with_seed(42, 32);
    let second = World::with_seed(42, 32);

    assert_eq!(first, second);
    assert_ne!(first, World::with_seed(43, 32));
}

#[test]
fn generated_animals_lie_within_the_unit_square() {
    let world = World::with_seed(7, 256);

    for animal in query::animals(&world) {
        assert!(
            (0.0..=1.0).contains(&animal.x()) && (0.0..=1.0).contains(&animal.y()),
            "animal escaped the world extent: {animal:?}"
        );
    }
}

#[test]
fn snapshot_preserves_iteration_order_and_drops_orientation() {
    let world = World::from_animals(vec![
        Animal::new(0.9, 0.1).with_rotation(1.2),
        Animal::new(0.2, 0.4),
        Animal::new(0.5, 0.5).with_rotation(3.0),
    ]);

    let snapshot = world.world_snapshot().expect("world is always available");

    assert_eq!(
        snapshot.agents(),
        &[
            Agent::new(0.9, 0.1),
            Agent::new(0.2, 0.4),
            Agent::new(0.5, 0.5)
        ]
    );
}

#[test]
fn snapshots_are_independent_copies() {
    let world = World::with_seed(5, 4);
    let first = world.world_snapshot().expect("world is always available");
    let second = world.world_snapshot().expect("world is always available");

    assert_eq!(first, second);
    assert_eq!(first.len(), query::population(&world));
    drop(first);
    assert_eq!(second.len(), 4);
}

#[test]
fn empty_world_yields_empty_snapshot() {
    let world = World::from_animals(Vec::new());

    assert!(query::world_snapshot(&world).is_empty());
}

#[test]
fn absent_world_reports_engine_unavailable() {
    let engine: Option<World> = None;

    assert_eq!(engine.world_snapshot(), Err(EngineUnavailable));
}
