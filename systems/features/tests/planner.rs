use castle_maze_core::{Command, Event, FeatureKind, FeatureRequest};
use castle_maze_system_features::{feature_count, FeaturePlanner, FeatureTuning};
use castle_maze_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn dense_tuning() -> FeatureTuning {
    let mut tuning = FeatureTuning::default();
    tuning.courtyards.density = 0.02;
    tuning.towers.density = 0.02;
    tuning.spires.density = 0.03;
    tuning.stairs.density = 0.08;
    tuning
}

fn requested_kinds(commands: &[Command]) -> Vec<FeatureKind> {
    commands
        .iter()
        .map(|command| match command {
            Command::PlaceFeature { request, .. } => request.kind(),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn planner_reacts_to_grid_configuration() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            columns: 20,
            rows: 15,
            placement_seed: 4,
        },
        &mut events,
    );

    let planner = FeaturePlanner::new(dense_tuning());
    let mut commands = Vec::new();
    planner.handle(&events, &mut ChaCha8Rng::seed_from_u64(4), &mut commands);

    let kinds = requested_kinds(&commands);
    let expected: Vec<FeatureKind> = [
        (FeatureKind::Courtyard, 0.02),
        (FeatureKind::Tower, 0.02),
        (FeatureKind::Spire, 0.03),
        (FeatureKind::Stair, 0.08),
    ]
    .into_iter()
    .flat_map(|(kind, density)| std::iter::repeat(kind).take(feature_count(20, 15, density)))
    .collect();
    assert_eq!(kinds, expected, "features are requested largest first");
}

#[test]
fn planned_features_land_on_the_grid() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            columns: 30,
            rows: 30,
            placement_seed: 12,
        },
        &mut events,
    );

    let planner = FeaturePlanner::new(dense_tuning());
    let mut commands = Vec::new();
    planner.handle(&events, &mut ChaCha8Rng::seed_from_u64(12), &mut commands);
    let requested = commands.len();

    let mut outcomes = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut outcomes);
    }

    assert_eq!(outcomes.len(), requested, "one outcome per request");
    let placed = outcomes
        .iter()
        .filter(|event| matches!(event, Event::FeaturePlaced { .. }))
        .count();
    assert_eq!(placed, query::features(&world).len());
    assert!(placed > 0, "a 30x30 grid fits at least one feature");

    for record in query::features(&world) {
        let origin = record.region.origin();
        let size = record.region.size();
        assert!(origin.column() + size.width() <= 30);
        assert!(origin.row() + size.height() <= 30);
        if record.kind == FeatureKind::Stair {
            assert!(origin.column() >= 1 && origin.row() >= 1, "stairs keep a margin");
        }
    }
}

#[test]
fn stair_directions_vary() {
    let mut tuning = FeatureTuning::disabled();
    tuning.stairs.density = 0.5;
    let planner = FeaturePlanner::new(tuning);

    let mut commands = Vec::new();
    planner.plan(8, 8, &mut ChaCha8Rng::seed_from_u64(77), &mut commands);

    let mut directions = Vec::new();
    for command in &commands {
        if let Command::PlaceFeature {
            request: FeatureRequest::Stair { direction },
            ..
        } = command
        {
            if !directions.contains(direction) {
                directions.push(*direction);
            }
        }
    }
    assert_eq!(commands.len(), 32);
    assert!(directions.len() > 1, "32 stairs should not all face one way");
}
