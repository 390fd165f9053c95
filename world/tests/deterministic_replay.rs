use stealth_maze_core::{Direction, EnemySnapshot, Event, PlayerSnapshot, Position};
use stealth_maze_world::{self as world, query, EnemySpawn, Grid, Level};

const LAYOUT: &str = "\
###############
#.............#
#....#........#
#....#...###..#
#.............#
#..~~.........#
#.......#.....#
#.......#....E#
#.............#
###############";

#[test]
fn replay_is_reproducible() {
    let first = replay(&scripted_inputs());
    let second = replay(&scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemyAlerted { .. })),
        "script should wake at least one enemy"
    );
}

#[test]
fn replay_diverges_when_inputs_differ() {
    let baseline = replay(&scripted_inputs());
    let mut altered = scripted_inputs();
    altered[0] = Some(Direction::Down);

    assert_ne!(baseline, replay(&altered));
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    player: PlayerSnapshot,
    enemies: Vec<EnemySnapshot>,
    noisy: Vec<Position>,
    events: Vec<Event>,
}

fn replay(inputs: &[Option<Direction>]) -> ReplayOutcome {
    let mut level = Level::new(
        Grid::parse(LAYOUT, 15, 10),
        Position::new(1, 1),
        vec![
            EnemySpawn::Patrol {
                spawn: Position::new(5, 5),
                route: vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)],
            },
            EnemySpawn::Chase {
                spawn: Position::new(10, 5),
            },
        ],
    );

    let mut events = Vec::new();
    for input in inputs {
        world::play_turn(&mut level, *input, &mut events);
    }

    ReplayOutcome {
        player: query::player(&level),
        enemies: query::enemy_view(&level).into_vec(),
        noisy: query::grid(&level).noisy_cells(),
        events,
    }
}

fn scripted_inputs() -> Vec<Option<Direction>> {
    use Direction::{Down, Left, Right, Up};

    vec![
        Some(Right),
        Some(Right),
        None,
        Some(Down),
        Some(Down),
        Some(Right),
        Some(Right),
        None,
        Some(Up),
        Some(Left),
        Some(Down),
        Some(Down),
        Some(Down),
        Some(Right),
        None,
        None,
    ]
}
