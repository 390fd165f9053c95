use stealth_maze_core::{Direction, EnemyId, EnemyKind, Position, STARTING_HEALTH};
use stealth_maze_system_campaign::{
    Campaign, CampaignError, EnemyBlueprint, LevelBlueprint, Outcome, Progress, RoutePreset,
    RouteSpec,
};
use stealth_maze_world::{self as world, query};

const CUSTOM_CAMPAIGN: &str = r#"
[[levels]]
name = "Corridor"
width = 7
height = 3
layout = "corridor.txt"
player_start = { x = 1, y = 1 }

[[levels.enemies]]
kind = "chase"
spawn = { x = 4, y = 1 }

[[levels]]
name = "Yard"
width = 12
height = 9

[[levels.enemies]]
kind = "patrol"
spawn = { x = 6, y = 6 }
route = "square"

[[levels.enemies]]
kind = "patrol"
spawn = { x = 3, y = 3 }
route = [[0, 0], [0, 1], [0, 2], [0, 1]]

[[levels.enemies]]
kind = "patrol"
spawn = { x = 8, y = 2 }
"#;

#[test]
fn classic_campaign_matches_shipped_levels() {
    let campaign = Campaign::classic();

    let sizes: Vec<(u32, u32)> = campaign
        .levels()
        .iter()
        .map(|level| (level.width, level.height))
        .collect();
    assert_eq!(sizes, vec![(15, 10), (25, 15), (40, 25)]);

    let rosters: Vec<usize> = campaign
        .levels()
        .iter()
        .map(|level| level.enemies.len())
        .collect();
    assert_eq!(rosters, vec![2, 3, 5]);
    assert_eq!(
        campaign.level(0).and_then(|level| level.layout.as_deref()),
        Some("level1.txt")
    );
}

#[test]
fn classic_level_instantiates_with_fallback_room() {
    let blueprint = Campaign::classic().level(0).cloned().expect("first level");

    let level = blueprint.instantiate(None);

    assert_eq!(query::dimensions(&level), (15, 10));
    assert_eq!(query::player(&level).position, Position::new(1, 1));
    assert_eq!(query::player(&level).health, STARTING_HEALTH);
    let kinds: Vec<EnemyKind> = query::enemy_view(&level)
        .iter()
        .map(|enemy| enemy.kind)
        .collect();
    assert_eq!(kinds, vec![EnemyKind::Patrol, EnemyKind::Chase]);
    assert!(!query::grid(&level).is_walkable(Position::new(0, 0)));
}

#[test]
fn presets_are_closed_cycles_of_single_steps() {
    for preset in [RoutePreset::Loop, RoutePreset::Square, RoutePreset::Line] {
        let offsets = preset.offsets();
        assert_eq!(offsets[0], (0, 0));
        for (index, &(x, y)) in offsets.iter().enumerate() {
            let (nx, ny) = offsets[(index + 1) % offsets.len()];
            assert!(
                x.abs_diff(nx) + y.abs_diff(ny) <= 1,
                "{preset:?} leg {index} skips a cell"
            );
        }
    }
    assert!(Campaign::new(Campaign::classic().levels().to_vec()).is_ok());
}

#[test]
fn classic_patrols_stay_on_route_and_return_to_spawn() {
    for blueprint in Campaign::classic().levels() {
        let mut level = blueprint.instantiate(None);
        let patrols: Vec<(usize, Vec<Position>)> = blueprint
            .enemies
            .iter()
            .enumerate()
            .filter_map(|(index, enemy)| match enemy {
                EnemyBlueprint::Patrol { spawn, route } => Some((
                    index,
                    route
                        .offsets()
                        .into_iter()
                        .map(|(dx, dy)| spawn.offset(dx, dy))
                        .collect(),
                )),
                EnemyBlueprint::Chase { .. } => None,
            })
            .collect();
        assert!(!patrols.is_empty());

        let mut events = Vec::new();
        for turn in 1..=120_usize {
            world::play_turn(&mut level, None, &mut events);
            let view = query::enemy_view(&level);
            for (index, waypoints) in &patrols {
                let id = EnemyId::new(u32::try_from(*index).expect("small roster"));
                let position = view.get(id).expect("patrol exists").position;
                assert_eq!(
                    position,
                    waypoints[turn % waypoints.len()],
                    "{} patrol {index} left its route on turn {turn}",
                    blueprint.name
                );
            }
        }
    }
}

#[test]
fn classic_first_patrol_completes_its_loop() {
    let blueprint = Campaign::classic().level(0).cloned().expect("first level");
    let mut level = blueprint.instantiate(None);
    let mut events = Vec::new();
    let mut trail = Vec::new();

    for _ in 0..RoutePreset::Loop.offsets().len() {
        world::play_turn(&mut level, None, &mut events);
        trail.push(query::enemy_view(&level).iter().next().expect("patrol").position);
    }

    assert_eq!(
        trail,
        vec![
            Position::new(6, 5),
            Position::new(7, 5),
            Position::new(7, 6),
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(5, 5),
        ]
    );
}

#[test]
fn routes_with_gaps_are_rejected() {
    let skipping = r#"
[[levels]]
name = "Gap"
width = 8
height = 8

[[levels.enemies]]
kind = "patrol"
spawn = { x = 2, y = 2 }
route = [[0, 0], [2, 0], [1, 0]]
"#;
    assert!(matches!(
        Campaign::from_toml_str(skipping),
        Err(CampaignError::DisjointRoute { name, from: (0, 0), to: (2, 0) }) if name == "Gap"
    ));

    let diagonal_return = skipping.replace("[[0, 0], [2, 0], [1, 0]]", "[[0, 0], [1, 0], [1, 1]]");
    assert!(matches!(
        Campaign::from_toml_str(&diagonal_return),
        Err(CampaignError::DisjointRoute { from: (1, 1), to: (0, 0), .. })
    ));
}

#[test]
fn toml_campaign_parses_presets_offsets_and_defaults() {
    let campaign = Campaign::from_toml_str(CUSTOM_CAMPAIGN).expect("campaign parses");

    assert_eq!(campaign.len(), 2);
    let yard = campaign.level(1).expect("second level");
    assert_eq!(yard.layout, None);
    assert_eq!(yard.player_start, Position::new(1, 1));
    assert_eq!(
        yard.enemies,
        vec![
            EnemyBlueprint::Patrol {
                spawn: Position::new(6, 6),
                route: RouteSpec::Preset(RoutePreset::Square),
            },
            EnemyBlueprint::Patrol {
                spawn: Position::new(3, 3),
                route: RouteSpec::Offsets(vec![(0, 0), (0, 1), (0, 2), (0, 1)]),
            },
            EnemyBlueprint::Patrol {
                spawn: Position::new(8, 2),
                route: RouteSpec::Preset(RoutePreset::Loop),
            },
        ]
    );
}

#[test]
fn toml_campaign_rejects_empty_and_degenerate_levels() {
    assert!(matches!(
        Campaign::from_toml_str("levels = []"),
        Err(CampaignError::Empty)
    ));
    assert!(matches!(
        Campaign::from_toml_str("[[levels]]\nname = \"Void\"\nwidth = 0\nheight = 4\n"),
        Err(CampaignError::EmptyGrid { name }) if name == "Void"
    ));
    assert!(matches!(
        Campaign::from_toml_str("levels = 3"),
        Err(CampaignError::Parse(_))
    ));
}

#[test]
fn layout_text_replaces_the_fallback_room() {
    let campaign = Campaign::from_toml_str(CUSTOM_CAMPAIGN).expect("campaign parses");
    let corridor = campaign.level(0).expect("first level");

    let level = corridor.instantiate(Some("#######\n#....E#\n#######"));

    assert!(query::grid(&level).is_exit(Position::new(5, 1)));
}

fn corridor_level() -> LevelBlueprint {
    LevelBlueprint {
        name: String::from("Corridor"),
        width: 7,
        height: 3,
        layout: None,
        player_start: Position::new(1, 1),
        enemies: Vec::new(),
    }
}

#[test]
fn reaching_exit_clears_level_then_wins_on_the_last_one() {
    let campaign = Campaign::new(vec![corridor_level(), corridor_level()]).expect("valid");
    let mut progress = Progress::new(&campaign);
    let layout = "#######\n#.E...#\n#######";

    let mut level = campaign.level(0).expect("level").instantiate(Some(layout));
    assert_eq!(progress.evaluate(&level), Outcome::InProgress);

    let mut events = Vec::new();
    world::play_turn(&mut level, Some(Direction::Right), &mut events);
    assert_eq!(progress.evaluate(&level), Outcome::LevelCleared { next: 1 });
    assert_eq!(progress.advance(), Some(1));

    let mut level = campaign.level(1).expect("level").instantiate(Some(layout));
    world::play_turn(&mut level, Some(Direction::Right), &mut events);
    assert_eq!(progress.evaluate(&level), Outcome::Victory);
    assert_eq!(progress.advance(), None);
    assert_eq!(progress.current(), 1);
}

#[test]
fn running_out_of_health_is_a_defeat() {
    let mut blueprint = corridor_level();
    blueprint.width = 9;
    blueprint.enemies = vec![EnemyBlueprint::Chase {
        spawn: Position::new(3, 1),
    }];
    let campaign = Campaign::new(vec![blueprint]).expect("valid");
    let progress = Progress::new(&campaign);
    let mut level = campaign.level(0).expect("level").instantiate(None);
    let mut events = Vec::new();

    world::play_turn(&mut level, Some(Direction::Right), &mut events);
    for _ in 1..STARTING_HEALTH {
        assert_eq!(progress.evaluate(&level), Outcome::InProgress);
        world::play_turn(&mut level, None, &mut events);
    }

    assert_eq!(progress.evaluate(&level), Outcome::Defeat);
}

#[test]
fn starting_level_is_clamped_to_campaign() {
    let campaign = Campaign::classic();

    assert_eq!(Progress::starting_at(&campaign, 1).current(), 1);
    assert_eq!(Progress::starting_at(&campaign, 99).current(), 2);
}
