#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign system that describes level rosters and tracks progression.
//!
//! Levels are plain data: a grid size, an optional layout file name, the
//! player's start cell and an enemy roster whose patrol routes are offsets
//! from each spawn. A [`Campaign`] is either the built-in classic set or is
//! loaded from TOML, and [`Progress`] decides after every turn whether the
//! current level continues, was cleared, or ended the run.

use serde::Deserialize;
use stealth_maze_core::Position;
use stealth_maze_world::{query, EnemySpawn, Grid, Level};

/// Errors raised while building a campaign.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// The TOML document could not be deserialised.
    #[error("failed to parse campaign: {0}")]
    Parse(#[from] toml::de::Error),
    /// The campaign lists no levels.
    #[error("campaign defines no levels")]
    Empty,
    /// A level declares a zero-sized grid.
    #[error("level '{name}' has a zero-sized grid")]
    EmptyGrid {
        /// Name of the offending level.
        name: String,
    },
    /// A patrol route contains two consecutive waypoints more than one
    /// cell apart, counting the leg from the last waypoint back to the first.
    #[error("level '{name}' has a patrol route leg from {from:?} to {to:?} longer than one cell")]
    DisjointRoute {
        /// Name of the offending level.
        name: String,
        /// Waypoint offset the leg starts at.
        from: (i32, i32),
        /// Waypoint offset the leg ends at.
        to: (i32, i32),
    },
}

/// Named patrol routes shipped with the classic campaign.
///
/// Every leg, including the one closing the cycle, is a single cell so a
/// patrol stepping once per turn stays on its route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePreset {
    /// Short east-bound loop that returns along the row below.
    Loop,
    /// Tight square around the spawn cell.
    Square,
    /// Long east-bound sweep that returns along the row below.
    Line,
}

impl RoutePreset {
    /// Route offsets relative to the spawn cell, spawn first.
    #[must_use]
    pub fn offsets(self) -> Vec<(i32, i32)> {
        match self {
            Self::Loop => vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)],
            Self::Square => vec![(0, 0), (0, 1), (1, 1), (1, 0), (0, 0)],
            Self::Line => vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (3, 1),
                (2, 1),
                (1, 1),
                (0, 1),
            ],
        }
    }
}

/// Patrol route given either by preset name or by explicit offsets.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RouteSpec {
    /// One of the named presets.
    Preset(RoutePreset),
    /// Explicit `[dx, dy]` offsets from the spawn cell.
    Offsets(Vec<(i32, i32)>),
}

impl RouteSpec {
    /// Resolves the route into offsets from the spawn cell.
    #[must_use]
    pub fn offsets(&self) -> Vec<(i32, i32)> {
        match self {
            Self::Preset(preset) => preset.offsets(),
            Self::Offsets(offsets) => offsets.clone(),
        }
    }
}

impl Default for RouteSpec {
    fn default() -> Self {
        Self::Preset(RoutePreset::Loop)
    }
}

/// Enemy entry of a level roster.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EnemyBlueprint {
    /// Enemy walking a route until alerted.
    Patrol {
        /// Cell the enemy starts on.
        spawn: Position,
        /// Route walked while unalerted.
        #[serde(default)]
        route: RouteSpec,
    },
    /// Enemy waiting in place until alerted.
    Chase {
        /// Cell the enemy starts on.
        spawn: Position,
    },
}

impl EnemyBlueprint {
    fn disjoint_leg(&self) -> Option<((i32, i32), (i32, i32))> {
        let Self::Patrol { route, .. } = self else {
            return None;
        };
        let offsets = route.offsets();
        let closing = offsets.last().zip(offsets.first());
        offsets
            .windows(2)
            .map(|leg| (leg[0], leg[1]))
            .chain(closing.map(|(last, first)| (*last, *first)))
            .find(|&((fx, fy), (tx, ty))| fx.abs_diff(tx) + fy.abs_diff(ty) > 1)
    }

    fn to_spawn(&self) -> EnemySpawn {
        match self {
            Self::Patrol { spawn, route } => EnemySpawn::Patrol {
                spawn: *spawn,
                route: route.offsets(),
            },
            Self::Chase { spawn } => EnemySpawn::Chase { spawn: *spawn },
        }
    }
}

/// Data describing how to build one level.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LevelBlueprint {
    /// Display name of the level.
    pub name: String,
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Layout file name, resolved by the adapter that loads it.
    #[serde(default)]
    pub layout: Option<String>,
    /// Cell the player starts on.
    #[serde(default = "default_player_start")]
    pub player_start: Position,
    /// Enemies in the order they act each turn.
    #[serde(default)]
    pub enemies: Vec<EnemyBlueprint>,
}

fn default_player_start() -> Position {
    Position::new(1, 1)
}

impl LevelBlueprint {
    /// Builds a fresh level, parsing `layout` when it is available.
    ///
    /// Without layout text the grid is a bordered room of the declared size.
    #[must_use]
    pub fn instantiate(&self, layout: Option<&str>) -> Level {
        let grid = Grid::from_source(layout, self.width, self.height);
        let roster = self.enemies.iter().map(EnemyBlueprint::to_spawn).collect();
        Level::new(grid, self.player_start, roster)
    }
}

#[derive(Deserialize)]
struct CampaignFile {
    levels: Vec<LevelBlueprint>,
}

/// Ordered, non-empty list of levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    levels: Vec<LevelBlueprint>,
}

impl Campaign {
    /// Validates and wraps the provided levels.
    pub fn new(levels: Vec<LevelBlueprint>) -> Result<Self, CampaignError> {
        if levels.is_empty() {
            return Err(CampaignError::Empty);
        }
        if let Some(level) = levels
            .iter()
            .find(|level| level.width == 0 || level.height == 0)
        {
            return Err(CampaignError::EmptyGrid {
                name: level.name.clone(),
            });
        }
        for level in &levels {
            let leg = level.enemies.iter().find_map(EnemyBlueprint::disjoint_leg);
            if let Some((from, to)) = leg {
                return Err(CampaignError::DisjointRoute {
                    name: level.name.clone(),
                    from,
                    to,
                });
            }
        }
        Ok(Self { levels })
    }

    /// Parses a campaign from a TOML document with `[[levels]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self, CampaignError> {
        let file: CampaignFile = toml::from_str(contents)?;
        Self::new(file.levels)
    }

    /// The three-level campaign the game ships with.
    #[must_use]
    pub fn classic() -> Self {
        let patrol = |x, y, preset| EnemyBlueprint::Patrol {
            spawn: Position::new(x, y),
            route: RouteSpec::Preset(preset),
        };
        let chase = |x, y| EnemyBlueprint::Chase {
            spawn: Position::new(x, y),
        };

        Self {
            levels: vec![
                LevelBlueprint {
                    name: String::from("Small"),
                    width: 15,
                    height: 10,
                    layout: Some(String::from("level1.txt")),
                    player_start: default_player_start(),
                    enemies: vec![patrol(5, 5, RoutePreset::Loop), chase(10, 5)],
                },
                LevelBlueprint {
                    name: String::from("Medium"),
                    width: 25,
                    height: 15,
                    layout: Some(String::from("level2.txt")),
                    player_start: default_player_start(),
                    enemies: vec![
                        patrol(10, 5, RoutePreset::Loop),
                        patrol(15, 10, RoutePreset::Square),
                        chase(20, 5),
                    ],
                },
                LevelBlueprint {
                    name: String::from("Large"),
                    width: 40,
                    height: 25,
                    layout: Some(String::from("level3.txt")),
                    player_start: default_player_start(),
                    enemies: vec![
                        patrol(10, 10, RoutePreset::Loop),
                        patrol(15, 15, RoutePreset::Square),
                        patrol(5, 20, RoutePreset::Line),
                        chase(20, 15),
                        chase(25, 10),
                    ],
                },
            ],
        }
    }

    /// Every level in play order.
    #[must_use]
    pub fn levels(&self) -> &[LevelBlueprint] {
        &self.levels
    }

    /// Blueprint at the zero-based index, if present.
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&LevelBlueprint> {
        self.levels.get(index)
    }

    /// Number of levels in the campaign.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; campaigns are validated to hold at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Verdict reached after a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The current level continues.
    InProgress,
    /// The player reached the exit and another level follows.
    LevelCleared {
        /// Zero-based index of the level to load next.
        next: usize,
    },
    /// The player reached the exit of the final level.
    Victory,
    /// The player ran out of health.
    Defeat,
}

/// Tracks which campaign level is being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    current: usize,
    total: usize,
}

impl Progress {
    /// Starts at the first level of the campaign.
    #[must_use]
    pub fn new(campaign: &Campaign) -> Self {
        Self::starting_at(campaign, 0)
    }

    /// Starts at the given zero-based level, clamped to the final level.
    #[must_use]
    pub fn starting_at(campaign: &Campaign, index: usize) -> Self {
        let total = campaign.len();
        Self {
            current: index.min(total.saturating_sub(1)),
            total,
        }
    }

    /// Zero-based index of the level being played.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Classifies the level state after a completed turn.
    ///
    /// Reaching the exit takes precedence over running out of health.
    #[must_use]
    pub fn evaluate(&self, level: &Level) -> Outcome {
        if query::player_on_exit(level) {
            let next = self.current + 1;
            if next < self.total {
                Outcome::LevelCleared { next }
            } else {
                Outcome::Victory
            }
        } else if query::player_defeated(level) {
            Outcome::Defeat
        } else {
            Outcome::InProgress
        }
    }

    /// Moves on to the next level, returning its index.
    ///
    /// Returns `None` and stays put when the final level is current.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.current + 1;
        if next >= self.total {
            return None;
        }
        self.current = next;
        tracing::info!(level = next + 1, "advancing to next level");
        Some(next)
    }
}
