#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Stealth Maze adapters.
//!
//! A [`Scene`] is a backend-agnostic text picture of one level: every grid
//! cell becomes two characters (a last-move marker and a glyph), followed by
//! a status line, the legend and an optional banner. Backends implement
//! [`RenderingBackend`] to draw scenes and feed turn input back.

use anyhow::Result as AnyResult;
use stealth_maze_core::{
    move_marker, Direction, EnemyView, PlayerSnapshot, Position, PLAYER_SYMBOL,
};

/// Legend printed beneath every scene.
pub const LEGEND: &str = "Legend: @ - Player, P - Patrol Enemy, C - Chase Enemy, # - Wall, \
E - Exit, ! - Noise, Arrows - Last Move";

const TROPHY: [&str; 6] = [
    "             _______",
    "            /       \\",
    "           /_________\\",
    "           |  TROPHY  |",
    "           |_________|",
    "",
];

/// Two-character picture of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneCell {
    /// Last-move arrow of the occupant, or a blank.
    pub marker: char,
    /// Occupant symbol, or the terrain/noise symbol of an empty cell.
    pub glyph: char,
}

/// Message shown beneath the scene when the session changes phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Banner {
    /// The previous level was cleared and a new one is shown.
    LevelCleared,
    /// The final level was cleared.
    Victory,
    /// The player ran out of health.
    Defeat,
}

impl Banner {
    /// Text lines making up the banner.
    #[must_use]
    pub fn lines(self) -> Vec<&'static str> {
        match self {
            Self::LevelCleared => vec!["Moving to next level... press any key."],
            Self::Victory => {
                let mut lines = vec!["", "       Congratulations! You Won!", ""];
                lines.extend(TROPHY);
                lines.push("Press any key to exit...");
                lines
            }
            Self::Defeat => vec!["Game Over!", "Press any key to exit..."],
        }
    }
}

/// Text picture of a level ready to be drawn by a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    width: u32,
    height: u32,
    cells: Vec<SceneCell>,
    level_number: usize,
    health: u32,
    banner: Option<Banner>,
}

impl Scene {
    /// Composes a scene from the level's query surface.
    ///
    /// `symbol_at` supplies the terrain or noise symbol of each cell. The
    /// player is drawn over enemies, and among enemies sharing a cell the
    /// first in creation order is drawn. `level_index` is zero-based.
    #[must_use]
    pub fn compose<F>(
        width: u32,
        height: u32,
        symbol_at: F,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        level_index: usize,
    ) -> Self
    where
        F: Fn(Position) -> char,
    {
        let mut cells = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let position = Position::new(
                    i32::try_from(x).unwrap_or(i32::MAX),
                    i32::try_from(y).unwrap_or(i32::MAX),
                );
                cells.push(compose_cell(position, &symbol_at, player, enemies));
            }
        }

        Self {
            width,
            height,
            cells,
            level_number: level_index + 1,
            health: player.health,
            banner: None,
        }
    }

    /// Number of grid columns in the scene.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of grid rows in the scene.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Picture of the cell at the given column and row.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<SceneCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()?;
        self.cells.get(index).copied()
    }

    /// Banner currently attached to the scene.
    #[must_use]
    pub const fn banner(&self) -> Option<Banner> {
        self.banner
    }

    /// Attaches or clears the banner.
    pub fn set_banner(&mut self, banner: Option<Banner>) {
        self.banner = banner;
    }

    /// Status line with the one-based level number and remaining health.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("Level: {} | Health: {}", self.level_number, self.health)
    }

    /// Every text line of the scene in drawing order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let row_length = usize::try_from(self.width).unwrap_or(0);
        let mut lines: Vec<String> = if row_length == 0 {
            Vec::new()
        } else {
            self.cells
                .chunks(row_length)
                .map(|row| row.iter().flat_map(|cell| [cell.marker, cell.glyph]).collect())
                .collect()
        };

        lines.push(self.status_line());
        lines.push(LEGEND.to_owned());
        if let Some(banner) = self.banner {
            lines.extend(banner.lines().into_iter().map(str::to_owned));
        }
        lines
    }
}

fn compose_cell<F>(
    position: Position,
    symbol_at: &F,
    player: &PlayerSnapshot,
    enemies: &EnemyView,
) -> SceneCell
where
    F: Fn(Position) -> char,
{
    if player.position == position {
        return SceneCell {
            marker: move_marker(player.last_move),
            glyph: PLAYER_SYMBOL,
        };
    }

    match enemies.iter().find(|enemy| enemy.position == position) {
        Some(enemy) => SceneCell {
            marker: move_marker(enemy.last_move),
            glyph: enemy.symbol(),
        },
        None => SceneCell {
            marker: ' ',
            glyph: symbol_at(position),
        },
    }
}

/// One discrete command captured by a backend for the next turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnInput {
    /// Step the player in the given direction.
    Move(Direction),
    /// Let the turn pass without moving.
    Wait,
    /// Leave the session.
    Quit,
}

impl TurnInput {
    /// Direction of the requested step, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Move(direction) => Some(direction),
            Self::Wait | Self::Quit => None,
        }
    }
}

/// Phase reported back to the backend after each input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Keep drawing and reading input.
    Running,
    /// Draw the final scene, wait for one key, then stop.
    Finished,
    /// Stop immediately.
    Aborted,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Stealth Maze scenes.
pub trait RenderingBackend {
    /// Runs the backend until the session finishes or is aborted.
    ///
    /// The backend draws the scene, captures one [`TurnInput`] and hands it to
    /// `update_scene`, which may replace the scene and reports whether the
    /// session continues.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(TurnInput, &mut Scene) -> SessionState;
}
