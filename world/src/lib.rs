#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Stealth Maze.
//!
//! A [`Level`] owns the grid, the player and every enemy. Adapters drive it
//! exclusively through [`apply`] (or the [`play_turn`] shorthand) and observe
//! it through the [`query`] module.

mod actors;
mod grid;

use stealth_maze_core::{Command, Direction, EnemyId, Event, Position};

pub use actors::{Enemy, Player, StepOutcome, Surroundings};
pub use grid::Grid;

/// Placement and behaviour of an enemy supplied when a level is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnemySpawn {
    /// Enemy walking a cyclic route until alerted.
    Patrol {
        /// Cell the enemy starts on.
        spawn: Position,
        /// Route waypoints as `(dx, dy)` offsets from the spawn cell.
        route: Vec<(i32, i32)>,
    },
    /// Enemy idling in place until alerted.
    Chase {
        /// Cell the enemy starts on.
        spawn: Position,
    },
}

impl EnemySpawn {
    fn into_enemy(self, id: EnemyId) -> Enemy {
        match self {
            Self::Patrol { spawn, route } => {
                let route = route
                    .into_iter()
                    .map(|(dx, dy)| spawn.offset(dx, dy))
                    .collect();
                Enemy::patrol(id, spawn, route)
            }
            Self::Chase { spawn } => Enemy::chase(id, spawn),
        }
    }
}

/// Represents the authoritative state of a single level.
#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    player: Player,
    enemies: Vec<Enemy>,
    turn: u64,
}

impl Level {
    /// Creates a level from a grid, the player's start cell and an enemy roster.
    ///
    /// Enemies receive identifiers matching their position in `roster`, which
    /// is also the order they act in every turn.
    #[must_use]
    pub fn new(grid: Grid, player_start: Position, roster: Vec<EnemySpawn>) -> Self {
        if !grid.contains(player_start) {
            tracing::warn!(
                x = player_start.x(),
                y = player_start.y(),
                "player starts outside the grid"
            );
        }
        let enemies = roster
            .into_iter()
            .zip(0_u32..)
            .map(|(spawn, index)| spawn.into_enemy(EnemyId::new(index)))
            .collect();
        Self {
            grid,
            player: Player::new(player_start),
            enemies,
            turn: 0,
        }
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        match self.player.step(direction, &mut self.grid) {
            StepOutcome::Moved { from, to, noise } => {
                out_events.push(Event::PlayerMoved {
                    from,
                    to,
                    direction,
                });
                if !noise.is_empty() {
                    out_events.push(Event::NoiseEmitted {
                        origin: to,
                        cells: noise,
                    });
                }
            }
            StepOutcome::Blocked => out_events.push(Event::PlayerBlocked { direction }),
        }
    }

    fn advance_turn(&mut self, out_events: &mut Vec<Event>) {
        self.turn = self.turn.saturating_add(1);
        tracing::trace!(turn = self.turn, "turn started");
        out_events.push(Event::TurnStarted { turn: self.turn });

        let mut faded = Vec::new();
        self.grid.decay_noise(&mut faded);
        if !faded.is_empty() {
            out_events.push(Event::NoiseFaded { cells: faded });
        }

        let surroundings = Surroundings::new(&self.grid, self.player.position());
        for enemy in &mut self.enemies {
            if enemy.perceive(&surroundings) {
                let at = enemy.position();
                tracing::debug!(enemy = enemy.id().get(), x = at.x(), y = at.y(), "enemy alerted");
                out_events.push(Event::EnemyAlerted {
                    enemy: enemy.id(),
                    at,
                });
            }

            let from = enemy.position();
            let to = enemy.advance(&surroundings);
            if to == from {
                continue;
            }
            if let Some(direction) = enemy.last_move() {
                out_events.push(Event::EnemyMoved {
                    enemy: enemy.id(),
                    from,
                    to,
                    direction,
                });
            }
        }

        for enemy in &self.enemies {
            if enemy.position() != self.player.position() {
                continue;
            }
            self.player.take_damage();
            tracing::debug!(
                enemy = enemy.id().get(),
                health = self.player.health(),
                "player caught"
            );
            out_events.push(Event::PlayerDamaged {
                enemy: enemy.id(),
                health: self.player.health(),
            });
        }
    }
}

/// Applies the provided command to the level, mutating state deterministically.
pub fn apply(level: &mut Level, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => level.move_player(direction, out_events),
        Command::AdvanceTurn => level.advance_turn(out_events),
    }
}

/// Plays one full turn: the optional player step followed by the level update.
pub fn play_turn(level: &mut Level, input: Option<Direction>, out_events: &mut Vec<Event>) {
    if let Some(direction) = input {
        apply(level, Command::MovePlayer { direction }, out_events);
    }
    apply(level, Command::AdvanceTurn, out_events);
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use stealth_maze_core::{EnemySnapshot, EnemyView, PlayerSnapshot, Position};

    use super::{Grid, Level};

    /// Provides read-only access to the level's grid.
    #[must_use]
    pub fn grid(level: &Level) -> &Grid {
        &level.grid
    }

    /// Grid dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(level: &Level) -> (u32, u32) {
        (level.grid.width(), level.grid.height())
    }

    /// Terrain or noise symbol displayed at the cell.
    #[must_use]
    pub fn cell_symbol(level: &Level, position: Position) -> char {
        level.grid.symbol(position)
    }

    /// Captures the player's position, last move and health.
    #[must_use]
    pub fn player(level: &Level) -> PlayerSnapshot {
        level.player.snapshot()
    }

    /// Captures a read-only view of every enemy in creation order.
    #[must_use]
    pub fn enemy_view(level: &Level) -> EnemyView {
        EnemyView::from_snapshots(level.enemies.iter().map(super::Enemy::snapshot).collect())
    }

    /// Returns the first enemy, in creation order, standing on the cell.
    #[must_use]
    pub fn enemy_at(level: &Level, position: Position) -> Option<EnemySnapshot> {
        level
            .enemies
            .iter()
            .find(|enemy| enemy.position() == position)
            .map(super::Enemy::snapshot)
    }

    /// Reports whether the player currently stands on the exit.
    #[must_use]
    pub fn player_on_exit(level: &Level) -> bool {
        level.grid.is_exit(level.player.position())
    }

    /// Reports whether the player's health ran out.
    #[must_use]
    pub fn player_defeated(level: &Level) -> bool {
        level.player.is_defeated()
    }

    /// Number of turns simulated so far.
    #[must_use]
    pub fn turn(level: &Level) -> u64 {
        level.turn
    }
}
