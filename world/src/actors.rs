//! Player and enemy actors together with their per-turn behaviour.

use stealth_maze_core::{
    Direction, EnemyId, EnemyKind, EnemyMode, EnemySnapshot, PlayerSnapshot, Position,
    NOISE_REACH, PERCEPTION_RADIUS, STARTING_HEALTH,
};

use crate::grid::Grid;

/// Result of a player step attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The player entered a new cell and radiated noise around it.
    Moved {
        /// Cell the player left.
        from: Position,
        /// Cell the player entered.
        to: Position,
        /// Cells that received a fresh noise countdown.
        noise: Vec<Position>,
    },
    /// The step was rejected; position and last move are unchanged.
    Blocked,
}

/// Actor steered by external input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    position: Position,
    last_move: Option<Direction>,
    health: u32,
}

impl Player {
    /// Creates a player at full health that has not moved yet.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            last_move: None,
            health: STARTING_HEALTH,
        }
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of the last successful step.
    #[must_use]
    pub const fn last_move(&self) -> Option<Direction> {
        self.last_move
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Reports whether health ran out.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Attempts a step by a raw offset.
    ///
    /// Only cardinal unit offsets are steps; anything else is rejected.
    pub fn move_by(&mut self, dx: i32, dy: i32, grid: &mut Grid) -> StepOutcome {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.step(direction, grid),
            None => StepOutcome::Blocked,
        }
    }

    /// Attempts a single step and emits noise when it succeeds.
    pub fn step(&mut self, direction: Direction, grid: &mut Grid) -> StepOutcome {
        let from = self.position;
        let to = from.step(direction);
        if !grid.is_walkable(to) {
            return StepOutcome::Blocked;
        }

        self.position = to;
        self.last_move = Some(direction);
        let noise = self.emit_noise(grid);
        StepOutcome::Moved { from, to, noise }
    }

    /// Radiates noise up to [`NOISE_REACH`] cells along each axis.
    ///
    /// Each ray stops at the first cell that is not walkable. The exit is
    /// passed through but never marked. Returns the marked cells.
    pub fn emit_noise(&self, grid: &mut Grid) -> Vec<Position> {
        let mut marked = Vec::new();
        for direction in Direction::ALL {
            let mut cell = self.position;
            for _ in 0..NOISE_REACH {
                cell = cell.step(direction);
                if !grid.is_walkable(cell) {
                    break;
                }
                if grid.mark_noise(cell) {
                    marked.push(cell);
                }
            }
        }
        marked
    }

    /// Removes one point of health without dropping below zero.
    pub fn take_damage(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    /// Captures an immutable snapshot of the player.
    #[must_use]
    pub const fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            last_move: self.last_move,
            health: self.health,
        }
    }
}

/// Borrowed view of the level an enemy reacts to.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Grid the enemy walks and listens on.
    pub grid: &'a Grid,
    /// Cell currently occupied by the player.
    pub player: Position,
}

impl<'a> Surroundings<'a> {
    /// Bundles the grid and the player's position.
    #[must_use]
    pub const fn new(grid: &'a Grid, player: Position) -> Self {
        Self { grid, player }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Behavior {
    Patrol { route: Vec<Position>, index: usize },
    Chase,
}

/// Enemy actor driven by a patrol or chase state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    id: EnemyId,
    position: Position,
    last_move: Option<Direction>,
    alerted: bool,
    behavior: Behavior,
}

impl Enemy {
    /// Creates a patrol enemy walking the provided cyclic route.
    ///
    /// The route is expressed in absolute cells; its first entry is normally
    /// the spawn cell. An empty route leaves the enemy standing still until
    /// it is alerted.
    #[must_use]
    pub fn patrol(id: EnemyId, spawn: Position, route: Vec<Position>) -> Self {
        Self::with_behavior(id, spawn, Behavior::Patrol { route, index: 0 })
    }

    /// Creates a chase enemy that idles until it is alerted.
    #[must_use]
    pub fn chase(id: EnemyId, spawn: Position) -> Self {
        Self::with_behavior(id, spawn, Behavior::Chase)
    }

    fn with_behavior(id: EnemyId, position: Position, behavior: Behavior) -> Self {
        Self {
            id,
            position,
            last_move: None,
            alerted: false,
            behavior,
        }
    }

    /// Identifier assigned at creation.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Behavioural family of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        match self.behavior {
            Behavior::Patrol { .. } => EnemyKind::Patrol,
            Behavior::Chase => EnemyKind::Chase,
        }
    }

    /// Current state-machine mode.
    #[must_use]
    pub const fn mode(&self) -> EnemyMode {
        match (&self.behavior, self.alerted) {
            (_, true) => EnemyMode::Chasing,
            (Behavior::Patrol { .. }, false) => EnemyMode::Patrolling,
            (Behavior::Chase, false) => EnemyMode::Idle,
        }
    }

    /// Cell currently occupied by the enemy.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of the last successful step.
    #[must_use]
    pub const fn last_move(&self) -> Option<Direction> {
        self.last_move
    }

    /// Whether the enemy has heard noise during this level.
    #[must_use]
    pub const fn is_alerted(&self) -> bool {
        self.alerted
    }

    /// Listens for noise within [`PERCEPTION_RADIUS`] of the enemy.
    ///
    /// The neighbourhood is a square clipped to the grid. Returns `true` only
    /// on the turn the enemy becomes alerted; the flag is never cleared.
    pub fn perceive(&mut self, surroundings: &Surroundings<'_>) -> bool {
        if self.alerted {
            return false;
        }

        let center = self.position;
        let heard = (-PERCEPTION_RADIUS..=PERCEPTION_RADIUS).any(|dy| {
            (-PERCEPTION_RADIUS..=PERCEPTION_RADIUS)
                .any(|dx| surroundings.grid.is_noisy(center.offset(dx, dy)))
        });
        self.alerted = heard;
        heard
    }

    /// Runs one turn of movement and returns the resulting position.
    ///
    /// Alerted enemies step toward the player; unalerted patrol enemies step
    /// toward their next waypoint; unalerted chase enemies stay put. A step
    /// into an unwalkable cell is dropped without trying another axis.
    pub fn advance(&mut self, surroundings: &Surroundings<'_>) -> Position {
        let target = if self.alerted {
            Some(surroundings.player)
        } else {
            match &mut self.behavior {
                Behavior::Patrol { route, index } => next_waypoint(route, index),
                Behavior::Chase => None,
            }
        };

        let Some(direction) = target.and_then(|target| axis_step(self.position, target)) else {
            return self.position;
        };

        let destination = self.position.step(direction);
        if surroundings.grid.is_walkable(destination) {
            self.position = destination;
            self.last_move = Some(direction);
        }
        self.position
    }

    /// Captures an immutable snapshot of the enemy.
    #[must_use]
    pub const fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind(),
            mode: self.mode(),
            position: self.position,
            last_move: self.last_move,
            alerted: self.alerted,
        }
    }
}

fn next_waypoint(route: &[Position], index: &mut usize) -> Option<Position> {
    if route.is_empty() {
        return None;
    }
    *index = (*index + 1) % route.len();
    route.get(*index).copied()
}

/// Picks the single step that closes the larger axis offset toward `target`.
///
/// Ties go to the vertical axis. Returns `None` when already on the target.
fn axis_step(from: Position, target: Position) -> Option<Direction> {
    let dx = target.x() - from.x();
    let dy = target.y() - from.y();
    if dx == 0 && dy == 0 {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if dy > 0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}
