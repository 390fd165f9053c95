#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Stealth Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level simulation, and supporting systems. Adapters submit
//! [`Command`] values describing the player's intent for a turn, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing everything that changed. Adapters and systems
//! read immutable snapshots and never mutate the level directly.

use serde::{Deserialize, Serialize};

/// Canonical title shown when the experience boots.
pub const GAME_TITLE: &str = "Stealth Maze";

/// Health assigned to the player when a level starts.
pub const STARTING_HEALTH: u32 = 3;

/// Number of decay passes a freshly marked noise cell survives.
pub const NOISE_LIFETIME: u8 = 2;

/// Maximum distance, in cells, a noise burst travels along each axis.
pub const NOISE_REACH: i32 = 2;

/// Half-width of the square neighbourhood an enemy listens to.
pub const PERCEPTION_RADIUS: i32 = 3;

/// Symbol used to draw the player.
pub const PLAYER_SYMBOL: char = '@';

/// Symbol overlaid on cells that currently carry noise.
pub const NOISE_SYMBOL: char = '!';

/// Commands that express all permissible level mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that the player attempt a single step in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Runs one simulation turn: noise decay, enemy perception and movement,
    /// then contact damage.
    AdvanceTurn,
}

/// Events broadcast by the level after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player stepped between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Position,
        /// Cell the player occupies after the move.
        to: Position,
        /// Direction recorded as the player's last move.
        direction: Direction,
    },
    /// Reports that the player attempted to walk into a blocked cell.
    PlayerBlocked {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Lists the cells marked noisy by a player step.
    NoiseEmitted {
        /// Cell the noise radiated from.
        origin: Position,
        /// Cells that received a fresh noise countdown.
        cells: Vec<Position>,
    },
    /// Announces the start of a simulation turn.
    TurnStarted {
        /// One-based index of the turn being simulated.
        turn: u64,
    },
    /// Lists the cells whose noise countdown expired during decay.
    NoiseFaded {
        /// Cells that became silent.
        cells: Vec<Position>,
    },
    /// Reports that an enemy heard noise and switched to pursuit.
    EnemyAlerted {
        /// Identifier of the enemy that became alerted.
        enemy: EnemyId,
        /// Cell the enemy occupied when it heard the noise.
        at: Position,
    },
    /// Confirms that an enemy stepped between two cells.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: Position,
        /// Cell the enemy occupies after the move.
        to: Position,
        /// Direction recorded as the enemy's last move.
        direction: Direction,
    },
    /// Reports that an enemy sharing the player's cell dealt damage.
    PlayerDamaged {
        /// Enemy responsible for the contact.
        enemy: EnemyId,
        /// Player health remaining after the hit.
        health: u32,
    },
}

/// Cardinal movement directions available to every actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction, in the order noise radiates from a step.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Unit offset `(dx, dy)` covered by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Resolves a unit offset into a direction.
    ///
    /// Only cardinal unit vectors are accepted; zero, diagonal and longer
    /// offsets yield `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// Arrow glyph displayed next to an actor that last moved this way.
    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}

/// Glyph describing an optional last move; blank when the actor never moved.
#[must_use]
pub const fn move_marker(last_move: Option<Direction>) -> char {
    match last_move {
        Some(direction) => direction.arrow(),
        None => ' ',
    }
}

/// Location of a single grid cell expressed as signed column and row indices.
///
/// Coordinates are signed so that positions just outside the grid remain
/// representable; every grid query treats them as out of bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position shifted by the provided offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the neighbouring position one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Static content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Impassable wall.
    Wall,
    /// Open floor.
    Floor,
    /// Level exit; reaching it completes the level.
    Exit,
    /// Walkable cell carrying an arbitrary layout glyph.
    Decoration(char),
}

impl Terrain {
    /// Maps a layout character onto terrain.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            '#' => Self::Wall,
            '.' => Self::Floor,
            'E' => Self::Exit,
            other => Self::Decoration(other),
        }
    }

    /// Layout character that produced this terrain.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Exit => 'E',
            Self::Decoration(symbol) => symbol,
        }
    }

    /// Reports whether actors may stand on this terrain.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Unique identifier assigned to an enemy, equal to its creation index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavioural families of enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks a fixed cyclic route until it hears noise.
    Patrol,
    /// Waits in place until it hears noise.
    Chase,
}

impl EnemyKind {
    /// Symbol used to draw enemies of this kind.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Patrol => 'P',
            Self::Chase => 'C',
        }
    }
}

/// State-machine position of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyMode {
    /// Unalerted patrol enemy following its route.
    Patrolling,
    /// Unalerted chase enemy holding position.
    Idle,
    /// Alerted enemy stepping toward the player.
    Chasing,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub position: Position,
    /// Direction of the last successful step, if any.
    pub last_move: Option<Direction>,
    /// Remaining health.
    pub health: u32,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Behavioural family of the enemy.
    pub kind: EnemyKind,
    /// Current state-machine mode.
    pub mode: EnemyMode,
    /// Cell currently occupied by the enemy.
    pub position: Position,
    /// Direction of the last successful step, if any.
    pub last_move: Option<Direction>,
    /// Whether the enemy has heard noise during this level.
    pub alerted: bool,
}

impl EnemySnapshot {
    /// Symbol used to draw the enemy.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.kind.symbol()
    }
}

/// Read-only snapshot describing all enemies within the level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Returns the snapshot for the provided enemy, if present.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        move_marker, Direction, EnemyId, EnemyKind, EnemyMode, EnemySnapshot, EnemyView, Position,
        Terrain,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, -1);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn from_delta_accepts_only_cardinal_unit_vectors() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn step_follows_screen_coordinates() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.step(Direction::Up), Position::new(3, 2));
        assert_eq!(origin.step(Direction::Down), Position::new(3, 4));
        assert_eq!(origin.step(Direction::Left), Position::new(2, 3));
        assert_eq!(origin.step(Direction::Right), Position::new(4, 3));
    }

    #[test]
    fn move_marker_is_blank_before_first_move() {
        assert_eq!(move_marker(None), ' ');
        assert_eq!(move_marker(Some(Direction::Down)), 'v');
    }

    #[test]
    fn terrain_symbols_map_both_ways() {
        for symbol in ['#', '.', 'E', ' ', '~'] {
            assert_eq!(Terrain::from_symbol(symbol).symbol(), symbol);
        }
        assert!(!Terrain::Wall.is_walkable());
        assert!(Terrain::Decoration(' ').is_walkable());
        assert!(Terrain::Exit.is_walkable());
    }

    #[test]
    fn enemy_view_orders_snapshots_by_id() {
        let snapshot = |id: u32| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Patrol,
            mode: EnemyMode::Patrolling,
            position: Position::new(1, 1),
            last_move: None,
            alerted: false,
        };

        assert!(EnemyView::default().is_empty());
        let view = EnemyView::from_snapshots(vec![snapshot(2), snapshot(0)]);
        assert!(!view.is_empty());
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(EnemyId::new(2)).map(|enemy| enemy.id), Some(EnemyId::new(2)));
        let ids: Vec<EnemyId> = view.into_vec().iter().map(|enemy| enemy.id).collect();
        assert_eq!(ids, vec![EnemyId::new(0), EnemyId::new(2)]);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&EnemyKind::Chase);
        assert_round_trip(&Position::new(-2, 9));
    }
}
