//! Static terrain plus the transient noise overlay that enemies listen to.

use stealth_maze_core::{Position, Terrain, NOISE_LIFETIME, NOISE_SYMBOL};

/// Dense terrain grid with a per-cell noise countdown.
///
/// Terrain and noise live in two parallel row-major buffers. A countdown of
/// zero means the cell is silent; any positive value means the cell is
/// currently noisy and displays [`NOISE_SYMBOL`]. Every query accepts
/// positions outside the grid and answers with a fixed "nothing there" value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    noise: Vec<u8>,
}

impl Grid {
    /// Builds a rectangular room enclosed by walls with an open floor.
    ///
    /// Zero-sized dimensions produce an empty grid on which nothing is
    /// walkable.
    #[must_use]
    pub fn bordered(width: u32, height: u32) -> Self {
        let mut grid = Self::filled(width, height, Terrain::Floor);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    grid.set_terrain(x, y, Terrain::Wall);
                }
            }
        }
        grid
    }

    /// Builds a grid from a character layout, one symbol per cell.
    ///
    /// `#` is a wall, `.` floor and `E` the exit; any other character becomes
    /// walkable decoration. Lines longer than `width` are truncated, extra
    /// lines are ignored and cells the layout does not reach stay floor.
    #[must_use]
    pub fn parse(layout: &str, width: u32, height: u32) -> Self {
        let mut grid = Self::filled(width, height, Terrain::Floor);
        for (y, line) in (0..height).zip(layout.lines()) {
            for (x, symbol) in (0..width).zip(line.chars()) {
                grid.set_terrain(x, y, Terrain::from_symbol(symbol));
            }
        }
        grid
    }

    /// Builds a grid from an optional layout, falling back to a bordered room.
    #[must_use]
    pub fn from_source(layout: Option<&str>, width: u32, height: u32) -> Self {
        match layout {
            Some(layout) => Self::parse(layout, width, height),
            None => Self::bordered(width, height),
        }
    }

    fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let (width, height) = if capacity == 0 { (0, 0) } else { (width, height) };
        Self {
            width,
            height,
            terrain: vec![terrain; capacity],
            noise: vec![0; capacity],
        }
    }

    fn set_terrain(&mut self, x: u32, y: u32, terrain: Terrain) {
        let width = usize::try_from(self.width).unwrap_or(0);
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(slot) = self.terrain.get_mut(y * width + x) {
            *slot = terrain;
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Terrain stored at the position, or `None` outside the grid.
    #[must_use]
    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.index(position)
            .and_then(|index| self.terrain.get(index).copied())
    }

    /// True iff the position is inside the grid and not a wall.
    #[must_use]
    pub fn is_walkable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(Terrain::is_walkable)
    }

    /// True iff the position is inside the grid and holds the exit.
    #[must_use]
    pub fn is_exit(&self, position: Position) -> bool {
        self.terrain(position) == Some(Terrain::Exit)
    }

    /// Remaining noise countdown at the position; zero when silent or outside.
    #[must_use]
    pub fn noise(&self, position: Position) -> u8 {
        self.index(position)
            .and_then(|index| self.noise.get(index).copied())
            .unwrap_or(0)
    }

    /// Reports whether the position currently carries an active noise marker.
    #[must_use]
    pub fn is_noisy(&self, position: Position) -> bool {
        self.noise(position) > 0
    }

    /// Display symbol of the cell: the noise overlay wins over terrain.
    ///
    /// Positions outside the grid render as a blank.
    #[must_use]
    pub fn symbol(&self, position: Position) -> char {
        match self.terrain(position) {
            None => ' ',
            Some(_) if self.is_noisy(position) => NOISE_SYMBOL,
            Some(terrain) => terrain.symbol(),
        }
    }

    /// Collects every noisy cell in row-major order.
    #[must_use]
    pub fn noisy_cells(&self) -> Vec<Position> {
        self.noise
            .iter()
            .enumerate()
            .filter(|(_, countdown)| **countdown > 0)
            .filter_map(|(index, _)| self.position_of(index))
            .collect()
    }

    /// Starts a fresh noise countdown on the cell.
    ///
    /// The exit is never overwritten and positions outside the grid are
    /// ignored. Returns whether the cell was marked.
    pub fn mark_noise(&mut self, position: Position) -> bool {
        let Some(index) = self.index(position) else {
            return false;
        };
        if self.terrain.get(index) == Some(&Terrain::Exit) {
            return false;
        }
        match self.noise.get_mut(index) {
            Some(countdown) => {
                *countdown = NOISE_LIFETIME;
                true
            }
            None => false,
        }
    }

    /// Ticks every noise countdown down by one.
    ///
    /// Cells whose countdown reaches zero revert to plain floor and are
    /// appended to `faded`.
    pub fn decay_noise(&mut self, faded: &mut Vec<Position>) {
        for index in 0..self.noise.len() {
            let countdown = &mut self.noise[index];
            if *countdown == 0 {
                continue;
            }
            *countdown -= 1;
            if *countdown > 0 {
                continue;
            }
            if let Some(terrain) = self.terrain.get_mut(index) {
                if matches!(terrain, Terrain::Decoration(_)) {
                    *terrain = Terrain::Floor;
                }
            }
            if let Some(position) = self.position_of(index) {
                faded.push(position);
            }
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = u32::try_from(position.x()).ok()?;
        let y = u32::try_from(position.y()).ok()?;
        if x < self.width && y < self.height {
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn position_of(&self, index: usize) -> Option<Position> {
        let width = usize::try_from(self.width).ok().filter(|width| *width > 0)?;
        let x = i32::try_from(index % width).ok()?;
        let y = i32::try_from(index / width).ok()?;
        Some(Position::new(x, y))
    }
}
