//! Hex board geometry with offset coordinates
//!
//! Rows are staggered: odd rows sit half a cell to the right of even rows.
//!
//! ```text
//!  / \ / \ / \ / \
//! |0,0|1,0|2,0|3,0|
//!  \ / \ / \ / \ / \
//!   |0,1|1,1|2,1|3,1|
//!  / \ / \ / \ / \ /
//! |0,2|1,2|2,2|3,2|
//!  \ / \ / \ / \ /
//! ```

use crate::error::{HiveError, Result};
use crate::pieces::Piece;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Offset hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

/// Point of contact relative to a cell. `Origin` means on top of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Origin,
    West,
    NorthWest,
    NorthEast,
    East,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::Origin,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// The six sides of a cell, clockwise from west
    pub const AROUND: [Direction; 6] = [
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Origin => Direction::Origin,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
        }
    }
}

impl Cell {
    pub const ORIGIN: Cell = Cell::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn parity(&self) -> i32 {
        self.y.rem_euclid(2)
    }

    /// Adjacent cell in direction
    pub fn neighbor(&self, direction: Direction) -> Cell {
        let p = self.parity();
        let (x, y) = (self.x, self.y);
        match direction {
            Direction::Origin => *self,
            Direction::West => Cell::new(x - 1, y),
            Direction::NorthWest => Cell::new(x - 1 + p, y - 1),
            Direction::NorthEast => Cell::new(x + p, y - 1),
            Direction::East => Cell::new(x + 1, y),
            Direction::SouthEast => Cell::new(x + p, y + 1),
            Direction::SouthWest => Cell::new(x - 1 + p, y + 1),
        }
    }

    /// All six neighbors, clockwise from west. Index arithmetic on this
    /// order is used to find the two cells flanking a pair of neighbors.
    pub fn neighbors(&self) -> [Cell; 6] {
        Direction::AROUND.map(|d| self.neighbor(d))
    }

    /// Direction of the straight line from `self` through `other`, if any.
    /// The same cell gives `Origin`.
    pub fn line_direction(&self, other: Cell) -> Option<Direction> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;

        if dy == 0 {
            return Some(match dx {
                0 => Direction::Origin,
                d if d < 0 => Direction::West,
                _ => Direction::East,
            });
        }

        // Diagonals advance one row per step, so walk |dy| steps along each
        // candidate and see where we land
        let candidates = if dy < 0 {
            [Direction::NorthWest, Direction::NorthEast]
        } else {
            [Direction::SouthWest, Direction::SouthEast]
        };
        candidates.into_iter().find(|&dir| {
            let mut current = *self;
            for _ in 0..dy.abs() {
                current = current.neighbor(dir);
            }
            current == other
        })
    }
}

/// Sparse, growable grid of piece stacks.
///
/// Stack order is play order: the last element is the visible top piece.
/// The board stores pieces and grows; it does not enforce game rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// rows -> columns -> stack
    grid: Vec<Vec<Vec<Piece>>>,
    /// Grid indices of cell (0, 0)
    origin_x: i32,
    origin_y: i32,
    /// Where each placed piece is
    index: FxHashMap<Piece, Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: vec![vec![Vec::new()]],
            origin_x: 0,
            origin_y: 0,
            index: FxHashMap::default(),
        }
    }

    fn width(&self) -> usize {
        self.grid[0].len()
    }

    fn slot(&self, cell: Cell) -> Option<(usize, usize)> {
        let col = usize::try_from(self.origin_x + cell.x).ok()?;
        let row = usize::try_from(self.origin_y + cell.y).ok()?;
        (row < self.grid.len() && col < self.width()).then_some((row, col))
    }

    /// Grow the grid until it contains `cell`
    pub fn resize(&mut self, cell: Cell) {
        while self.origin_x + cell.x < 0 {
            for row in &mut self.grid {
                row.insert(0, Vec::new());
            }
            self.origin_x += 1;
        }
        while self.origin_x + cell.x >= self.width() as i32 {
            for row in &mut self.grid {
                row.push(Vec::new());
            }
        }
        while self.origin_y + cell.y < 0 {
            self.grid.insert(0, vec![Vec::new(); self.width()]);
            self.origin_y += 1;
        }
        while self.origin_y + cell.y >= self.grid.len() as i32 {
            self.grid.push(vec![Vec::new(); self.width()]);
        }
    }

    /// Put `piece` on top of the stack at `cell`
    pub fn place(&mut self, cell: Cell, piece: Piece) {
        self.resize(cell);
        if let Some((row, col)) = self.slot(cell) {
            self.grid[row][col].push(piece);
            self.index.insert(piece, cell);
        }
    }

    /// Take `piece` off the board, returning the cell it was in
    pub fn remove(&mut self, piece: Piece) -> Result<Cell> {
        let not_found = || HiveError::NotFound(piece.to_string());
        let cell = self.index.get(&piece).copied().ok_or_else(not_found)?;
        let (row, col) = self.slot(cell).ok_or_else(not_found)?;
        let stack = &mut self.grid[row][col];
        let pos = stack.iter().position(|&p| p == piece).ok_or_else(not_found)?;
        stack.remove(pos);
        self.index.remove(&piece);
        Ok(cell)
    }

    /// Stack at `cell`, bottom to top. Empty for cells never touched.
    pub fn get(&self, cell: Cell) -> &[Piece] {
        match self.slot(cell) {
            Some((row, col)) => &self.grid[row][col],
            None => &[],
        }
    }

    pub fn top(&self, cell: Cell) -> Option<Piece> {
        self.get(cell).last().copied()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.get(cell).is_empty()
    }

    pub fn locate(&self, piece: Piece) -> Option<Cell> {
        self.index.get(&piece).copied()
    }

    /// Neighbors of `cell` holding at least one piece, clockwise from west
    pub fn occupied_neighbors(&self, cell: Cell) -> Vec<Cell> {
        cell.neighbors()
            .into_iter()
            .filter(|&c| !self.is_free(c))
            .collect()
    }

    /// (min_x, min_y, max_x, max_y) of the grid
    pub fn boundaries(&self) -> (i32, i32, i32, i32) {
        let min_x = -self.origin_x;
        let min_y = -self.origin_y;
        (
            min_x,
            min_y,
            min_x + self.width() as i32 - 1,
            min_y + self.grid.len() as i32 - 1,
        )
    }

    /// Non-empty cells, row by row
    pub fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (min_x, min_y, _, _) = self.boundaries();
        self.grid.iter().enumerate().flat_map(move |(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, stack)| !stack.is_empty())
                .map(move |(col, _)| Cell::new(min_x + col as i32, min_y + row as i32))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
