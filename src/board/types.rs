//! Core board data types shared by the rules engine, the search, and the server.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stone color. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneColor {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

impl StoneColor {
    pub fn opponent(self) -> Self {
        match self {
            StoneColor::Black => StoneColor::White,
            StoneColor::White => StoneColor::Black,
        }
    }
}

impl fmt::Display for StoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoneColor::Black => write!(f, "B"),
            StoneColor::White => write!(f, "W"),
        }
    }
}

/// Board position as (row, col), 0-indexed.
pub type Position = (usize, usize);

/// Unit step as (row delta, col delta).
pub type Direction = (i32, i32);

/// A direction and its opposite, scanned together through one stone.
pub type DirectionPair = (Direction, Direction);

/// The four axes a winning line can lie on: vertical, horizontal, both diagonals.
pub const DIRECTION_PAIRS: [DirectionPair; 4] = [
    ((1, 0), (-1, 0)),
    ((0, 1), (0, -1)),
    ((1, 1), (-1, -1)),
    ((-1, 1), (1, -1)),
];

/// Square grid of optional stones.
pub type BoardState = Vec<Vec<Option<StoneColor>>>;

/// Create an empty `size` x `size` grid.
pub fn empty_grid(size: usize) -> BoardState {
    vec![vec![None; size]; size]
}

/// Result of counting along one direction from a stone: the run length past the
/// origin, and whether the cell immediately beyond the run is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionCount {
    pub stones: u32,
    pub open: bool,
}
