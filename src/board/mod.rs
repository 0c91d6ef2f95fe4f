//! Board rules engine: grid state, win detection, coordinate mapping.

pub mod logic;
pub mod types;

pub use logic::{Board, BoardGeometry};
pub use types::{
    empty_grid, BoardState, Direction, DirectionCount, DirectionPair, Position, StoneColor,
    DIRECTION_PAIRS,
};
