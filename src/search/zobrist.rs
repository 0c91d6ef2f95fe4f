//! Incremental 64-bit board fingerprint.
//!
//! One random key per (row, col, color); the running fingerprint is the XOR of
//! the keys of every placed stone, so apply and undo are the same toggle and
//! move order never matters.

use crate::board::{Position, StoneColor};
use rand::Rng;

pub struct ZobristHash {
    /// Keys indexed by `row * board_size + col`, one per color.
    table: Vec<[u64; 2]>,
    board_size: usize,
    current: u64,
}

impl ZobristHash {
    pub fn new(board_size: usize) -> Self {
        Self::with_rng(board_size, &mut rand::thread_rng())
    }

    /// Build the key table from a caller-supplied RNG (deterministic in tests).
    pub fn with_rng<R: Rng>(board_size: usize, rng: &mut R) -> Self {
        let table = (0..board_size * board_size)
            .map(|_| [rng.gen::<u64>(), rng.gen::<u64>()])
            .collect();
        Self {
            table,
            board_size,
            current: 0,
        }
    }

    fn color_index(color: StoneColor) -> usize {
        match color {
            StoneColor::Black => 0,
            StoneColor::White => 1,
        }
    }

    /// Toggle a stone into the fingerprint.
    pub fn apply_move(&mut self, (row, col): Position, color: StoneColor) {
        self.current ^= self.table[row * self.board_size + col][Self::color_index(color)];
    }

    /// Toggle a stone back out. XOR is self-inverse, so this is `apply_move`;
    /// the caller must pass the same (position, color) it applied.
    pub fn undo_move(&mut self, pos: Position, color: StoneColor) {
        self.apply_move(pos, color);
    }

    pub fn hash(&self) -> u64 {
        self.current
    }

    /// Zero the fingerprint for a new game.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
