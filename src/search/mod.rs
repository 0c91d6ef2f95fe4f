//! Adversarial search: Zobrist position hashing, a bounded transposition
//! cache, and depth-limited minimax with alpha-beta pruning.

pub mod engine;
pub mod table;
pub mod zobrist;

pub use engine::{pattern_score, SearchEngine};
pub use table::{BoundKind, TableEntry, TranspositionTable};
pub use zobrist::ZobristHash;
