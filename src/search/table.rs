//! Bounded transposition cache keyed by the Zobrist fingerprint.
//!
//! Entries record a score, the depth it was computed at, and which alpha-beta
//! bound the score represents. Deeper results are more trustworthy: a stored
//! entry is only replaced by an equal-or-deeper one, and eviction discards the
//! shallow half first.

use crate::board::Position;
use std::collections::HashMap;

/// How a cached score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// The search completed inside the window; the score is exact.
    Exact,
    /// The score is at least this value (beta cutoff).
    LowerBound,
    /// The score is at most this value (fail-low).
    UpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub hash: u64,
    pub score: i32,
    pub depth: u32,
    pub bound: BoundKind,
    pub best_move: Option<Position>,
}

pub struct TranspositionTable {
    entries: HashMap<u64, TableEntry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(2),
        }
    }

    /// Record a search result. A shallower result never overwrites a deeper
    /// one for the same fingerprint.
    pub fn store(
        &mut self,
        hash: u64,
        score: i32,
        depth: u32,
        bound: BoundKind,
        best_move: Option<Position>,
    ) {
        if let Some(existing) = self.entries.get(&hash) {
            if existing.hash == hash && existing.depth > depth {
                return;
            }
        }

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&hash) {
            self.evict_shallow();
        }

        self.entries.insert(
            hash,
            TableEntry {
                hash,
                score,
                depth,
                bound,
                best_move,
            },
        );
    }

    /// Drop everything but the deepest half of the table.
    fn evict_shallow(&mut self) {
        let mut entries: Vec<TableEntry> = self.entries.drain().map(|(_, e)| e).collect();
        entries.sort_by(|a, b| b.depth.cmp(&a.depth));
        entries.truncate(self.capacity / 2);
        self.entries = entries.into_iter().map(|e| (e.hash, e)).collect();
    }

    /// Return a cached score usable at this depth and window, if any.
    ///
    /// An entry is usable when it was searched at least as deep as requested,
    /// its stored fingerprint literally matches (collision spot-check), and its
    /// bound kind allows reuse: exact always, a lower bound only when it would
    /// already cause a beta cutoff, an upper bound only when it cannot improve
    /// alpha.
    pub fn lookup(&self, hash: u64, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.entries.get(&hash)?;

        if entry.hash != hash || entry.depth < depth {
            return None;
        }

        match entry.bound {
            BoundKind::Exact => Some(entry.score),
            BoundKind::LowerBound if entry.score >= beta => Some(entry.score),
            BoundKind::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Best move from a previous search of this position, for move ordering.
    pub fn get_best_move(&self, hash: u64) -> Option<Position> {
        self.entries
            .get(&hash)
            .filter(|entry| entry.hash == hash)
            .and_then(|entry| entry.best_move)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
