//! Minimax search with alpha-beta pruning over the live game board.
//!
//! The engine searches by mutating the same `Board` the game plays on, so
//! every speculative placement is paired with an undo before returning: the
//! board and the position fingerprint always leave a search exactly as they
//! entered it. Board mutation and fingerprint updates go through one pair of
//! helpers (`place`/`unplace`) so the two can never drift apart.

use super::table::{BoundKind, TranspositionTable};
use super::zobrist::ZobristHash;
use crate::board::{Board, Position, StoneColor, DIRECTION_PAIRS};
use crate::constants::TRANSPOSITION_CAPACITY;
use std::collections::HashSet;

/// Score of a run of 5+ anywhere in a pattern evaluation.
const SCORE_FIVE: i32 = 500_000;
/// Terminal score for a win found inside the minimax tree.
const WIN_SCORE: i32 = 1000;

/// Fixed pattern table: the value of a run of `count` stones with
/// `open_ends` empty cells beyond its two ends.
pub fn pattern_score(count: u32, open_ends: u32) -> i32 {
    if count >= 5 {
        return SCORE_FIVE;
    }
    match (count, open_ends) {
        (4, 2) => 5_000,
        (4, 1) => 1_000,
        (4, _) => 0,
        (3, 2) => 500,
        (3, 1) => 100,
        (3, _) => 0,
        (2, 2) => 50,
        (2, 1) => 10,
        (2, _) => 0,
        _ => 1,
    }
}

pub struct SearchEngine {
    color: StoneColor,
    depth: u32,
    hasher: ZobristHash,
    table: TranspositionTable,
}

impl SearchEngine {
    pub fn new(board_size: usize, color: StoneColor, depth: u32) -> Self {
        Self {
            color,
            depth: depth.max(1),
            hasher: ZobristHash::new(board_size),
            table: TranspositionTable::new(TRANSPOSITION_CAPACITY),
        }
    }

    pub fn color(&self) -> StoneColor {
        self.color
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Mirror a real game move into the fingerprint. The board itself is
    /// mutated by the orchestrator; this keeps the cache key in sync with it.
    pub fn notify_move(&mut self, pos: Position, color: StoneColor) {
        self.hasher.apply_move(pos, color);
    }

    /// Mirror the revert of a real game move.
    pub fn undo_notify(&mut self, pos: Position, color: StoneColor) {
        self.hasher.undo_move(pos, color);
    }

    /// Forget everything for a new game.
    pub fn reset(&mut self) {
        self.hasher.reset();
        self.table.clear();
    }

    /// Current position fingerprint.
    pub fn fingerprint(&self) -> u64 {
        self.hasher.hash()
    }

    /// Pick the best move for this engine's color at the configured depth.
    ///
    /// A candidate that wins on the spot is returned without deeper search.
    pub fn find_best_move(&mut self, board: &mut Board) -> Option<Position> {
        let mut moves = self.candidate_moves(board);
        if moves.is_empty() {
            return None;
        }
        self.order_moves(board, &mut moves);

        let mut best_score = i32::MIN;
        let mut best_move = None;
        let mut alpha = i32::MIN;
        let beta = i32::MAX;

        for pos in moves {
            if !self.place(board, pos, self.color) {
                continue;
            }

            if board.check_win(pos).is_some() {
                self.unplace(board, pos, self.color);
                return Some(pos);
            }

            let score = self.minimax(board, self.depth.saturating_sub(1), false, alpha, beta);
            self.unplace(board, pos, self.color);

            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            alpha = alpha.max(score);
        }

        best_move
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        let hash = self.hasher.hash();
        if let Some(score) = self.table.lookup(hash, depth, alpha, beta) {
            return score;
        }

        if depth == 0 {
            return self.heuristic(board);
        }

        let mut moves = self.candidate_moves(board);
        if moves.is_empty() {
            return self.heuristic(board);
        }
        self.order_moves(board, &mut moves);

        // A best move cached from an earlier visit is searched first.
        if let Some(hint) = self.table.get_best_move(hash) {
            if let Some(idx) = moves.iter().position(|&m| m == hint) {
                moves.remove(idx);
                moves.insert(0, hint);
            }
        }

        let alpha_orig = alpha;
        let beta_orig = beta;
        let mover = if maximizing {
            self.color
        } else {
            self.color.opponent()
        };

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for pos in moves {
            if !self.place(board, pos, mover) {
                continue;
            }

            if board.check_win(pos).is_some() {
                self.unplace(board, pos, mover);
                return if maximizing { WIN_SCORE } else { -WIN_SCORE };
            }

            let score = self.minimax(board, depth - 1, !maximizing, alpha, beta);
            self.unplace(board, pos, mover);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(pos);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(pos);
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        let bound = if best_score <= alpha_orig {
            BoundKind::UpperBound
        } else if best_score >= beta_orig {
            BoundKind::LowerBound
        } else {
            BoundKind::Exact
        };
        self.table.store(hash, best_score, depth, bound, best_move);

        best_score
    }

    /// Legal move generation: the lone center cell on an empty board,
    /// otherwise every empty cell adjacent to a stone, falling back to all
    /// empty cells if that set somehow comes up empty.
    pub fn candidate_moves(&self, board: &Board) -> Vec<Position> {
        let size = board.size();
        let mut near_stones = HashSet::new();
        let mut found_stone = false;

        for row in 0..size {
            for col in 0..size {
                if board.is_empty((row, col)) {
                    continue;
                }
                found_stone = true;
                for d_row in -1i32..=1 {
                    for d_col in -1i32..=1 {
                        let n_row = row as i32 + d_row;
                        let n_col = col as i32 + d_col;
                        if n_row < 0 || n_col < 0 {
                            continue;
                        }
                        let neighbor = (n_row as usize, n_col as usize);
                        if board.is_empty(neighbor) {
                            near_stones.insert(neighbor);
                        }
                    }
                }
            }
        }

        if !found_stone {
            return vec![(size / 2, size / 2)];
        }

        if !near_stones.is_empty() {
            let mut moves: Vec<Position> = near_stones.into_iter().collect();
            moves.sort_unstable();
            return moves;
        }

        let mut moves = Vec::new();
        for row in 0..size {
            for col in 0..size {
                if board.is_empty((row, col)) {
                    moves.push((row, col));
                }
            }
        }
        moves
    }

    /// Sort candidates so the most forcing moves are searched first.
    fn order_moves(&mut self, board: &mut Board, moves: &mut Vec<Position>) {
        let mut scored = Vec::with_capacity(moves.len());
        for &pos in moves.iter() {
            scored.push((pos, self.score_move(board, pos)));
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        moves.clear();
        moves.extend(scored.into_iter().map(|(pos, _)| pos));
    }

    /// Ordering score for a candidate: what the engine gains by playing there
    /// plus what the opponent would gain, so strong blocks rank with strong
    /// attacks.
    fn score_move(&mut self, board: &mut Board, pos: Position) -> i32 {
        self.threat_score(board, pos, self.color) + self.threat_score(board, pos, self.color.opponent())
    }

    /// Best pattern score across the four axes if `color` played at `pos`,
    /// measured by speculatively placing and undoing the stone.
    fn threat_score(&mut self, board: &mut Board, pos: Position, color: StoneColor) -> i32 {
        if !self.place(board, pos, color) {
            return 0;
        }

        let mut best = 0;
        for (forward, backward) in DIRECTION_PAIRS {
            let ahead = board.count_in_direction(pos, forward);
            let behind = board.count_in_direction(pos, backward);
            let count = ahead.stones + 1 + behind.stones;
            let open_ends = u32::from(ahead.open) + u32::from(behind.open);
            best = best.max(pattern_score(count, open_ends));
        }

        self.unplace(board, pos, color);
        best
    }

    /// Static evaluation: the engine's positional total minus the opponent's.
    fn heuristic(&self, board: &Board) -> i32 {
        let mut own = 0;
        let mut opponent = 0;

        for row in 0..board.size() {
            for col in 0..board.size() {
                match board.stone_at((row, col)) {
                    Some(color) if color == self.color => own += self.cell_score(board, (row, col)),
                    Some(_) => opponent += self.cell_score(board, (row, col)),
                    None => {}
                }
            }
        }

        own - opponent
    }

    /// Sum of the pattern scores of the four runs through one stone.
    fn cell_score(&self, board: &Board, pos: Position) -> i32 {
        let mut score = 0;
        for (forward, backward) in DIRECTION_PAIRS {
            let ahead = board.count_in_direction(pos, forward);
            let behind = board.count_in_direction(pos, backward);
            let count = ahead.stones + 1 + behind.stones;
            let open_ends = u32::from(ahead.open) + u32::from(behind.open);
            score += pattern_score(count, open_ends);
        }
        score
    }

    /// Place a stone and toggle it into the fingerprint in one step.
    fn place(&mut self, board: &mut Board, pos: Position, color: StoneColor) -> bool {
        if board.place(pos, color).is_err() {
            return false;
        }
        self.hasher.apply_move(pos, color);
        true
    }

    /// Revert a stone placed by `place`, board and fingerprint together.
    fn unplace(&mut self, board: &mut Board, pos: Position, color: StoneColor) {
        board.remove(pos);
        self.hasher.undo_move(pos, color);
    }
}
