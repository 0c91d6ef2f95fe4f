//! Player abstraction: one contract over human input, computer search, and
//! remote socket input.
//!
//! Human and remote players suspend on a single-slot handoff resolved by an
//! external event; the computer player runs the search engine after a short
//! thinking delay. The orchestrator only distinguishes kinds to decide whether
//! to surface a thinking indicator.

use super::types::{GameOutcome, PlayerInfo, PlayerKind};
use crate::board::{Board, Position, StoneColor};
use crate::constants::AI_THINK_DELAY_MS;
use crate::search::SearchEngine;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Single-producer/single-consumer handoff for one awaited move.
///
/// `wait` installs a fresh sender; `submit` resolves it; `cancel` clears the
/// slot without resolving, which surfaces to the waiter as "no move". At most
/// one wait is outstanding at a time.
#[derive(Clone, Default)]
pub struct MoveSlot {
    inner: Arc<Mutex<Option<oneshot::Sender<Option<Position>>>>>,
}

impl MoveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend until a move is submitted or the wait is cancelled.
    pub async fn wait(&self) -> Option<Position> {
        let (tx, rx) = oneshot::channel();
        {
            let mut slot = self.inner.lock().expect("move slot poisoned");
            *slot = Some(tx);
        }
        rx.await.unwrap_or(None)
    }

    /// Resolve the pending wait, if any. Returns whether a waiter consumed it.
    pub fn submit(&self, pos: Position) -> bool {
        let sender = self.inner.lock().expect("move slot poisoned").take();
        match sender {
            Some(tx) => tx.send(Some(pos)).is_ok(),
            None => false,
        }
    }

    /// Drop the pending sender without resolving it; the waiter observes
    /// "no move".
    pub fn cancel(&self) {
        self.inner.lock().expect("move slot poisoned").take();
    }

    pub fn is_waiting(&self) -> bool {
        self.inner.lock().expect("move slot poisoned").is_some()
    }
}

/// Local human: resolved by a routed board click.
pub struct HumanPlayer {
    pub info: PlayerInfo,
    slot: MoveSlot,
}

impl HumanPlayer {
    pub fn new(info: PlayerInfo) -> Self {
        Self {
            info: PlayerInfo {
                kind: PlayerKind::Human,
                ..info
            },
            slot: MoveSlot::new(),
        }
    }
}

/// Computer: thinks for a moment, then runs the search synchronously.
pub struct ComputerPlayer {
    pub info: PlayerInfo,
    engine: SearchEngine,
    think_delay: Duration,
}

impl ComputerPlayer {
    pub fn new(info: PlayerInfo, board_size: usize, color: StoneColor, depth: u32) -> Self {
        Self {
            info: PlayerInfo {
                kind: PlayerKind::Ai,
                ..info
            },
            engine: SearchEngine::new(board_size, color, depth),
            think_delay: Duration::from_millis(AI_THINK_DELAY_MS),
        }
    }

    pub fn search_depth(&self) -> u32 {
        self.engine.depth()
    }
}

/// Remote participant: resolved by inbound wire-protocol move notifications.
pub struct RemotePlayer {
    pub info: PlayerInfo,
    slot: MoveSlot,
}

impl RemotePlayer {
    pub fn new(info: PlayerInfo) -> Self {
        Self {
            info,
            slot: MoveSlot::new(),
        }
    }
}

pub enum Player {
    Human(HumanPlayer),
    Computer(ComputerPlayer),
    Remote(RemotePlayer),
}

impl Player {
    pub fn human(info: PlayerInfo) -> Self {
        Player::Human(HumanPlayer::new(info))
    }

    pub fn computer(info: PlayerInfo, board_size: usize, color: StoneColor, depth: u32) -> Self {
        Player::Computer(ComputerPlayer::new(info, board_size, color, depth))
    }

    pub fn remote(info: PlayerInfo) -> Self {
        Player::Remote(RemotePlayer::new(info))
    }

    pub fn info(&self) -> &PlayerInfo {
        match self {
            Player::Human(p) => &p.info,
            Player::Computer(p) => &p.info,
            Player::Remote(p) => &p.info,
        }
    }

    /// Whether the thinking indicator applies while this player moves.
    pub fn is_computer(&self) -> bool {
        matches!(self, Player::Computer(_))
    }

    /// Input slot for externally-resolved players, `None` for the computer.
    pub fn slot(&self) -> Option<&MoveSlot> {
        match self {
            Player::Human(p) => Some(&p.slot),
            Player::Remote(p) => Some(&p.slot),
            Player::Computer(_) => None,
        }
    }

    /// Produce this player's next move, suspending until one is available.
    /// Returns `None` when the wait was cancelled (reset, game end, disconnect).
    pub async fn get_move(&mut self, board: &mut Board) -> Option<Position> {
        match self {
            Player::Human(p) => p.slot.wait().await,
            Player::Remote(p) => p.slot.wait().await,
            Player::Computer(p) => {
                tokio::time::sleep(p.think_delay).await;
                p.engine.find_best_move(board)
            }
        }
    }

    pub fn on_turn_start(&mut self) {}

    /// Game over: externally-resolved players drop any pending wait.
    pub fn on_game_end(&mut self, _outcome: GameOutcome) {
        if let Some(slot) = self.slot() {
            slot.cancel();
        }
    }

    /// Mirror a real game move so a computer player's fingerprint tracks the
    /// live board.
    pub fn notify_move(&mut self, pos: Position, color: StoneColor) {
        if let Player::Computer(p) = self {
            p.engine.notify_move(pos, color);
        }
    }

    /// New game: cancel pending waits and clear computer search state.
    pub fn reset(&mut self) {
        match self {
            Player::Computer(p) => p.engine.reset(),
            Player::Human(p) => p.slot.cancel(),
            Player::Remote(p) => p.slot.cancel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(kind: PlayerKind) -> PlayerInfo {
        PlayerInfo::new("p1", "Tester", kind)
    }

    #[tokio::test]
    async fn test_slot_submit_resolves_wait() {
        let slot = MoveSlot::new();
        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.wait().await })
        };

        // Let the waiter install its sender.
        tokio::task::yield_now().await;
        assert!(slot.is_waiting());
        assert!(slot.submit((7, 7)));

        assert_eq!(waiter.await.unwrap(), Some((7, 7)));
        assert!(!slot.is_waiting());
    }

    #[tokio::test]
    async fn test_slot_submit_without_waiter_is_ignored() {
        let slot = MoveSlot::new();
        assert!(!slot.submit((0, 0)));
    }

    #[tokio::test]
    async fn test_slot_cancel_resolves_to_none() {
        let slot = MoveSlot::new();
        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.wait().await })
        };

        tokio::task::yield_now().await;
        slot.cancel();
        assert_eq!(waiter.await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_computer_player_moves_after_delay() {
        let mut player = Player::computer(info(PlayerKind::Ai), 15, StoneColor::White, 2);
        let mut board = Board::new(15);
        let best = player.get_move(&mut board).await;
        assert_eq!(best, Some((7, 7)));
    }

    #[test]
    fn test_kinds_are_forced() {
        let human = Player::human(info(PlayerKind::Ai));
        assert_eq!(human.info().kind, PlayerKind::Human);

        let computer = Player::computer(info(PlayerKind::Human), 15, StoneColor::Black, 1);
        assert_eq!(computer.info().kind, PlayerKind::Ai);
        assert!(computer.is_computer());
        assert!(computer.slot().is_none());
    }

    #[tokio::test]
    async fn test_game_end_cancels_pending_wait() {
        let mut player = Player::human(info(PlayerKind::Human));
        let slot = player.slot().unwrap().clone();

        let waiter = tokio::spawn(async move { slot.wait().await });
        tokio::task::yield_now().await;

        player.on_game_end(GameOutcome::Draw);
        assert_eq!(waiter.await.unwrap(), None);
    }
}
