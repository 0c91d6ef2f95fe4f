//! Local session orchestrator: a self-driving turn loop over two players.
//!
//! The loop awaits the active player's move, applies it to the board, records
//! it, checks terminal conditions, flips the turn, and continues until the
//! game ends or a pending wait is cancelled. Board clicks are routed through a
//! `SessionInput` handle and only land if a player is currently awaiting one.

use super::player::{MoveSlot, Player};
use super::types::{
    GameMode, GameOutcome, MoveRecord, PlayerInfo, PlayerKind, SessionEvent, SessionSnapshot,
    SessionStatus,
};
use crate::board::{Board, BoardGeometry, Position, StoneColor};
use crate::constants::{BOARD_MARGIN, BOARD_SIZE, CELL_SIZE};
use crate::services::{GameRecord, GameReporter, RecordedOutcome};
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub board_size: usize,
    pub cell_size: f64,
    pub margin: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            cell_size: CELL_SIZE,
            margin: BOARD_MARGIN,
        }
    }
}

impl SessionConfig {
    fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.board_size, self.cell_size, self.margin)
    }
}

/// Handle for feeding external input into a running session.
#[derive(Clone)]
pub struct SessionInput {
    slots: Vec<MoveSlot>,
    geometry: BoardGeometry,
}

impl SessionInput {
    /// Route a move to whichever player is currently awaiting one.
    /// Ignored (returns false) when nobody is waiting.
    pub fn submit_move(&self, pos: Position) -> bool {
        self.slots.iter().any(|slot| slot.submit(pos))
    }

    /// Route a raw click: mapped to the nearest intersection, then submitted.
    pub fn submit_click(&self, x: f64, y: f64) -> bool {
        match self.geometry.pixel_to_grid(x, y) {
            Some(pos) => self.submit_move(pos),
            None => false,
        }
    }

    /// Whether any player is currently awaiting an external move.
    pub fn is_awaiting_move(&self) -> bool {
        self.slots.iter().any(|slot| slot.is_waiting())
    }

    /// Cancel every pending wait; the turn loop observes "no move" and stops.
    pub fn cancel_all(&self) {
        for slot in &self.slots {
            slot.cancel();
        }
    }
}

pub struct GameSession {
    session_id: String,
    config: SessionConfig,
    mode: GameMode,
    board: Board,
    black: Option<Player>,
    white: Option<Player>,
    current_turn: StoneColor,
    move_history: Vec<MoveRecord>,
    status: SessionStatus,
    winner: Option<GameOutcome>,
    ai_depth: u32,
    created_at_ms: i64,
    events: mpsc::UnboundedSender<SessionEvent>,
    reporter: Option<Box<dyn GameReporter + Send + Sync>>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let session = Self {
            session_id: format!("game_{}", Uuid::new_v4()),
            config,
            mode: GameMode::VsAi,
            board: Board::with_geometry(config.geometry()),
            black: None,
            white: None,
            current_turn: StoneColor::Black,
            move_history: Vec::new(),
            status: SessionStatus::Waiting,
            winner: None,
            ai_depth: 0,
            created_at_ms: Utc::now().timestamp_millis(),
            events,
            reporter: None,
        };
        (session, events_rx)
    }

    /// Attach a stats recorder; finished vs-ai games are reported through it.
    pub fn set_reporter(&mut self, reporter: Box<dyn GameReporter + Send + Sync>) {
        self.reporter = Some(reporter);
    }

    /// Configure a fresh game: reset the board, build both players from their
    /// declared kinds, and hand back the input handle. Black moves first.
    pub fn setup_game(
        &mut self,
        mode: GameMode,
        black_info: PlayerInfo,
        white_info: PlayerInfo,
        ai_depth: u32,
    ) -> SessionInput {
        self.session_id = format!("game_{}", Uuid::new_v4());
        self.mode = mode;
        self.board = Board::with_geometry(self.config.geometry());
        self.black = Some(self.create_player(black_info, StoneColor::Black, ai_depth));
        self.white = Some(self.create_player(white_info, StoneColor::White, ai_depth));
        self.current_turn = StoneColor::Black;
        self.move_history.clear();
        self.status = SessionStatus::Playing;
        self.winner = None;
        self.ai_depth = ai_depth;
        self.created_at_ms = Utc::now().timestamp_millis();

        if let Some(black) = &self.black {
            let _ = self.events.send(SessionEvent::TurnChanged {
                turn: StoneColor::Black,
                player: black.info().clone(),
            });
        }

        self.input()
    }

    fn create_player(&self, info: PlayerInfo, color: StoneColor, ai_depth: u32) -> Player {
        match info.kind {
            PlayerKind::Ai => Player::computer(info, self.config.board_size, color, ai_depth),
            PlayerKind::Human => Player::human(info),
        }
    }

    /// Input handle for the currently configured players.
    pub fn input(&self) -> SessionInput {
        let slots = [&self.black, &self.white]
            .into_iter()
            .flatten()
            .filter_map(|player| player.slot().cloned())
            .collect();
        SessionInput {
            slots,
            geometry: self.config.geometry(),
        }
    }

    /// Drive the turn loop until the game finishes or a wait is cancelled.
    /// Returns the outcome, or `None` if the session was abandoned.
    pub async fn run(&mut self) -> Option<GameOutcome> {
        while self.status == SessionStatus::Playing {
            let turn = self.current_turn;
            let player = match turn {
                StoneColor::Black => self.black.as_mut(),
                StoneColor::White => self.white.as_mut(),
            };
            let Some(player) = player else {
                return None;
            };

            player.on_turn_start();
            let thinking = player.is_computer();
            if thinking {
                let _ = self.events.send(SessionEvent::Thinking(true));
            }

            let mv = player.get_move(&mut self.board).await;

            if thinking {
                let _ = self.events.send(SessionEvent::Thinking(false));
            }

            let Some(pos) = mv else {
                return None;
            };
            self.apply_move(pos);
        }

        self.winner
    }

    /// Apply one move for the active color. An occupied or out-of-bounds cell
    /// is ignored; the loop simply re-awaits the same player.
    fn apply_move(&mut self, pos: Position) {
        let color = self.current_turn;
        if self.board.place(pos, color).is_err() {
            return;
        }

        // Keep computer fingerprints in sync with the live board.
        if let Some(black) = self.black.as_mut() {
            black.notify_move(pos, color);
        }
        if let Some(white) = self.white.as_mut() {
            white.notify_move(pos, color);
        }

        let record = MoveRecord {
            position: pos,
            player: color,
            move_number: self.move_history.len() as u32 + 1,
            timestamp_ms: Utc::now().timestamp_millis(),
        };
        self.move_history.push(record.clone());
        let _ = self.events.send(SessionEvent::MoveRecorded(record));

        if let Some(winner) = self.board.check_win(pos) {
            self.finish(GameOutcome::from_winner(winner));
            return;
        }
        if self.board.is_full() {
            self.finish(GameOutcome::Draw);
            return;
        }

        self.current_turn = color.opponent();
        let next = match self.current_turn {
            StoneColor::Black => self.black.as_ref(),
            StoneColor::White => self.white.as_ref(),
        };
        if let Some(next) = next {
            let _ = self.events.send(SessionEvent::TurnChanged {
                turn: self.current_turn,
                player: next.info().clone(),
            });
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.status = SessionStatus::Finished;
        self.winner = Some(outcome);

        if let Some(black) = self.black.as_mut() {
            black.on_game_end(outcome);
        }
        if let Some(white) = self.white.as_mut() {
            white.on_game_end(outcome);
        }

        let winner = outcome.winner().and_then(|color| {
            let seat = match color {
                StoneColor::Black => self.black.as_ref(),
                StoneColor::White => self.white.as_ref(),
            };
            seat.map(|player| player.info().clone())
        });
        let _ = self.events.send(SessionEvent::GameEnded { outcome, winner });

        self.report_outcome(outcome);
    }

    /// Record a finished vs-ai game through the stats collaborator, from the
    /// human's perspective.
    fn report_outcome(&self, outcome: GameOutcome) {
        let Some(reporter) = &self.reporter else {
            return;
        };
        if self.mode != GameMode::VsAi {
            return;
        }

        let seats = [
            (self.black.as_ref(), StoneColor::Black),
            (self.white.as_ref(), StoneColor::White),
        ];
        let human_color = seats
            .into_iter()
            .find_map(|(player, color)| player.filter(|p| !p.is_computer()).map(|_| color));
        let Some(human_color) = human_color else {
            return;
        };

        let recorded = match outcome.winner() {
            Some(color) if color == human_color => RecordedOutcome::Win,
            Some(_) => RecordedOutcome::Loss,
            None => RecordedOutcome::Draw,
        };
        let duration_ms = Utc::now().timestamp_millis() - self.created_at_ms;
        reporter.record_game(&GameRecord {
            search_depth: self.search_depth().unwrap_or(self.ai_depth),
            outcome: recorded,
            move_count: Some(self.move_history.len() as u32),
            duration_seconds: Some((duration_ms / 1000).max(0) as u64),
        });
    }

    fn search_depth(&self) -> Option<u32> {
        [&self.black, &self.white]
            .into_iter()
            .flatten()
            .find_map(|player| match player {
                Player::Computer(cp) => Some(cp.search_depth()),
                _ => None,
            })
    }

    /// Cancel pending waits and discard all game state except configuration.
    pub fn reset(&mut self) {
        if let Some(black) = self.black.as_mut() {
            black.reset();
        }
        if let Some(white) = self.white.as_mut() {
            white.reset();
        }
        self.board = Board::with_geometry(self.config.geometry());
        self.move_history.clear();
        self.current_turn = StoneColor::Black;
        self.status = SessionStatus::Waiting;
        self.winner = None;
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_turn(&self) -> StoneColor {
        self.current_turn
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.move_history.last()
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Full serializable view of the session, once players are configured.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let black = self.black.as_ref()?;
        let white = self.white.as_ref()?;
        Some(SessionSnapshot {
            session_id: self.session_id.clone(),
            mode: self.mode,
            player_black: black.info().clone(),
            player_white: white.info().clone(),
            current_turn: self.current_turn,
            move_history: self.move_history.clone(),
            status: self.status,
            winner: self.winner,
            created_at_ms: self.created_at_ms,
        })
    }
}
