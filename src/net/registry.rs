//! Server-side room registry: active rooms, invite-code index, and
//! connection-to-room index, owned by the server's lifecycle.
//!
//! The registry keeps its own board per room and re-validates every move
//! against it; clients never dictate outcomes. Win detection here is an
//! independent rendition of the run-counting algorithm, pinned against the
//! board engine's in `tests/win_detection_test.rs`.

use super::protocol::ServerMessage;
use crate::board::{empty_grid, BoardState, Position, StoneColor};
use crate::constants::INVITE_CODE_LENGTH;
use crate::error::GameError;
use crate::session::{PlayerInfo, SessionStatus};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Outbound side of one websocket connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: Uuid,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ConnectionHandle {
    pub fn new(id: Uuid, tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { id, tx }
    }

    /// Queue a message for delivery; a gone receiver is not an error.
    pub fn send(&self, msg: ServerMessage) {
        let _ = self.tx.send(msg);
    }
}

/// One occupied seat in a room.
#[derive(Debug, Clone)]
pub struct Seat {
    pub info: PlayerInfo,
    pub conn: ConnectionHandle,
}

/// One multiplayer game, owned by the registry.
#[derive(Debug)]
pub struct GameRoom {
    pub game_id: String,
    pub invite_code: String,
    pub black: Option<Seat>,
    pub white: Option<Seat>,
    pub board: BoardState,
    pub current_turn: StoneColor,
    pub status: SessionStatus,
    pub moves: Vec<(Position, StoneColor)>,
}

impl GameRoom {
    fn new(game_id: String, invite_code: String, creator: Seat, board_size: usize) -> Self {
        Self {
            game_id,
            invite_code,
            black: Some(creator),
            white: None,
            board: empty_grid(board_size),
            current_turn: StoneColor::Black,
            status: SessionStatus::Waiting,
            moves: Vec::new(),
        }
    }

    /// Which color a connection controls in this room.
    pub fn seat_color(&self, conn_id: Uuid) -> Option<StoneColor> {
        if self.black.as_ref().is_some_and(|seat| seat.conn.id == conn_id) {
            return Some(StoneColor::Black);
        }
        if self.white.as_ref().is_some_and(|seat| seat.conn.id == conn_id) {
            return Some(StoneColor::White);
        }
        None
    }

    pub fn seat(&self, color: StoneColor) -> Option<&Seat> {
        match color {
            StoneColor::Black => self.black.as_ref(),
            StoneColor::White => self.white.as_ref(),
        }
    }

    /// Send a message to both occupied seats.
    pub fn broadcast(&self, msg: &ServerMessage) {
        if let Some(black) = &self.black {
            black.conn.send(msg.clone());
        }
        if let Some(white) = &self.white {
            white.conn.send(msg.clone());
        }
    }

    pub fn is_board_full(&self) -> bool {
        self.board
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }
}

/// Does a line of 5+ stones of the cell's color pass through (row, col)?
///
/// Counts at most four steps out from the played cell in each direction, which
/// is enough to see any 5-line through it.
pub fn check_win(board: &BoardState, row: usize, col: usize) -> bool {
    let size = board.len() as i32;
    let Some(color) = board[row][col] else {
        return false;
    };

    let directions = [(1, 0), (0, 1), (1, 1), (1, -1)];
    for (d_row, d_col) in directions {
        let mut count = 1;

        for step in [1i32, -1] {
            for i in 1..5 {
                let next_row = row as i32 + d_row * i * step;
                let next_col = col as i32 + d_col * i * step;
                if next_row < 0
                    || next_row >= size
                    || next_col < 0
                    || next_col >= size
                    || board[next_row as usize][next_col as usize] != Some(color)
                {
                    break;
                }
                count += 1;
            }
        }

        if count >= 5 {
            return true;
        }
    }

    false
}

/// Owns every active room plus the invite-code and connection indexes.
pub struct GameRegistry {
    board_size: usize,
    rooms: HashMap<String, GameRoom>,
    invite_codes: HashMap<String, String>,
    connections: HashMap<Uuid, String>,
}

impl GameRegistry {
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            rooms: HashMap::new(),
            invite_codes: HashMap::new(),
            connections: HashMap::new(),
        }
    }

    /// Open a room with the creator seated as Black. Returns the new room's
    /// (game id, invite code).
    pub fn create_room(&mut self, info: PlayerInfo, conn: ConnectionHandle) -> (String, String) {
        let game_id = Uuid::new_v4().to_string();
        let invite_code = self.unique_invite_code();
        let conn_id = conn.id;

        let room = GameRoom::new(
            game_id.clone(),
            invite_code.clone(),
            Seat { info, conn },
            self.board_size,
        );
        self.rooms.insert(game_id.clone(), room);
        self.invite_codes.insert(invite_code.clone(), game_id.clone());
        self.connections.insert(conn_id, game_id.clone());

        (game_id, invite_code)
    }

    /// Seat a second participant as White and mark the room playing.
    pub fn join_room(
        &mut self,
        invite_code: &str,
        info: PlayerInfo,
        conn: ConnectionHandle,
    ) -> Result<&GameRoom, GameError> {
        let game_id = self
            .invite_codes
            .get(invite_code)
            .cloned()
            .ok_or(GameError::InviteCodeNotFound)?;

        let room = self
            .rooms
            .get_mut(&game_id)
            .ok_or(GameError::GameNotAvailable)?;
        if room.white.is_some() {
            return Err(GameError::GameNotAvailable);
        }

        let conn_id = conn.id;
        room.white = Some(Seat { info, conn });
        room.status = SessionStatus::Playing;
        self.connections.insert(conn_id, game_id.clone());

        Ok(&self.rooms[&game_id])
    }

    pub fn room_for_conn(&mut self, conn_id: Uuid) -> Option<&mut GameRoom> {
        let game_id = self.connections.get(&conn_id)?;
        self.rooms.get_mut(game_id)
    }

    /// Forget a connection, returning its room id if it had one.
    pub fn remove_connection(&mut self, conn_id: Uuid) -> Option<String> {
        self.connections.remove(&conn_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn unique_invite_code(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..INVITE_CODE_LENGTH)
                .map(|_| {
                    let idx = rng.gen_range(0..INVITE_CODE_CHARSET.len());
                    INVITE_CODE_CHARSET[idx] as char
                })
                .collect();
            if !self.invite_codes.contains_key(&code) {
                return code;
            }
        }
    }
}
