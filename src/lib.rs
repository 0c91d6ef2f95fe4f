//! Gomoku - Five in a Row
//!
//! Board rules engine, minimax search with a transposition cache, local game
//! sessions, and websocket multiplayer (server and client gateway).

pub mod board;
pub mod build_info;
pub mod constants;
pub mod error;
pub mod net;
pub mod search;
pub mod services;
pub mod session;

pub use board::{Board, BoardGeometry, Position, StoneColor};
pub use constants::{BOARD_SIZE, DEFAULT_AI_DEPTH, DEFAULT_SERVER_PORT};
pub use error::GameError;
pub use search::SearchEngine;
pub use session::{GameMode, GameOutcome, GameSession, PlayerInfo, PlayerKind, SessionConfig};
