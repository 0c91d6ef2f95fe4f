//! Error taxonomy shared by the board engine, the server, and the client gateway.
//!
//! The first five variants render exactly the messages the wire protocol sends
//! in `error` frames, so `to_string()` is the wire representation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Occupied or out-of-bounds cell.
    #[error("Invalid move")]
    InvalidMove,
    /// A connection tried to move out of turn.
    #[error("Not your turn")]
    NotYourTurn,
    /// A connection tried to move onto an occupied cell.
    #[error("Position already taken")]
    PositionTaken,
    /// Join attempt with an invite code that maps to no room.
    #[error("Invalid invite code")]
    InviteCodeNotFound,
    /// Join attempt on a room that is already full or gone.
    #[error("Game not available")]
    GameNotAvailable,
    /// The transport failed to open or dropped unexpectedly.
    #[error("connection error: {0}")]
    Transport(String),
    /// Automatic reconnection gave up after the configured attempt ceiling.
    #[error("connection lost after {0} reconnect attempts")]
    ConnectionExhausted(u32),
    /// An outbound action was requested while the transport was closed.
    #[error("not connected")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_match_protocol() {
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(GameError::PositionTaken.to_string(), "Position already taken");
        assert_eq!(GameError::InviteCodeNotFound.to_string(), "Invalid invite code");
        assert_eq!(GameError::GameNotAvailable.to_string(), "Game not available");
    }
}
