//! Session data types: players, moves, status, outcomes, events.

use crate::board::{Position, StoneColor};
use serde::{Deserialize, Serialize};

/// What kind of agent controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "ai")]
    Ai,
}

/// Identity of one participant. Immutable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlayerKind,
}

impl PlayerInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    LocalPvp,
    VsAi,
    OnlinePvp,
}

/// One applied move. Append-only history, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub position: Position,
    pub player: StoneColor,
    pub move_number: u32,
    /// Wall-clock time of the move, epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Playing,
    Finished,
}

/// Terminal result of a game, in the wire representation ("B" / "W" / "draw").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[serde(rename = "B")]
    BlackWins,
    #[serde(rename = "W")]
    WhiteWins,
    #[serde(rename = "draw")]
    Draw,
}

impl GameOutcome {
    pub fn from_winner(color: StoneColor) -> Self {
        match color {
            StoneColor::Black => GameOutcome::BlackWins,
            StoneColor::White => GameOutcome::WhiteWins,
        }
    }

    pub fn winner(self) -> Option<StoneColor> {
        match self {
            GameOutcome::BlackWins => Some(StoneColor::Black),
            GameOutcome::WhiteWins => Some(StoneColor::White),
            GameOutcome::Draw => None,
        }
    }
}

/// State-change notifications emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MoveRecorded(MoveRecord),
    TurnChanged {
        turn: StoneColor,
        player: PlayerInfo,
    },
    /// The active player is a computer and has started or stopped computing.
    Thinking(bool),
    GameEnded {
        outcome: GameOutcome,
        winner: Option<PlayerInfo>,
    },
}

/// Serializable snapshot of a whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub mode: GameMode,
    pub player_black: PlayerInfo,
    pub player_white: PlayerInfo,
    pub current_turn: StoneColor,
    pub move_history: Vec<MoveRecord>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<GameOutcome>,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
}
