//! Game sessions: the player abstraction and the local turn-loop orchestrator.

pub mod logic;
pub mod player;
pub mod types;

pub use logic::{GameSession, SessionConfig, SessionInput};
pub use player::{ComputerPlayer, HumanPlayer, MoveSlot, Player, RemotePlayer};
pub use types::{
    GameMode, GameOutcome, MoveRecord, PlayerInfo, PlayerKind, SessionEvent, SessionSnapshot,
    SessionStatus,
};
