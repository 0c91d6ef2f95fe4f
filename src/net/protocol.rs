//! Wire protocol: `type`-tagged JSON messages with camelCase fields.

use crate::board::{Position, StoneColor};
use crate::session::{GameOutcome, PlayerInfo};
use serde::{Deserialize, Serialize};

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateGame {
        player: PlayerInfo,
    },
    #[serde(rename_all = "camelCase")]
    JoinGame {
        invite_code: String,
        player: PlayerInfo,
    },
    #[serde(rename_all = "camelCase")]
    MakeMove {
        game_id: String,
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    Resign {
        game_id: String,
    },
    #[serde(rename_all = "camelCase")]
    RematchRequest {
        game_id: String,
    },
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    GameCreated {
        game_id: String,
        invite_code: String,
    },
    PlayerJoined {
        player: PlayerInfo,
        color: StoneColor,
    },
    #[serde(rename_all = "camelCase")]
    GameStart {
        game_id: String,
        player_black: PlayerInfo,
        player_white: PlayerInfo,
    },
    MoveMade {
        position: Position,
        player: StoneColor,
    },
    GameEnd {
        winner: GameOutcome,
    },
    PlayerDisconnected {
        player: PlayerInfo,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlayerKind;

    fn player() -> PlayerInfo {
        PlayerInfo::new("u1", "Alice", PlayerKind::Human)
    }

    #[test]
    fn test_create_game_wire_format() {
        let msg = ClientMessage::CreateGame { player: player() };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"create_game","player":{"id":"u1","name":"Alice","type":"human"}}"#
        );
    }

    #[test]
    fn test_join_game_wire_format() {
        let msg = ClientMessage::JoinGame {
            invite_code: "AB12CD".into(),
            player: player(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"join_game""#));
        assert!(json.contains(r#""inviteCode":"AB12CD""#));
    }

    #[test]
    fn test_make_move_wire_format() {
        let msg = ClientMessage::MakeMove {
            game_id: "g1".into(),
            position: (7, 7),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"make_move","gameId":"g1","position":[7,7]}"#
        );
    }

    #[test]
    fn test_server_messages_round_trip() {
        let messages = vec![
            ServerMessage::GameCreated {
                game_id: "g1".into(),
                invite_code: "XYZ123".into(),
            },
            ServerMessage::PlayerJoined {
                player: player(),
                color: StoneColor::White,
            },
            ServerMessage::GameStart {
                game_id: "g1".into(),
                player_black: player(),
                player_white: player(),
            },
            ServerMessage::MoveMade {
                position: (3, 11),
                player: StoneColor::Black,
            },
            ServerMessage::GameEnd {
                winner: GameOutcome::Draw,
            },
            ServerMessage::PlayerDisconnected { player: player() },
            ServerMessage::Error {
                message: "Not your turn".into(),
            },
        ];

        for msg in messages {
            let json = serde_json::to_string(&msg).unwrap();
            let back: ServerMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, msg);
        }
    }

    #[test]
    fn test_game_end_winner_literals() {
        let json = serde_json::to_string(&ServerMessage::GameEnd {
            winner: GameOutcome::WhiteWins,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"game_end","winner":"W"}"#);

        let draw: ServerMessage = serde_json::from_str(r#"{"type":"game_end","winner":"draw"}"#).unwrap();
        assert_eq!(
            draw,
            ServerMessage::GameEnd {
                winner: GameOutcome::Draw
            }
        );
    }

    #[test]
    fn test_parses_original_client_payloads() {
        let json = r#"{"type":"join_game","inviteCode":"Q1W2E3","player":{"id":"9","name":"Bob","type":"human"}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::JoinGame { invite_code, player } => {
                assert_eq!(invite_code, "Q1W2E3");
                assert_eq!(player.name, "Bob");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
