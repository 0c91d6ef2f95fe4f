//! Multiplayer session server over websockets.
//!
//! One task per connection reads inbound frames; a paired writer task drains
//! that connection's outbound queue. All room mutations happen under a single
//! registry lock, so messages are applied one at a time in arrival order.

use super::protocol::{ClientMessage, ServerMessage};
use super::registry::{check_win, ConnectionHandle, GameRegistry};
use crate::board::StoneColor;
use crate::error::GameError;
use crate::session::{GameOutcome, SessionStatus};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

pub struct GameServer {
    registry: Arc<Mutex<GameRegistry>>,
}

impl GameServer {
    pub fn new(board_size: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(GameRegistry::new(board_size))),
        }
    }

    /// Accept connections forever, spawning one handler task per client.
    pub async fn run(&self, listener: TcpListener) -> std::io::Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(registry, stream, addr).await {
                            tracing::debug!(%addr, error = %e, "connection closed with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}

async fn handle_connection(
    registry: Arc<Mutex<GameRegistry>>,
    stream: TcpStream,
    addr: SocketAddr,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let conn_id = Uuid::new_v4();
    tracing::info!(%addr, %conn_id, "client connected");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Writer task: serialize and flush this connection's outbound queue.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize server message");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => handle_message(&registry, conn_id, &out_tx, message).await,
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "ignoring malformed message");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    handle_disconnect(&registry, conn_id).await;
    send_task.abort();
    tracing::info!(%addr, %conn_id, "client disconnected");

    Ok(())
}

async fn handle_message(
    registry: &Mutex<GameRegistry>,
    conn_id: Uuid,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    message: ClientMessage,
) {
    let mut registry = registry.lock().await;

    match message {
        ClientMessage::CreateGame { player } => {
            let conn = ConnectionHandle::new(conn_id, out_tx.clone());
            let (game_id, invite_code) = registry.create_room(player, conn);
            tracing::info!(%conn_id, %game_id, %invite_code, "room created");
            let _ = out_tx.send(ServerMessage::GameCreated {
                game_id,
                invite_code,
            });
        }

        ClientMessage::JoinGame {
            invite_code,
            player,
        } => {
            let conn = ConnectionHandle::new(conn_id, out_tx.clone());
            match registry.join_room(&invite_code, player.clone(), conn) {
                Ok(room) => {
                    tracing::info!(%conn_id, game_id = %room.game_id, "player joined");

                    // Both sides learn who joined and as which color, then
                    // both receive the start-of-game roster.
                    room.broadcast(&ServerMessage::PlayerJoined {
                        player,
                        color: StoneColor::White,
                    });

                    if let (Some(black), Some(white)) = (&room.black, &room.white) {
                        room.broadcast(&ServerMessage::GameStart {
                            game_id: room.game_id.clone(),
                            player_black: black.info.clone(),
                            player_white: white.info.clone(),
                        });
                    }
                }
                Err(e) => {
                    let _ = out_tx.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }

        ClientMessage::MakeMove { position, .. } => {
            let Some(room) = registry.room_for_conn(conn_id) else {
                return;
            };
            if room.status != SessionStatus::Playing {
                return;
            }
            let Some(color) = room.seat_color(conn_id) else {
                return;
            };

            if room.current_turn != color {
                let _ = out_tx.send(ServerMessage::Error {
                    message: GameError::NotYourTurn.to_string(),
                });
                return;
            }

            let (row, col) = position;
            let size = room.board.len();
            if row >= size || col >= size {
                let _ = out_tx.send(ServerMessage::Error {
                    message: GameError::InvalidMove.to_string(),
                });
                return;
            }
            if room.board[row][col].is_some() {
                let _ = out_tx.send(ServerMessage::Error {
                    message: GameError::PositionTaken.to_string(),
                });
                return;
            }

            // Apply to the authoritative board and echo to both seats.
            room.board[row][col] = Some(color);
            room.moves.push((position, color));
            room.broadcast(&ServerMessage::MoveMade {
                position,
                player: color,
            });

            if check_win(&room.board, row, col) {
                room.status = SessionStatus::Finished;
                room.broadcast(&ServerMessage::GameEnd {
                    winner: GameOutcome::from_winner(color),
                });
                tracing::info!(game_id = %room.game_id, winner = %color, "game over");
                return;
            }

            if room.is_board_full() {
                room.status = SessionStatus::Finished;
                room.broadcast(&ServerMessage::GameEnd {
                    winner: GameOutcome::Draw,
                });
                tracing::info!(game_id = %room.game_id, "game drawn");
                return;
            }

            room.current_turn = color.opponent();
        }

        ClientMessage::Resign { .. } => {
            let Some(room) = registry.room_for_conn(conn_id) else {
                return;
            };
            let Some(color) = room.seat_color(conn_id) else {
                return;
            };

            room.status = SessionStatus::Finished;
            let winner = color.opponent();
            room.broadcast(&ServerMessage::GameEnd {
                winner: GameOutcome::from_winner(winner),
            });
            tracing::info!(game_id = %room.game_id, resigned = %color, "resignation");
        }

        ClientMessage::RematchRequest { game_id } => {
            // Accepted as input; no rematch flow is defined.
            tracing::debug!(%conn_id, %game_id, "rematch requested (not implemented)");
        }
    }
}

/// Notify the other seat when a participant drops mid-game. The room itself
/// is left in place; there is no resume path.
async fn handle_disconnect(registry: &Mutex<GameRegistry>, conn_id: Uuid) {
    let mut registry = registry.lock().await;

    if let Some(room) = registry.room_for_conn(conn_id) {
        if room.status == SessionStatus::Playing {
            if let Some(color) = room.seat_color(conn_id) {
                let leaver = room.seat(color).map(|seat| seat.info.clone());
                let remaining = room.seat(color.opponent());
                if let (Some(player), Some(seat)) = (leaver, remaining) {
                    seat.conn.send(ServerMessage::PlayerDisconnected { player });
                }
            }
        }
    }

    registry.remove_connection(conn_id);
}
