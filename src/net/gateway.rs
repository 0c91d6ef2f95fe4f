//! Client socket gateway: a persistent websocket wrapper with bounded
//! exponential-backoff reconnection.
//!
//! Outbound calls fail with `NotConnected` while the transport is closed.
//! An unexpected drop schedules reconnect attempts with strictly increasing
//! delays up to a ceiling; an explicit `disconnect()` suppresses them.

use super::protocol::{ClientMessage, ServerMessage};
use crate::board::{Position, StoneColor};
use crate::constants::{
    MAX_RECONNECT_ATTEMPTS, RECONNECT_BASE_DELAY_MS, RECONNECT_MAX_DELAY_MS,
};
use crate::error::GameError;
use crate::session::{GameOutcome, PlayerInfo};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Everything the gateway reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    ConnectionChange { connected: bool },
    GameCreated { game_id: String, invite_code: String },
    PlayerJoined { player: PlayerInfo, color: StoneColor },
    GameStart { player_black: PlayerInfo, player_white: PlayerInfo },
    MoveMade { position: Position, player: StoneColor },
    GameEnd { winner: GameOutcome },
    PlayerDisconnected { player: PlayerInfo },
    ServerError { message: String },
    /// Reconnection gave up; user action is required from here.
    ConnectionFailed { attempts: u32 },
}

/// Backoff before reconnect attempt `attempt` (1-based): doubling from the
/// base delay, capped at the ceiling. Strictly increasing across the
/// configured attempt budget.
pub fn reconnect_delay(attempt: u32) -> Duration {
    let exp = attempt.min(16);
    let ms = RECONNECT_BASE_DELAY_MS.saturating_mul(1u64 << exp);
    Duration::from_millis(ms.min(RECONNECT_MAX_DELAY_MS))
}

struct Shared {
    url: String,
    out_tx: Mutex<Option<mpsc::UnboundedSender<ClientMessage>>>,
    event_tx: mpsc::UnboundedSender<GatewayEvent>,
    game_id: Mutex<Option<String>>,
    intentional_disconnect: AtomicBool,
    attempts: AtomicU32,
}

pub struct GameSocket {
    shared: Arc<Shared>,
}

impl GameSocket {
    /// Create a gateway for `url`, returning it with its event stream.
    pub fn new(url: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            url: url.into(),
            out_tx: Mutex::new(None),
            event_tx,
            game_id: Mutex::new(None),
            intentional_disconnect: AtomicBool::new(false),
            attempts: AtomicU32::new(0),
        });
        (Self { shared }, event_rx)
    }

    /// Open the transport. Not successful until the websocket handshake
    /// completes.
    pub async fn connect(&self) -> Result<(), GameError> {
        self.shared
            .intentional_disconnect
            .store(false, Ordering::SeqCst);
        self.shared.attempts.store(0, Ordering::SeqCst);
        open(Arc::clone(&self.shared)).await
    }

    /// Close the transport and suppress any reconnection.
    pub fn disconnect(&self) {
        self.shared
            .intentional_disconnect
            .store(true, Ordering::SeqCst);
        self.shared.out_tx.lock().expect("gateway lock poisoned").take();
        self.shared.game_id.lock().expect("gateway lock poisoned").take();
    }

    pub fn is_connected(&self) -> bool {
        self.shared
            .out_tx
            .lock()
            .expect("gateway lock poisoned")
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Game id learned from `game_created` / `game_start`, if any.
    pub fn current_game_id(&self) -> Option<String> {
        self.shared.game_id.lock().expect("gateway lock poisoned").clone()
    }

    pub fn create_game(&self, player: PlayerInfo) -> Result<(), GameError> {
        self.send(ClientMessage::CreateGame { player })
    }

    pub fn join_game(&self, invite_code: impl Into<String>, player: PlayerInfo) -> Result<(), GameError> {
        self.send(ClientMessage::JoinGame {
            invite_code: invite_code.into(),
            player,
        })
    }

    pub fn make_move(&self, position: Position) -> Result<(), GameError> {
        let game_id = self.current_game_id().ok_or(GameError::NotConnected)?;
        self.send(ClientMessage::MakeMove { game_id, position })
    }

    pub fn resign(&self) -> Result<(), GameError> {
        let game_id = self.current_game_id().ok_or(GameError::NotConnected)?;
        self.send(ClientMessage::Resign { game_id })
    }

    pub fn request_rematch(&self) -> Result<(), GameError> {
        let game_id = self.current_game_id().ok_or(GameError::NotConnected)?;
        self.send(ClientMessage::RematchRequest { game_id })
    }

    fn send(&self, msg: ClientMessage) -> Result<(), GameError> {
        let guard = self.shared.out_tx.lock().expect("gateway lock poisoned");
        match guard.as_ref() {
            Some(tx) if !tx.is_closed() => tx.send(msg).map_err(|_| GameError::NotConnected),
            _ => {
                tracing::warn!("websocket not connected; dropping outbound message");
                Err(GameError::NotConnected)
            }
        }
    }
}

/// Dial the server and wire up the reader/writer tasks.
async fn open(shared: Arc<Shared>) -> Result<(), GameError> {
    let (ws_stream, _) = connect_async(shared.url.as_str())
        .await
        .map_err(|e| GameError::Transport(e.to_string()))?;

    shared.attempts.store(0, Ordering::SeqCst);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    *shared.out_tx.lock().expect("gateway lock poisoned") = Some(out_tx);
    let _ = shared
        .event_tx
        .send(GatewayEvent::ConnectionChange { connected: true });

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    tokio::spawn({
        let shared = Arc::clone(&shared);
        async move {
            // Writer: drain the outbound queue; close the socket when the
            // queue's sender is dropped (explicit disconnect).
            let writer = tokio::spawn(async move {
                while let Some(msg) = out_rx.recv().await {
                    let text = match serde_json::to_string(&msg) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to serialize client message");
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                let _ = ws_sender.close().await;
            });

            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(message) => handle_server_message(&shared, message),
                        Err(e) => {
                            tracing::debug!(error = %e, "ignoring malformed server message");
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Err(_) => break,
                    _ => {}
                }
            }

            shared.out_tx.lock().expect("gateway lock poisoned").take();
            let _ = shared
                .event_tx
                .send(GatewayEvent::ConnectionChange { connected: false });

            if !shared.intentional_disconnect.load(Ordering::SeqCst) {
                spawn_reconnect(Arc::clone(&shared));
            } else {
                writer.abort();
            }
        }
    });

    Ok(())
}

/// Retry the connection with increasing delays until it opens, the attempt
/// budget runs out, or the caller disconnects explicitly.
fn spawn_reconnect(shared: Arc<Shared>) {
    tokio::spawn(async move {
        loop {
            if shared.intentional_disconnect.load(Ordering::SeqCst) {
                return;
            }
            let attempt = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt > MAX_RECONNECT_ATTEMPTS {
                tracing::warn!(
                    attempts = MAX_RECONNECT_ATTEMPTS,
                    "reconnection attempts exhausted"
                );
                let _ = shared.event_tx.send(GatewayEvent::ConnectionFailed {
                    attempts: MAX_RECONNECT_ATTEMPTS,
                });
                return;
            }

            let delay = reconnect_delay(attempt);
            tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
            tokio::time::sleep(delay).await;

            if shared.intentional_disconnect.load(Ordering::SeqCst) {
                return;
            }
            match open(Arc::clone(&shared)).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "reconnect attempt failed");
                }
            }
        }
    });
}

fn handle_server_message(shared: &Shared, message: ServerMessage) {
    match &message {
        ServerMessage::GameCreated { game_id, .. } | ServerMessage::GameStart { game_id, .. } => {
            *shared.game_id.lock().expect("gateway lock poisoned") = Some(game_id.clone());
        }
        _ => {}
    }

    let event = match message {
        ServerMessage::GameCreated {
            game_id,
            invite_code,
        } => GatewayEvent::GameCreated {
            game_id,
            invite_code,
        },
        ServerMessage::PlayerJoined { player, color } => {
            GatewayEvent::PlayerJoined { player, color }
        }
        ServerMessage::GameStart {
            player_black,
            player_white,
            ..
        } => GatewayEvent::GameStart {
            player_black,
            player_white,
        },
        ServerMessage::MoveMade { position, player } => {
            GatewayEvent::MoveMade { position, player }
        }
        ServerMessage::GameEnd { winner } => GatewayEvent::GameEnd { winner },
        ServerMessage::PlayerDisconnected { player } => {
            GatewayEvent::PlayerDisconnected { player }
        }
        ServerMessage::Error { message } => GatewayEvent::ServerError { message },
    };
    let _ = shared.event_tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_delays_strictly_increase() {
        let delays: Vec<Duration> = (1..=MAX_RECONNECT_ATTEMPTS).map(reconnect_delay).collect();
        for pair in delays.windows(2) {
            assert!(pair[1] > pair[0], "delays must strictly increase: {delays:?}");
        }
        assert_eq!(delays[0], Duration::from_millis(1000));
    }

    #[test]
    fn test_reconnect_delay_is_capped() {
        assert_eq!(
            reconnect_delay(20),
            Duration::from_millis(RECONNECT_MAX_DELAY_MS)
        );
        assert!(reconnect_delay(MAX_RECONNECT_ATTEMPTS) <= Duration::from_millis(RECONNECT_MAX_DELAY_MS));
    }

    #[test]
    fn test_outbound_actions_fail_when_closed() {
        let (socket, _events) = GameSocket::new("ws://localhost:9");
        assert!(!socket.is_connected());
        let player = PlayerInfo::new("u1", "Alice", crate::session::PlayerKind::Human);
        assert_eq!(
            socket.create_game(player),
            Err(GameError::NotConnected)
        );
        assert_eq!(socket.make_move((7, 7)), Err(GameError::NotConnected));
        assert_eq!(socket.resign(), Err(GameError::NotConnected));
    }
}
