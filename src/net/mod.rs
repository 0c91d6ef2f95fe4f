//! Multiplayer networking: the wire protocol, the room registry, the session
//! server, and the reconnecting client gateway.

pub mod gateway;
pub mod protocol;
pub mod registry;
pub mod server;

pub use gateway::{reconnect_delay, GameSocket, GatewayEvent};
pub use protocol::{ClientMessage, ServerMessage};
pub use registry::{GameRegistry, GameRoom};
pub use server::GameServer;
