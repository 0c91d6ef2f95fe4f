//! Multiplayer Gomoku websocket server.

use clap::Parser;
use gomoku::build_info;
use gomoku::constants::{BOARD_SIZE, DEFAULT_SERVER_PORT};
use gomoku::net::GameServer;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gomoku-server", about = "Websocket game server for Gomoku")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Board size (square)
    #[arg(long, default_value_t = BOARD_SIZE)]
    board_size: usize,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    tracing::info!(
        commit = build_info::BUILD_COMMIT,
        date = build_info::BUILD_DATE,
        "starting gomoku-server"
    );

    let listener = TcpListener::bind((args.bind.as_str(), args.port)).await?;
    tracing::info!("game server running on ws://{}:{}", args.bind, args.port);

    GameServer::new(args.board_size).run(listener).await
}
