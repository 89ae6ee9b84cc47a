//! Chess server demo.
//!
//! Seeds one game with both seats claimed, prints an auth token per player,
//! and serves WebSocket clients until interrupted.
//!
//! Run with: `cargo run --package chess-server -- --white alice --black bob`

use std::sync::Arc;

use clap::Parser;
use rookery::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address to listen on
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    bind: String,
    /// Username seated as white
    #[clap(short, long, default_value = "white")]
    white: String,
    /// Username seated as black
    #[clap(short = 'k', long, default_value = "black")]
    black: String,
    /// Display name of the seeded game
    #[clap(short, long, default_value = "demo")]
    game_name: String,
}

#[tokio::main]
async fn main() -> Result<(), RookeryError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let repository = Arc::new(MemoryGameRepository::new());
    let game_id = repository.create_game(args.game_name.as_str()).await;
    repository
        .claim_seat(game_id, Color::White, Username::from(args.white.as_str()))
        .await?;
    repository
        .claim_seat(game_id, Color::Black, Username::from(args.black.as_str()))
        .await?;

    let auth = MemoryAuthenticator::new();
    for (color, name) in [(Color::White, &args.white), (Color::Black, &args.black)] {
        let token = auth.issue(name.as_str()).await;
        tracing::info!(%game_id, %color, username = %name, %token, "seat ready");
    }

    let server = RookeryServerBuilder::new()
        .bind(&args.bind)
        .build(auth, repository)
        .await?;
    tracing::info!(addr = %server.local_addr()?, %game_id, "chess server listening");

    server.run().await
}
