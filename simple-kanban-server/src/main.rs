//! Standalone kanban board server

use clap::Parser;
use simple_kanban::{BoardConfig, MemoryTicketStore};
use simple_kanban_server::{router, seed, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "simple-kanban-server", about = "Kanban board over an issue tracker")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Board configuration file (YAML), defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed file (YAML) loaded into the in-memory store at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<BoardConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_yaml_ng::from_str(&raw)?)
        }
        None => Ok(BoardConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let store = Arc::new(MemoryTicketStore::new());
    if let Some(path) = &args.seed {
        seed::load(&store, path).await?;
    }

    let state = AppState::new(store, config);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(address = %args.bind, "kanban server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
