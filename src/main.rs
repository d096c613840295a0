//! Itinera - Conversational Travel-Planning Agent
//!
//! Main entry point for the HTTP service.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use itinera::agent::{PlannerGraph, SessionStore};
use itinera::api::{self, AppState};
use itinera::llm::QwenClient;
use itinera::tools::ToolRegistry;
use itinera::Config;

/// Itinera - Conversational Travel-Planning Agent
#[derive(Parser, Debug)]
#[command(name = "itinera")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration (loads .env and the config file)
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.debug {
        config.agent.debug = true;
    }

    let default_level = if config.agent.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let llm = Arc::new(QwenClient::from_config(&config)?);
    let tools = Arc::new(ToolRegistry::with_travel_tools(&config)?);
    let graph = Arc::new(PlannerGraph::new(
        llm,
        tools.clone(),
        config.agent.max_iterations,
    ));
    let sessions = Arc::new(SessionStore::new(config.agent.session_capacity));

    let state = AppState { sessions, graph };
    let app = api::app(state, &config.server.origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, tools = tools.len(), "itinera listening");

    axum::serve(listener, app).await?;

    Ok(())
}
