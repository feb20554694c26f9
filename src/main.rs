//! Tic-tac-toe service - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_service::{AppState, GameRepository, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    match cli.command {
        Command::Serve {
            host,
            port,
            database_url,
            opponent,
            opponent_seed,
        } => {
            let config = base.with_overrides(host, port, database_url, opponent, opponent_seed)?;
            run_http_server(config).await
        }
        Command::Migrate { database_url } => {
            let config = base.with_overrides(None, None, database_url, None, None)?;
            run_migrations(&config)?;
            Ok(())
        }
    }
}

/// Apply pending migrations
#[instrument(skip_all, fields(database_url = %config.database_url()))]
fn run_migrations(config: &ServerConfig) -> Result<GameRepository> {
    let repository = GameRepository::new(config.database_url().clone())?;
    repository.run_migrations()?;
    Ok(repository)
}

/// Run the HTTP game server
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repository = run_migrations(&config)?;
    let state = AppState::new(repository, *config.opponent(), *config.opponent_seed());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/api",
        config.host(),
        config.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tictactoe_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
