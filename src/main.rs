mod command;
mod config;
mod context;
mod error;
mod followup;
mod gateway;
mod handler;
mod interaction;
mod llm;
mod logging;
mod register;
#[cfg(test)]
mod testing;
mod verify;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about = "Discord interactions endpoint that answers slash commands")]
struct Cli {
    /// Configuration file.  Defaults to ~/.config/askbot/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Default)]
enum Action {
    /// Serve the interactions endpoint (default)
    #[default]
    Serve,
    /// Overwrite the application's global slash commands
    Register,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // A .env file is optional.
    let _ = dotenvy::dotenv();
    crate::logging::init();

    let cfg = crate::config::Config::load(cli.config.as_deref()).await?;

    match cli.command.unwrap_or_default() {
        Action::Serve => serve(cfg).await,
        Action::Register => crate::register::register(&cfg).await,
    }
}

async fn serve(cfg: config::Config) -> Result<()> {
    let port = cfg.general.port;
    let bot_token = cfg.discord.bot_token.clone();
    let app = handler::router(context::Context::new(cfg)?);

    // Presence only; the endpoint works without it.
    if let Some(token) = bot_token {
        tokio::spawn(async move {
            if let Err(err) = crate::gateway::run(&token).await {
                error!(error = %err, "Discord gateway client failed");
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| anyhow!("Could not listen on port {}: {}", port, e))?;
    info!(port, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .map_err(Into::into)
}
