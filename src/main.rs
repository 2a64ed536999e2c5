//! `sockchat` - a terminal chat client for websocket broadcast servers
//!
//! Connects to a broadcast chat peer, projects its connection lifecycle
//! and message events into an ordered conversational log, and forwards
//! composed lines back through the same session. `sockchat serve` runs
//! a compatible broadcast server for the other side.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{Cli, Commands};
use crate::render::Renderer;
use crate::ws::WsSession;
use sockchat_core::config::Config;
use sockchat_core::ChatController;

mod cli;
mod render;
mod server;
mod ws;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.version {
        let blue = Style::new().blue();
        println!(
            "{} v{} ({})",
            blue.apply_to("sockchat"),
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = &cli.url {
        config.server.url = url.clone();
    }

    match &cli.command {
        Some(Commands::Serve { listen }) => {
            let addr = listen.as_deref().unwrap_or(&config.server.listen);
            let server = server::Server::bind(addr).await?;
            server.run().await
        }
        None => run_client(&config).await,
    }
}

/// Interleave incoming log entries with stdin submissions until the
/// stream ends, stdin closes, or ctrl-c.
async fn run_client(config: &Config) -> Result<()> {
    let session = WsSession::connect(&config.server.url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.server.url))?;
    let mut controller = ChatController::new(Arc::new(session));
    controller.start();

    let renderer = Renderer::new(config.ui.legacy_notices);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            entry = controller.next_event() => {
                match entry {
                    Some(entry) => renderer.print(&entry),
                    None => break, // stream ended
                }
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(text) => {
                        controller.set_input(text);
                        controller.submit_input().await?;
                    }
                    None => break, // stdin closed
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    controller.teardown().await;
    Ok(())
}
