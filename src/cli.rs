//! Command-line interface definitions

use clap::{Parser, Subcommand};

/// Terminal chat client for a websocket broadcast server
#[derive(Parser)]
#[command(name = "sockchat", about = "Terminal chat client for websocket broadcast servers")]
pub struct Cli {
    /// Websocket URL of the chat server (overrides config)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Print version information
    #[arg(long)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the broadcast chat server
    Serve {
        /// Bind address, e.g. 127.0.0.1:12345
        #[arg(short, long)]
        listen: Option<String>,
    },
}
