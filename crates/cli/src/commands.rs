//! CLI command definitions and parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parley command-line interface.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about = "Chat files over HTTP, one JSON document per chat")]
pub struct Cli {
    /// Path to a configuration file (TOML).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the per-chat JSON documents.
    #[arg(long, global = true, env = "PARLEY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve(ServeArgs),

    /// List chats present in the store.
    Chats,

    /// Show a chat summary and its latest messages.
    Show(ShowArgs),

    /// Append a message to a chat from the terminal.
    Send(SendArgs),

    /// Reset a chat file to the template.
    Erase(EraseArgs),
}

/// Arguments for the `serve` command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Host to bind to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to.
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `show` command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Chat id to show.
    pub chat_id: String,

    /// Number of trailing messages to print.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,

    /// Print the raw JSON document instead of a summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `send` command.
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Chat id to append to.
    pub chat_id: String,

    /// Message text.
    #[arg(short, long)]
    pub text: String,

    /// Author name stamped on the message.
    #[arg(short, long, default_value = "cli")]
    pub author: String,
}

/// Arguments for the `erase` command.
#[derive(Debug, Args)]
pub struct EraseArgs {
    /// Chat id to erase.
    pub chat_id: String,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}
