//! CLI application entry point and configuration.
//!
//! Argument parsing, configuration loading, and command dispatch. Chat file
//! operations run synchronously against the store; only `serve` spins up a
//! runtime.

use crate::commands::{Cli, Commands, EraseArgs, SendArgs, ServeArgs, ShowArgs};
use crate::error::{CliError, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use parley_api::config::ApiConfig;
use parley_core::{Chat, ChatStore, ParleyConfig};

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Loaded core configuration.
    pub config: ParleyConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        let cli = Cli::parse();
        let config = load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        match &self.cli.command {
            Commands::Serve(args) => self.handle_serve(args),
            Commands::Chats => self.handle_chats(),
            Commands::Show(args) => self.handle_show(args),
            Commands::Send(args) => self.handle_send(args),
            Commands::Erase(args) => self.handle_erase(args),
        }
    }

    fn setup_logging(&self) {
        let level = match self.cli.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init();
    }

    fn data_dir(&self) -> PathBuf {
        self.cli
            .data_dir
            .clone()
            .unwrap_or_else(|| self.config.resolve_data_dir())
    }

    fn store(&self) -> ChatStore {
        let mut store = ChatStore::new(self.data_dir());
        if let Some(template) = &self.config.storage.template_path {
            store = store.with_template(template);
        }
        store
    }

    fn handle_serve(&self, args: &ServeArgs) -> Result<()> {
        let mut api_config = ApiConfig::from_core_config(&self.config);
        let host = args.host.clone().unwrap_or(self.config.http.host.clone());
        let port = args.port.unwrap_or(self.config.http.port);
        api_config.bind_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| CliError::Argument(format!("invalid bind address: {}", e)))?;

        let store = self.store();
        let runtime = tokio::runtime::Runtime::new()?;
        runtime
            .block_on(parley_api::start_server(api_config, store))
            .map_err(|e| CliError::Api(e.to_string()))
    }

    fn handle_chats(&self) -> Result<()> {
        let store = self.store();
        let ids = store.list()?;
        if ids.is_empty() {
            println!("no chats in {}", store.root().display());
            return Ok(());
        }
        for id in ids {
            println!("{}", id);
        }
        Ok(())
    }

    fn handle_show(&self, args: &ShowArgs) -> Result<()> {
        let store = self.store();
        let path = store.path_for(&args.chat_id)?;
        if !path.is_file() {
            return Err(CliError::Argument(format!(
                "chat '{}' not found in {}",
                args.chat_id,
                store.root().display()
            )));
        }

        let mut chat = Chat::with_id(&args.chat_id, &args.chat_id);
        store.load(&mut chat)?;

        if args.json {
            let doc = store.document_for(&chat);
            println!("{}", serde_json::to_string_pretty(&doc)?);
            return Ok(());
        }

        println!("chat:     {}", chat.id);
        println!("messages: {}", chat.msgs.len());
        println!("modified: {}", chat.properties.modified);
        println!("hash:     {}", chat.properties.hash);
        println!();

        let skip = chat.msgs.len().saturating_sub(args.limit);
        for msg in chat.msgs.iter().skip(skip) {
            let media_note = if msg.media.is_empty() {
                String::new()
            } else {
                format!(" [{} attachment(s)]", msg.media.len())
            };
            println!("{} <{}> {}{}", msg.time, msg.author, msg.text, media_note);
        }
        Ok(())
    }

    fn handle_send(&self, args: &SendArgs) -> Result<()> {
        let store = self.store();
        let mut chat = Chat::with_id(&args.chat_id, &args.chat_id);
        store.load(&mut chat)?;

        chat.compose(&args.text, Vec::new(), &args.author);
        let msg = chat.take_draft();
        let msg_id = msg.id.clone();
        chat.queue(msg);
        store.save(&mut chat)?;

        println!("sent {} to chat '{}'", msg_id, args.chat_id);
        Ok(())
    }

    fn handle_erase(&self, args: &EraseArgs) -> Result<()> {
        if !args.yes && !confirm(&format!("erase chat '{}'?", args.chat_id))? {
            println!("aborted");
            return Ok(());
        }

        let store = self.store();
        let mut chat = Chat::with_id(&args.chat_id, &args.chat_id);
        store.erase(&mut chat)?;
        println!("chat '{}' erased", args.chat_id);
        Ok(())
    }
}

/// Parse arguments, load configuration, and run the selected command.
pub fn run() -> Result<()> {
    App::new()?.run()
}

fn load_config(cli: &Cli) -> Result<ParleyConfig> {
    match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            ParleyConfig::load_from(path).map_err(|e| CliError::Config(e.to_string()))
        }
        None => ParleyConfig::load().map_err(|e| CliError::Config(e.to_string())),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
