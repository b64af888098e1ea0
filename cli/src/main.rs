//! DiaSys CLI - Terminal client for the DiaSys diabetes-risk screening service
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then log in (password is prompted)
//! diasys register --name "Alice" --email alice@example.com
//! diasys login --email alice@example.com
//!
//! # Screen for diabetes risk
//! diasys predict --glucose 168 --blood-pressure 72 --weight 85.5 --height 1.65 --age 50
//!
//! # JSON output against a local server
//! diasys --url http://localhost:8000 --json predict ...
//! ```

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use diasys_cli::{logging, CLIConfiguration, FileTokenStore, OutputFormatter, Result};
use diasys_link::{DiasysClient, SessionEvent, SessionManager};

mod args;
mod commands;

use args::{Cli, Command};
use commands::auth::{handle_login, handle_logout, handle_register, handle_status};
use commands::predict::handle_predict;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CLIConfiguration::load(&cli.config)?;
    logging::init_logging(&config.log_level(), cli.verbose)?;

    let ui = config.resolved_ui();
    let color = ui.color && !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }
    let formatter = OutputFormatter::new(cli.output_format().unwrap_or(config.output_format()), color);

    let client = DiasysClient::builder()
        .base_url(config.server_url(cli.url.as_deref()))
        .build()?;
    let server_url = client.base_url().to_string();
    tracing::debug!("Using DiaSys server {}", server_url);

    let store = match cli.credentials_file.clone() {
        Some(path) => FileTokenStore::with_path(path, server_url.clone())?,
        None => FileTokenStore::new(server_url.clone())?,
    };
    tracing::debug!(
        "Credentials file: {} (origin {})",
        store.path().display(),
        store.origin()
    );

    let session = SessionManager::new(client, store);
    session.subscribe(|event: &SessionEvent| {
        tracing::info!(state = %event.state(), "Session state changed");
    });

    match cli.command {
        Command::Register(args) => handle_register(&session, args, &formatter).await,
        Command::Login(args) => handle_login(&session, args, &formatter).await,
        Command::Logout => handle_logout(&session, &formatter).await,
        Command::Status => handle_status(&session, &server_url, &formatter).await,
        Command::Predict(args) => handle_predict(&session, &args, &formatter).await,
    }
}
