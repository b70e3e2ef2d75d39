//! SnapShell CLI - Convert CLI output to clean, shareable web snapshots

use clap::Parser;

mod auth;
mod classify;
mod cli;
mod client;
mod config;
mod error;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Login { timeout }) => {
            cli::login::run(&cli.api, timeout, cli.config.as_deref()).await
        }
        Some(Commands::Logout) => cli::logout::run(cli.config.as_deref()),
        Some(Commands::Status) => cli::status::run(cli.config.as_deref()),
        None => cli::snapshot::run(cli.snapshot, &cli.api, cli.config.as_deref()).await,
    }
}
