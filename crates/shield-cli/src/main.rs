//! Shield CLI - Financial protection analyzer
//!
//! Usage:
//!   shield init                                 Initialize database
//!   shield analyze --request request.json      Analyze a profile
//!   shield alerts user@example.com             List stored alerts
//!   shield serve --port 8000                   Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `analyze --json` output stays machine readable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Analyze {
            request,
            profile,
            transactions,
            json,
            save,
        } => {
            let input = commands::AnalyzeInput::from_args(request, profile, transactions)?;
            commands::cmd_analyze(&cli.db, cli.no_encrypt, &input, json, save)
        }
        Commands::Alerts { email } => commands::cmd_alerts(&cli.db, &email, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve { port, host } => {
            let port = commands::resolve_port(port, std::env::var("PORT").ok())?;
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt).await
        }
    }
}
