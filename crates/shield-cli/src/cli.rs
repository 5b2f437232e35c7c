//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shield - Check how well your finances are protected
#[derive(Parser)]
#[command(name = "shield")]
#[command(about = "Financial protection analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "shield.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SHIELD_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Analyze a financial profile
    ///
    /// Input is either a full request file ({"profile": ..., "transactions": [...]})
    /// or a profile file plus an optional transactions file (CSV or JSON array).
    Analyze {
        /// JSON file with a profile and its transactions
        #[arg(short, long, conflicts_with_all = ["profile", "transactions"])]
        request: Option<PathBuf>,

        /// JSON file with a financial profile
        #[arg(short, long, required_unless_present = "request")]
        profile: Option<PathBuf>,

        /// Transactions file (.csv, or JSON array)
        #[arg(short, long, requires = "profile")]
        transactions: Option<PathBuf>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,

        /// Store the profile, transactions, result and alerts in the database
        #[arg(long)]
        save: bool,
    },

    /// List stored alerts for a user
    Alerts {
        /// User email
        email: String,
    },

    /// Show database status (encryption, size, document counts)
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on (defaults to $PORT, then 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}
