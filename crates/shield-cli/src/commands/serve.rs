//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use super::open_db;

/// Port used when neither --port nor PORT is given
pub const DEFAULT_PORT: u16 = 8000;

/// Pick the listen port: flag, then the PORT environment value, then the default
pub fn resolve_port(flag: Option<u16>, env_port: Option<String>) -> Result<u16> {
    if let Some(port) = flag {
        return Ok(port);
    }
    match env_port.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => p
            .parse()
            .with_context(|| format!("PORT must be a port number, got '{}'", p)),
        None => Ok(DEFAULT_PORT),
    }
}

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_encrypt: bool) -> Result<()> {
    let config = shield_server::ServerConfig::from_env();

    println!("🚀 Starting Shield API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if config.allows_any_origin() {
        println!("   🌐 CORS: any origin");
    } else {
        println!(
            "   🌐 CORS: {} ({})",
            config.allowed_origins.join(", "),
            shield_server::ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    // Analysis keeps working without storage
    let db = match open_db(db_path, no_encrypt) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!("Database unavailable, serving without storage: {:#}", e);
            None
        }
    };

    shield_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
