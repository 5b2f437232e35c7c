//! Status-related command implementations (status, alerts)

use std::path::Path;

use anyhow::{Context, Result};
use shield_core::db::DB_KEY_ENV;

use super::{open_db, severity_icon, truncate};

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Shield Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok(collections) = db.list_collections() {
                    println!();
                    if collections.is_empty() {
                        println!("   No documents stored yet");
                    }
                    for c in collections {
                        println!("   {:<16} {}", c.name, c.count);
                    }
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_alerts(db_path: &Path, email: &str, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let alerts = db
        .list_alerts_for_user(email)
        .with_context(|| format!("Failed to load alerts for {}", email))?;

    if alerts.is_empty() {
        println!("✅ No stored alerts for {}", email);
        return Ok(());
    }

    println!();
    println!("⚠️  Alerts for {} ({})", email, alerts.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for alert in &alerts {
        println!(
            "   {} {} [{}]",
            severity_icon(alert.severity),
            alert.alert_type.label(),
            alert.severity
        );
        println!("      {}", truncate(&alert.message, 100));
        if !alert.data.is_empty() {
            let data = serde_json::Value::Object(alert.data.clone());
            println!("      {}", data);
        }
        println!();
    }

    Ok(())
}
