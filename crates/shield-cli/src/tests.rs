//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use shield_core::db::Database;
use shield_core::models::{AlertType, Severity};
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, truncate, AnalyzeInput};

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn profile_json() -> &'static str {
    r#"{
        "email": "cli@example.com",
        "monthly_income": 5000,
        "monthly_expenses": 4000,
        "savings": 24000,
        "budgets": {"dining": 500}
    }"#
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("shield.db")
}

fn open(path: &Path) -> Database {
    Database::new_unencrypted(path.to_str().unwrap()).unwrap()
}

// ========== Input Loading Tests ==========

#[test]
fn test_load_request_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "request.json",
        &format!(
            r#"{{"profile": {}, "transactions": [{{"description": "Dinner", "amount": 600, "category": "dining"}}]}}"#,
            profile_json()
        ),
    );

    let request = AnalyzeInput::Request(path).load().unwrap();
    assert_eq!(request.profile.email, "cli@example.com");
    assert_eq!(request.transactions.len(), 1);
}

#[test]
fn test_load_profile_with_csv_transactions() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", profile_json());
    let csv = write_file(
        &dir,
        "transactions.CSV",
        "Date,Description,Category,Amount\n01/05/2024,Dinner,dining,$600.00\n",
    );

    let request = AnalyzeInput::Profile {
        profile,
        transactions: Some(csv),
    }
    .load()
    .unwrap();

    assert_eq!(request.transactions.len(), 1);
    assert_eq!(request.transactions[0].date.as_deref(), Some("2024-01-05"));
    assert_eq!(request.transactions[0].amount, 600.0);
}

#[test]
fn test_load_profile_with_json_transactions() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", profile_json());
    let txs = write_file(
        &dir,
        "transactions.json",
        r#"[{"description": "Gas", "amount": 40}, {"description": "Refund", "amount": -10}]"#,
    );

    let request = AnalyzeInput::Profile {
        profile,
        transactions: Some(txs),
    }
    .load()
    .unwrap();
    assert_eq!(request.transactions.len(), 2);
}

#[test]
fn test_load_profile_without_transactions() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", profile_json());

    let request = AnalyzeInput::Profile {
        profile,
        transactions: None,
    }
    .load()
    .unwrap();
    assert!(request.transactions.is_empty());
}

#[test]
fn test_load_rejects_invalid_profile() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(
        &dir,
        "profile.json",
        r#"{"email": "", "monthly_income": 1, "monthly_expenses": 1}"#,
    );

    let err = AnalyzeInput::Profile {
        profile,
        transactions: None,
    }
    .load()
    .unwrap_err();
    assert!(format!("{:#}", err).contains("email is required"));
}

#[test]
fn test_load_reports_missing_file() {
    let err = AnalyzeInput::Request(PathBuf::from("/nonexistent/request.json"))
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}

#[test]
fn test_analyze_input_from_args() {
    let input = AnalyzeInput::from_args(Some("r.json".into()), None, None).unwrap();
    assert_eq!(input, AnalyzeInput::Request("r.json".into()));

    let input =
        AnalyzeInput::from_args(None, Some("p.json".into()), Some("t.csv".into())).unwrap();
    assert_eq!(
        input,
        AnalyzeInput::Profile {
            profile: "p.json".into(),
            transactions: Some("t.csv".into()),
        }
    );

    assert!(AnalyzeInput::from_args(None, None, None).is_err());
    assert!(AnalyzeInput::from_args(Some("r.json".into()), Some("p.json".into()), None).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_cmd_init() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());
}

#[test]
fn test_cmd_analyze_with_save() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let profile = write_file(&dir, "profile.json", profile_json());
    let csv = write_file(
        &dir,
        "transactions.csv",
        "description,amount,category\nDinner,600,dining\n",
    );
    let input = AnalyzeInput::Profile {
        profile,
        transactions: Some(csv),
    };

    commands::cmd_analyze(&path, true, &input, false, true).unwrap();

    let db = open(&path);
    let alerts = db.list_alerts_for_user("cli@example.com").unwrap();
    let types: Vec<AlertType> = alerts.iter().map(|a| a.alert_type).collect();
    assert_eq!(
        types,
        vec![
            AlertType::MissingHealthInsurance,
            AlertType::MissingRentersInsurance,
            AlertType::MissingAutoInsurance,
            AlertType::BudgetExceeded,
        ]
    );
    assert_eq!(alerts[3].severity, Severity::Medium);
}

#[test]
fn test_cmd_analyze_without_save_leaves_no_database() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let profile = write_file(&dir, "profile.json", profile_json());
    let input = AnalyzeInput::Profile {
        profile,
        transactions: None,
    };

    commands::cmd_analyze(&path, true, &input, true, false).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_cmd_alerts_and_status() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let profile = write_file(&dir, "profile.json", profile_json());
    let input = AnalyzeInput::Profile {
        profile,
        transactions: None,
    };
    commands::cmd_analyze(&path, true, &input, false, true).unwrap();

    assert!(commands::cmd_alerts(&path, "cli@example.com", true).is_ok());
    assert!(commands::cmd_alerts(&path, "nobody@example.com", true).is_ok());
    assert!(commands::cmd_status(&path, true).is_ok());
}

#[test]
fn test_cmd_status_without_database() {
    let dir = TempDir::new().unwrap();
    assert!(commands::cmd_status(&db_path(&dir), true).is_ok());
}

// ========== Helper Tests ==========

#[test]
fn test_resolve_port() {
    assert_eq!(commands::resolve_port(Some(9000), Some("7000".into())).unwrap(), 9000);
    assert_eq!(commands::resolve_port(None, Some("7000".into())).unwrap(), 7000);
    assert_eq!(commands::resolve_port(None, None).unwrap(), 8000);
    assert_eq!(commands::resolve_port(None, Some("  ".into())).unwrap(), 8000);
    assert!(commands::resolve_port(None, Some("http".into())).is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer message", 10), "a longe...");
    assert_eq!(truncate("ümlaut ümlaut", 8), "ümlau...");
}

#[test]
fn test_severity_icons() {
    assert_eq!(commands::severity_icon(Severity::High), "🔴");
    assert_eq!(commands::severity_icon(Severity::Low), "🔵");
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_analyze_args() {
    let cli = Cli::try_parse_from([
        "shield",
        "--no-encrypt",
        "analyze",
        "--profile",
        "p.json",
        "--transactions",
        "t.csv",
        "--json",
    ])
    .unwrap();
    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Analyze {
            profile,
            transactions,
            json,
            save,
            ..
        } => {
            assert_eq!(profile, Some(PathBuf::from("p.json")));
            assert_eq!(transactions, Some(PathBuf::from("t.csv")));
            assert!(json);
            assert!(!save);
        }
        _ => panic!("expected analyze"),
    }
}

#[test]
fn test_analyze_requires_input() {
    assert!(Cli::try_parse_from(["shield", "analyze"]).is_err());
    assert!(Cli::try_parse_from([
        "shield",
        "analyze",
        "--request",
        "r.json",
        "--profile",
        "p.json"
    ])
    .is_err());
    assert!(Cli::try_parse_from(["shield", "analyze", "--transactions", "t.csv"]).is_err());
}

#[test]
fn test_parse_serve_defaults() {
    let cli = Cli::try_parse_from(["shield", "serve"]).unwrap();
    assert_eq!(cli.db, PathBuf::from("shield.db"));
    match cli.command {
        Commands::Serve { port, host } => {
            assert_eq!(port, None);
            assert_eq!(host, "0.0.0.0");
        }
        _ => panic!("expected serve"),
    }
}
