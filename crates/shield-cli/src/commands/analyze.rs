//! Analyze command implementation

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use shield_core::analysis::analyze_financial_protection;
use shield_core::import::parse_transactions_csv;
use shield_core::models::{
    AnalysisRequest, AnalysisResult, FinancialProfile, Severity, Transaction,
};

use super::{open_db, truncate};

/// Where the analysis input comes from
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeInput {
    /// One JSON file holding the full request
    Request(PathBuf),
    /// A profile file and an optional transactions file
    Profile {
        profile: PathBuf,
        transactions: Option<PathBuf>,
    },
}

impl AnalyzeInput {
    pub fn from_args(
        request: Option<PathBuf>,
        profile: Option<PathBuf>,
        transactions: Option<PathBuf>,
    ) -> Result<Self> {
        match (request, profile) {
            (Some(request), None) if transactions.is_none() => Ok(Self::Request(request)),
            (None, Some(profile)) => Ok(Self::Profile {
                profile,
                transactions,
            }),
            _ => bail!("Pass either --request, or --profile with optional --transactions"),
        }
    }

    /// Read and validate the request
    pub fn load(&self) -> Result<AnalysisRequest> {
        let request = match self {
            Self::Request(path) => read_json::<AnalysisRequest>(path)?,
            Self::Profile {
                profile,
                transactions,
            } => {
                let profile = read_json::<FinancialProfile>(profile)?;
                let transactions = match transactions {
                    Some(path) => load_transactions(path)?,
                    None => vec![],
                };
                AnalysisRequest::new(profile, transactions)
            }
        };

        request.validate().context("Invalid analysis input")?;
        Ok(request)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load transactions from a CSV file or a JSON array, chosen by extension
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        parse_transactions_csv(file)
            .with_context(|| format!("Failed to import {}", path.display()))
    } else {
        read_json(path)
    }
}

pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟡",
        Severity::Low => "🔵",
    }
}

pub fn cmd_analyze(
    db_path: &Path,
    no_encrypt: bool,
    input: &AnalyzeInput,
    json: bool,
    save: bool,
) -> Result<()> {
    let request = input.load()?;
    let result = analyze_financial_protection(&request.profile, &request.transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&request, &result);
    }

    if save {
        let db = open_db(db_path, no_encrypt)?;
        let report = db.persist_analysis(&request, &result);
        if report.is_complete() {
            tracing::info!("Saved {} documents to {}", report.written, db.path());
        } else {
            for error in &report.errors {
                tracing::warn!("{}", error);
            }
            bail!(
                "Saved {} of {} documents",
                report.written,
                report.written + report.failed
            );
        }
    }

    Ok(())
}

fn print_result(request: &AnalysisRequest, result: &AnalysisResult) {
    let stats = &result.stats;

    println!();
    println!("🛡️  Protection score: {}/100", result.score);
    println!("   {}", result.summary);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Profile:          {}", request.profile.email);
    println!("   Monthly income:   {:>12.2}", stats.monthly_income);
    println!("   Monthly expenses: {:>12.2}", stats.monthly_expenses);
    println!("   Monthly net:      {:>12.2}", stats.monthly_net);
    println!("   Savings:          {:>12.2}", stats.savings);
    println!("   Runway (months):  {:>12.2}", stats.burn_rate_months);
    println!(
        "   Total spend:      {:>12.2}  ({} transactions)",
        stats.total_spend,
        request.transactions.len()
    );
    println!();

    if result.alerts.is_empty() {
        println!("✅ No alerts. You look well protected!");
        println!();
        return;
    }

    println!("⚠️  Alerts ({})", result.alerts.len());
    for alert in &result.alerts {
        println!(
            "   {} [{}] {}",
            severity_icon(alert.severity),
            alert.severity,
            alert.alert_type.label()
        );
        println!("      {}", truncate(&alert.message, 100));
    }
    println!();
}
