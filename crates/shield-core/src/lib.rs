//! Shield Core Library
//!
//! Shared functionality for the Shield financial protection analyzer:
//! - Profile, transaction and alert models with boundary validation
//! - Protection analysis: cash flow, spending, alert rules and scoring
//! - Document store for analyses and alerts, optionally encrypted
//! - CSV transaction import

pub mod analysis;
pub mod db;
pub mod error;
pub mod import;
pub mod models;

pub use analysis::{analyze_financial_protection, AlertEngine, AlertRule, ProtectionAnalyzer};
pub use db::{Collection, CollectionCount, Database, PersistReport, StoredDocument};
pub use error::{Error, Result};
pub use import::parse_transactions_csv;
pub use models::{
    Alert, AlertType, AnalysisRequest, AnalysisResult, AnalysisStats, Budgets, FinancialProfile,
    RiskTolerance, Severity, Transaction,
};
