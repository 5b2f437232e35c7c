//! Domain models for Shield
//!
//! Everything here is a plain value: a profile and its transactions go into
//! one analysis call, and an [`AnalysisResult`] with its [`Alert`]s comes out.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// How much risk the user is willing to carry, which sets the emergency fund target
///
/// Values outside `low | medium | high` are kept verbatim as `Unrecognized`
/// and are treated like `low` when picking a target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
    Unrecognized(String),
}

impl RiskTolerance {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized(s) => s,
        }
    }

    /// Months of expenses the emergency fund should cover
    pub fn target_months(&self) -> u32 {
        match self {
            Self::High => 3,
            Self::Medium => 6,
            Self::Low | Self::Unrecognized(_) => 9,
        }
    }
}

impl From<String> for RiskTolerance {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<&str> for RiskTolerance {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RiskTolerance> for String {
    fn from(risk: RiskTolerance) -> Self {
        match risk {
            RiskTolerance::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly spending limits per category, kept in the order they were given
///
/// Serialized as a JSON object. A repeated key keeps its first position and
/// takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Budgets(Vec<(String, f64)>);

impl Budgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit for a category
    pub fn insert(&mut self, category: impl Into<String>, limit: f64) {
        let category = category.into();
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = limit,
            None => self.0.push((category, limit)),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, limit)| *limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(c, limit)| (c.as_str(), *limit))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Budgets {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut budgets = Budgets::new();
        for (category, limit) in iter {
            budgets.insert(category, limit);
        }
        budgets
    }
}

impl Serialize for Budgets {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, limit) in &self.0 {
            map.serialize_entry(category, limit)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Budgets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BudgetsVisitor;

        impl<'de> Visitor<'de> for BudgetsVisitor {
            type Value = Budgets;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to monthly limits")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Budgets, A::Error> {
                let mut budgets = Budgets::new();
                while let Some((category, limit)) = access.next_entry::<String, f64>()? {
                    budgets.insert(category, limit);
                }
                Ok(budgets)
            }
        }

        deserializer.deserialize_map(BudgetsVisitor)
    }
}

/// A user's financial situation for one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    /// User email, used to associate stored data
    pub email: String,
    /// Average monthly income
    pub monthly_income: f64,
    /// Average monthly fixed expenses
    pub monthly_expenses: f64,
    /// Liquid savings available for emergencies
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub dependents: u32,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub insurance_health: bool,
    #[serde(default)]
    pub insurance_renters: bool,
    #[serde(default)]
    pub insurance_auto: bool,
    #[serde(default)]
    pub insurance_life: bool,
    /// Optional category budgets per month
    #[serde(default)]
    pub budgets: Option<Budgets>,
}

impl FinancialProfile {
    /// Create a profile with default savings, dependents, risk and coverage
    pub fn new(email: impl Into<String>, monthly_income: f64, monthly_expenses: f64) -> Self {
        Self {
            email: email.into(),
            monthly_income,
            monthly_expenses,
            ..Default::default()
        }
    }

    /// Check the bounds the analysis assumes
    ///
    /// Unrecognized risk tolerances are accepted.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::InvalidData("email is required".into()));
        }

        let amounts = [
            ("monthly_income", self.monthly_income),
            ("monthly_expenses", self.monthly_expenses),
            ("savings", self.savings),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(Error::InvalidData(format!("{} must be a number", field)));
            }
            if value < 0.0 {
                return Err(Error::InvalidData(format!(
                    "{} must be greater than or equal to 0",
                    field
                )));
            }
        }

        if let Some(budgets) = &self.budgets {
            for (category, limit) in budgets.iter() {
                if !limit.is_finite() {
                    return Err(Error::InvalidData(format!(
                        "budget for {} must be a number",
                        category
                    )));
                }
            }
        }

        Ok(())
    }
}

/// One ledger entry
///
/// Positive amounts are outflows (debits), negative amounts are inflows (credits).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date as YYYY-MM-DD
    #[serde(default)]
    pub date: Option<String>,
    pub description: String,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: f64,
    /// debit | credit
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
}

impl Transaction {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Money leaving the account
    pub fn is_outflow(&self) -> bool {
        self.amount > 0.0
    }

    /// Category name, if one was given and is not empty
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount for '{}' must be a number",
                self.description
            )));
        }
        if let Some(date) = &self.date {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                Error::InvalidData(format!("date '{}' is not in YYYY-MM-DD format", date))
            })?;
        }
        Ok(())
    }
}

/// A profile plus the transactions to analyze with it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub profile: FinancialProfile,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl AnalysisRequest {
    pub fn new(profile: FinancialProfile, transactions: Vec<Transaction>) -> Self {
        Self {
            profile,
            transactions,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        for (i, tx) in self.transactions.iter().enumerate() {
            tx.validate().map_err(|e| match e {
                Error::InvalidData(msg) => {
                    Error::InvalidData(format!("transaction {}: {}", i + 1, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// How serious an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Types of alerts the rule battery can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Savings cover fewer months than the risk-based target
    EmergencyFundShortfall,
    MissingHealthInsurance,
    MissingRentersInsurance,
    MissingAutoInsurance,
    MissingLifeInsurance,
    /// Outflows exceed monthly income by more than 10%
    Overspending,
    /// A budgeted category went over its limit
    BudgetExceeded,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFundShortfall => "emergency_fund_shortfall",
            Self::MissingHealthInsurance => "missing_health_insurance",
            Self::MissingRentersInsurance => "missing_renters_insurance",
            Self::MissingAutoInsurance => "missing_auto_insurance",
            Self::MissingLifeInsurance => "missing_life_insurance",
            Self::Overspending => "overspending",
            Self::BudgetExceeded => "budget_exceeded",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyFundShortfall => "Emergency Fund Shortfall",
            Self::MissingHealthInsurance => "Missing Health Insurance",
            Self::MissingRentersInsurance => "Missing Renter's Insurance",
            Self::MissingAutoInsurance => "Missing Auto Insurance",
            Self::MissingLifeInsurance => "Missing Life Insurance",
            Self::Overspending => "Overspending",
            Self::BudgetExceeded => "Budget Exceeded",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "emergency_fund_shortfall" => Ok(Self::EmergencyFundShortfall),
            "missing_health_insurance" => Ok(Self::MissingHealthInsurance),
            "missing_renters_insurance" => Ok(Self::MissingRentersInsurance),
            "missing_auto_insurance" => Ok(Self::MissingAutoInsurance),
            "missing_life_insurance" => Ok(Self::MissingLifeInsurance),
            "overspending" => Ok(Self::Overspending),
            "budget_exceeded" => Ok(Self::BudgetExceeded),
            _ => Err(format!("Unknown alert type: {}", s)),
        }
    }
}

/// Rule-specific diagnostic payload attached to an alert
pub type AlertData = serde_json::Map<String, serde_json::Value>;

/// A warning raised by one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub user_email: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub data: AlertData,
}

impl Alert {
    pub fn new(
        user_email: impl Into<String>,
        alert_type: AlertType,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            alert_type,
            severity,
            message: message.into(),
            data: AlertData::new(),
        }
    }

    /// Attach a payload; non-object values are ignored
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = data {
            self.data = map;
        }
        self
    }
}

/// Summary figures reported with every analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_net: f64,
    pub savings: f64,
    pub burn_rate_months: f64,
    pub total_spend: f64,
}

/// Output of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Protection score, always within 0..=100
    pub score: u8,
    pub summary: String,
    pub alerts: Vec<Alert>,
    pub stats: AnalysisStats,
}
