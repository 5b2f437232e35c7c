//! Alert rules and the engine that runs them
//!
//! Each rule looks at the same [`RuleContext`] and knows nothing about the
//! others. The engine evaluates them in registration order, so the alert
//! list is deterministic.

use serde_json::json;

use crate::models::{Alert, AlertType, FinancialProfile, Severity};

use super::cash_flow::CashFlow;
use super::coverage::Coverage;
use super::round2;
use super::spending::SpendingTotals;

/// Inputs every rule can look at
pub struct RuleContext<'a> {
    pub profile: &'a FinancialProfile,
    pub cash_flow: &'a CashFlow,
    pub spending: &'a SpendingTotals,
    /// Emergency fund target for the profile's risk tolerance
    pub target_months: u32,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        profile: &'a FinancialProfile,
        cash_flow: &'a CashFlow,
        spending: &'a SpendingTotals,
    ) -> Self {
        Self {
            profile,
            cash_flow,
            spending,
            target_months: profile.risk_tolerance.target_months(),
        }
    }

    fn alert(&self, alert_type: AlertType, severity: Severity, message: impl Into<String>) -> Alert {
        Alert::new(&self.profile.email, alert_type, severity, message)
    }
}

/// A single financial-risk check
pub trait AlertRule: Send + Sync {
    /// Type of alert this rule raises
    fn alert_type(&self) -> AlertType;

    /// Evaluate the rule
    ///
    /// Most rules return zero or one alert; per-category rules may return several.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert>;
}

/// Savings cover fewer months than the risk-based target
pub struct EmergencyFundRule;

impl AlertRule for EmergencyFundRule {
    fn alert_type(&self) -> AlertType {
        AlertType::EmergencyFundShortfall
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert> {
        let target = f64::from(ctx.target_months);
        let burn = ctx.cash_flow.burn_rate_months;
        // Comparisons are written as the trigger so NaN input never fires
        let short = burn < target;
        if !short {
            return vec![];
        }

        let shortfall = (target * ctx.cash_flow.monthly_expenses - ctx.cash_flow.savings).max(0.0);
        let severity = if burn < target / 2.0 {
            Severity::High
        } else {
            Severity::Medium
        };

        vec![ctx
            .alert(
                self.alert_type(),
                severity,
                format!(
                    "Emergency fund covers {:.1} months; target is {} months.",
                    burn, ctx.target_months
                ),
            )
            .with_data(json!({
                "shortfall": round2(shortfall),
                "target_months": ctx.target_months,
            }))]
    }
}

/// An expected insurance coverage is missing
pub struct MissingCoverageRule {
    coverage: Coverage,
}

impl MissingCoverageRule {
    pub fn new(coverage: Coverage) -> Self {
        Self { coverage }
    }
}

impl AlertRule for MissingCoverageRule {
    fn alert_type(&self) -> AlertType {
        match self.coverage {
            Coverage::Health => AlertType::MissingHealthInsurance,
            Coverage::Renters => AlertType::MissingRentersInsurance,
            Coverage::Auto => AlertType::MissingAutoInsurance,
            Coverage::Life => AlertType::MissingLifeInsurance,
        }
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert> {
        if !self.coverage.is_missing(ctx.profile) {
            return vec![];
        }

        let alert = match self.coverage {
            Coverage::Health => ctx.alert(
                self.alert_type(),
                Severity::High,
                "Health insurance not detected.",
            ),
            Coverage::Renters => ctx.alert(
                self.alert_type(),
                Severity::Medium,
                "Renter's/home insurance not detected.",
            ),
            Coverage::Auto => {
                // Only worth raising when there is spending to protect
                let has_spending = ctx.spending.total_debits > 0.0;
                if !has_spending {
                    return vec![];
                }
                ctx.alert(
                    self.alert_type(),
                    Severity::Medium,
                    "Auto insurance not detected.",
                )
            }
            Coverage::Life => ctx
                .alert(
                    self.alert_type(),
                    Severity::High,
                    "Life insurance recommended when you have dependents.",
                )
                .with_data(json!({ "dependents": ctx.profile.dependents })),
        };

        vec![alert]
    }
}

/// Outflows exceed monthly income by more than 10%
pub struct OverspendingRule;

impl AlertRule for OverspendingRule {
    fn alert_type(&self) -> AlertType {
        AlertType::Overspending
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert> {
        let income = ctx.cash_flow.monthly_income;
        let spend = ctx.spending.total_debits;
        let overspent = income > 0.0 && spend > income * 1.1;
        if !overspent {
            return vec![];
        }

        vec![ctx
            .alert(
                self.alert_type(),
                Severity::Medium,
                "Recent spending exceeds monthly income by more than 10%.",
            )
            .with_data(json!({
                "income": income,
                "spend": round2(spend),
            }))]
    }
}

/// One alert per budgeted category that went over its limit
pub struct BudgetRule;

impl AlertRule for BudgetRule {
    fn alert_type(&self) -> AlertType {
        AlertType::BudgetExceeded
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert> {
        let Some(budgets) = &ctx.profile.budgets else {
            return vec![];
        };

        budgets
            .iter()
            // A zero limit means "no budget"
            .filter(|(_, limit)| *limit != 0.0)
            .filter_map(|(category, limit)| {
                let spent = ctx.spending.category_total(category);
                let exceeded = spent > limit;
                if !exceeded {
                    return None;
                }
                let severity = if spent <= limit * 1.1 {
                    Severity::Low
                } else {
                    Severity::Medium
                };
                Some(
                    ctx.alert(
                        self.alert_type(),
                        severity,
                        format!(
                            "Spending in {} is {:.2} which exceeds your budget {:.2}.",
                            category, spent, limit
                        ),
                    )
                    .with_data(json!({
                        "category": category,
                        "spent": round2(spent),
                        "limit": limit,
                    })),
                )
            })
            .collect()
    }
}

/// Ordered collection of alert rules
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertEngine {
    /// Create an engine with the built-in rules in their standard order
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(EmergencyFundRule));
        for coverage in Coverage::ALL {
            engine.register(Box::new(MissingCoverageRule::new(coverage)));
        }
        engine.register(Box::new(OverspendingRule));
        engine.register(Box::new(BudgetRule));

        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn AlertRule>) {
        self.rules.push(rule);
    }

    /// Run every rule in order and collect the alerts
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Alert> {
        let mut alerts = vec![];

        for rule in &self.rules {
            let raised = rule.evaluate(ctx);
            if !raised.is_empty() {
                tracing::debug!(
                    rule = rule.alert_type().as_str(),
                    count = raised.len(),
                    "Alert rule triggered"
                );
            }
            alerts.extend(raised);
        }

        alerts
    }

    /// Alert types of the registered rules, in evaluation order
    pub fn alert_types(&self) -> Vec<AlertType> {
        self.rules.iter().map(|r| r.alert_type()).collect()
    }
}
