//! Financial protection analysis
//!
//! A pure, deterministic pass from a profile and its transactions to an
//! [`AnalysisResult`]:
//!
//! 1. **Cash flow** - net monthly cash flow and emergency fund runway
//! 2. **Spending** - outflow totals, overall and per category
//! 3. **Alerts** - an ordered battery of independent rules
//! 4. **Score** - weighted 0-100 protection score
//! 5. **Assembly** - stats and a one-line summary
//!
//! Nothing here touches storage, the clock, or shared state, so calls can
//! run concurrently without coordination.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shield_core::analysis::analyze_financial_protection;
//!
//! let result = analyze_financial_protection(&request.profile, &request.transactions);
//! println!("{}", result.summary);
//! ```

pub mod cash_flow;
pub mod coverage;
pub mod rules;
pub mod score;
pub mod spending;

pub use cash_flow::{CashFlow, ZERO_EXPENSE_RUNWAY_MONTHS};
pub use coverage::Coverage;
pub use rules::{
    AlertEngine, AlertRule, BudgetRule, EmergencyFundRule, MissingCoverageRule, OverspendingRule,
    RuleContext,
};
pub use score::ScoreBreakdown;
pub use spending::SpendingTotals;

use crate::models::{AnalysisResult, AnalysisStats, FinancialProfile, Transaction};

/// Round to 2 decimal places
///
/// Rounds the exact binary value, so 2.675 (stored as 2.67499...) gives 2.67.
pub(crate) fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Analyze a profile with the built-in rule battery
pub fn analyze_financial_protection(
    profile: &FinancialProfile,
    transactions: &[Transaction],
) -> AnalysisResult {
    ProtectionAnalyzer::new().analyze(profile, transactions)
}

/// Runs the analysis stages with a configurable alert engine
pub struct ProtectionAnalyzer {
    engine: AlertEngine,
}

impl Default for ProtectionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtectionAnalyzer {
    pub fn new() -> Self {
        Self::with_engine(AlertEngine::new())
    }

    pub fn with_engine(engine: AlertEngine) -> Self {
        Self { engine }
    }

    pub fn analyze(
        &self,
        profile: &FinancialProfile,
        transactions: &[Transaction],
    ) -> AnalysisResult {
        let cash_flow = CashFlow::from_profile(profile);
        let spending = SpendingTotals::from_transactions(transactions);
        let ctx = RuleContext::new(profile, &cash_flow, &spending);

        let alerts = self.engine.evaluate(&ctx);
        let breakdown = ScoreBreakdown::compute(profile, &cash_flow, ctx.target_months);
        let score = breakdown.score();

        let stats = AnalysisStats {
            monthly_income: cash_flow.monthly_income,
            monthly_expenses: cash_flow.monthly_expenses,
            monthly_net: round2(cash_flow.monthly_net),
            savings: cash_flow.savings,
            burn_rate_months: round2(cash_flow.burn_rate_months),
            total_spend: round2(spending.total_debits),
        };

        let summary = format!(
            "Protection score {}/100. Net cash flow {:.1} per month. \
             Emergency fund covers {:.1} months (target {}). Generated {} alerts.",
            score,
            cash_flow.monthly_net,
            cash_flow.burn_rate_months,
            ctx.target_months,
            alerts.len()
        );

        tracing::debug!(
            user = %profile.email,
            score,
            alerts = alerts.len(),
            transactions = transactions.len(),
            "Protection analysis complete"
        );

        AnalysisResult {
            score,
            summary,
            alerts,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertType, Budgets, RiskTolerance, Severity};

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005e3), 1005.0);
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(-1000.0), -1000.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }

    #[test]
    fn test_round2_below_midpoint() {
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(-2.675), -2.67);
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_total_spend_rounds_stored_value() {
        let profile = FinancialProfile::new("r@example.com", 5000.0, 1000.0);
        let result = analyze_financial_protection(&profile, &[Transaction::new("x", 2.675)]);
        assert_eq!(result.stats.total_spend, 2.67);
    }

    #[test]
    fn test_uninsured_but_funded_profile() {
        let mut profile = FinancialProfile::new("a@example.com", 5000.0, 4000.0);
        profile.savings = 24000.0;

        let result = analyze_financial_protection(&profile, &[]);

        assert_eq!(result.stats.burn_rate_months, 6.0);
        let types: Vec<AlertType> = result.alerts.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                AlertType::MissingHealthInsurance,
                AlertType::MissingRentersInsurance
            ]
        );
        // Health, renters and auto all count against the score
        assert_eq!(result.score, 70);
        assert_eq!(
            result.summary,
            "Protection score 70/100. Net cash flow 1000.0 per month. \
             Emergency fund covers 6.0 months (target 6). Generated 2 alerts."
        );
    }

    #[test]
    fn test_no_savings_and_no_income() {
        let profile = FinancialProfile {
            insurance_health: true,
            insurance_renters: true,
            insurance_auto: true,
            insurance_life: true,
            ..FinancialProfile::new("b@example.com", 0.0, 1000.0)
        };

        let result = analyze_financial_protection(&profile, &[]);

        assert_eq!(result.stats.burn_rate_months, 0.0);
        assert_eq!(result.alerts.len(), 1);
        assert_eq!(result.alerts[0].alert_type, AlertType::EmergencyFundShortfall);
        assert_eq!(result.alerts[0].severity, Severity::High);
        assert_eq!(result.alerts[0].data["shortfall"], 6000.0);
        assert_eq!(result.score, 40);
        assert_eq!(result.stats.monthly_net, -1000.0);
    }

    #[test]
    fn test_budget_overrun() {
        let mut budgets = Budgets::new();
        budgets.insert("dining", 500.0);
        let profile = FinancialProfile {
            budgets: Some(budgets),
            insurance_health: true,
            insurance_renters: true,
            insurance_auto: true,
            ..FinancialProfile::new("c@example.com", 5000.0, 0.0)
        };
        let txs = vec![Transaction::new("Restaurant", 600.0).with_category("dining")];

        let result = analyze_financial_protection(&profile, &txs);

        let budget = result
            .alerts
            .iter()
            .find(|a| a.alert_type == AlertType::BudgetExceeded)
            .unwrap();
        assert_eq!(budget.severity, Severity::Medium);
        assert_eq!(
            serde_json::Value::Object(budget.data.clone()),
            serde_json::json!({"category": "dining", "spent": 600.0, "limit": 500.0})
        );
        assert_eq!(result.stats.total_spend, 600.0);
    }

    #[test]
    fn test_stats_rounding() {
        let mut profile = FinancialProfile::new("d@example.com", 3333.333, 1111.111);
        profile.savings = 1234.5678;
        let txs = vec![
            Transaction::new("a", 10.005),
            Transaction::new("b", 0.001),
            Transaction::new("credit", -99.0),
        ];

        let result = analyze_financial_protection(&profile, &txs);

        assert_eq!(result.stats.monthly_income, 3333.333);
        assert_eq!(result.stats.monthly_expenses, 1111.111);
        assert_eq!(result.stats.savings, 1234.5678);
        assert_eq!(result.stats.monthly_net, 2222.22);
        assert_eq!(result.stats.burn_rate_months, 1.11);
        assert_eq!(result.stats.total_spend, 10.01);
    }

    #[test]
    fn test_summary_uses_unrounded_net() {
        let profile = FinancialProfile::new("e@example.com", 1000.0, 999.96);
        let result = analyze_financial_protection(&profile, &[]);
        assert!(result.summary.contains("Net cash flow 0.0 per month"));
    }

    #[test]
    fn test_score_always_in_range() {
        let risks = ["low", "medium", "high", "other"];
        let amounts = [0.0, 1.0, 999.0, 5000.0, 1.0e9];
        for risk in risks {
            for &income in &amounts {
                for &expenses in &amounts {
                    for &savings in &amounts {
                        for dependents in [0, 3] {
                            let profile = FinancialProfile {
                                savings,
                                dependents,
                                risk_tolerance: RiskTolerance::from(risk),
                                ..FinancialProfile::new("f@example.com", income, expenses)
                            };
                            let result = analyze_financial_protection(
                                &profile,
                                &[Transaction::new("x", income * 2.0)],
                            );
                            assert!(result.score <= 100);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut budgets = Budgets::new();
        budgets.insert("b", 10.0);
        budgets.insert("a", 10.0);
        let profile = FinancialProfile {
            savings: 50.0,
            dependents: 1,
            budgets: Some(budgets),
            ..FinancialProfile::new("g@example.com", 100.0, 200.0)
        };
        let txs = vec![
            Transaction::new("x", 30.0).with_category("a"),
            Transaction::new("y", 40.0).with_category("b"),
        ];

        let first = analyze_financial_protection(&profile, &txs);
        let second = analyze_financial_protection(&profile, &txs);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_custom_engine() {
        let analyzer = ProtectionAnalyzer::with_engine(AlertEngine::empty());
        let profile = FinancialProfile::new("h@example.com", 0.0, 1000.0);
        let result = analyzer.analyze(&profile, &[]);
        assert!(result.alerts.is_empty());
        // Score does not depend on which rules are registered
        assert_eq!(result.score, 100 - 40 - 30 - 20);
    }
}
