//! Net cash flow and emergency fund runway

use crate::models::FinancialProfile;

/// Runway reported when there are no expenses to burn through
pub const ZERO_EXPENSE_RUNWAY_MONTHS: f64 = 12.0;

/// Cash flow figures derived from a profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub savings: f64,
    /// Income minus expenses, unrounded; may be negative
    pub monthly_net: f64,
    /// Months of expenses covered by savings
    pub burn_rate_months: f64,
}

impl CashFlow {
    pub fn compute(monthly_income: f64, monthly_expenses: f64, savings: f64) -> Self {
        let burn_rate_months = if monthly_expenses > 0.0 {
            savings / monthly_expenses
        } else {
            ZERO_EXPENSE_RUNWAY_MONTHS
        };

        Self {
            monthly_income,
            monthly_expenses,
            savings,
            monthly_net: monthly_income - monthly_expenses,
            burn_rate_months,
        }
    }

    pub fn from_profile(profile: &FinancialProfile) -> Self {
        Self::compute(
            profile.monthly_income,
            profile.monthly_expenses,
            profile.savings,
        )
    }
}
