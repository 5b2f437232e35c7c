//! Protection score: 100 minus weighted deductions, clamped to 0..=100

use crate::models::FinancialProfile;

use super::cash_flow::CashFlow;
use super::coverage::Coverage;

/// Largest deduction for an empty emergency fund
pub const EMERGENCY_FUND_WEIGHT: f64 = 40.0;

/// Deduction per missing insurance coverage
pub const MISSING_COVERAGE_PENALTY: i64 = 10;

/// Deduction when expenses exceed income
pub const NEGATIVE_CASH_FLOW_PENALTY: i64 = 20;

/// Deduction when the monthly surplus is under 10% of expenses
pub const THIN_CASH_FLOW_PENALTY: i64 = 10;

/// Points deducted per pillar
///
/// Deductions stack independently and may add up to more than 100; the
/// score saturates at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub emergency_fund: i64,
    pub insurance: i64,
    pub cash_flow: i64,
}

impl ScoreBreakdown {
    pub fn compute(profile: &FinancialProfile, cash_flow: &CashFlow, target_months: u32) -> Self {
        let target = f64::from(target_months);
        let gap = ((target - cash_flow.burn_rate_months) / target).max(0.0);
        // Saturating cast; only reachable with unvalidated negative savings
        let emergency_fund = (gap * EMERGENCY_FUND_WEIGHT).floor() as i64;

        let insurance = Coverage::count_missing(profile) as i64 * MISSING_COVERAGE_PENALTY;

        let cash_flow_penalty = if cash_flow.monthly_net < 0.0 {
            NEGATIVE_CASH_FLOW_PENALTY
        } else if cash_flow.monthly_net < cash_flow.monthly_expenses * 0.1 {
            THIN_CASH_FLOW_PENALTY
        } else {
            0
        };

        Self {
            emergency_fund,
            insurance,
            cash_flow: cash_flow_penalty,
        }
    }

    pub fn total_deduction(&self) -> i64 {
        self.emergency_fund
            .saturating_add(self.insurance)
            .saturating_add(self.cash_flow)
    }

    pub fn score(&self) -> u8 {
        100i64.saturating_sub(self.total_deduction()).clamp(0, 100) as u8
    }
}
