//! Outflow totals from a transaction list

use std::collections::BTreeMap;

use crate::models::Transaction;

/// Outflow totals, overall and per category
///
/// Only positive (outflow) amounts count. Summation does not depend on the
/// order of the transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingTotals {
    pub total_debits: f64,
    by_category: BTreeMap<String, f64>,
}

impl SpendingTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut totals = Self::default();

        for tx in transactions.iter().filter(|tx| tx.is_outflow()) {
            totals.total_debits += tx.amount;
            if let Some(category) = tx.category_name() {
                *totals.by_category.entry(category.to_string()).or_insert(0.0) += tx.amount;
            }
        }

        totals
    }

    /// Outflows recorded for a category; 0 if never seen
    pub fn category_total(&self, category: &str) -> f64 {
        self.by_category.get(category).copied().unwrap_or(0.0)
    }

    /// Categories with outflows, sorted by name
    pub fn categories(&self) -> impl Iterator<Item = (&str, f64)> {
        self.by_category.iter().map(|(c, total)| (c.as_str(), *total))
    }
}
