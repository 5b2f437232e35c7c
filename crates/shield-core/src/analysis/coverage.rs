//! Insurance coverage checks shared by the alert rules and the score

use crate::models::FinancialProfile;

/// Kinds of insurance the analysis looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Health,
    Renters,
    Auto,
    Life,
}

impl Coverage {
    pub const ALL: [Coverage; 4] = [
        Coverage::Health,
        Coverage::Renters,
        Coverage::Auto,
        Coverage::Life,
    ];

    /// Whether the profile lacks this coverage where it is expected
    ///
    /// Life insurance is only expected when there are dependents.
    pub fn is_missing(&self, profile: &FinancialProfile) -> bool {
        match self {
            Coverage::Health => !profile.insurance_health,
            Coverage::Renters => !profile.insurance_renters,
            Coverage::Auto => !profile.insurance_auto,
            Coverage::Life => profile.dependents > 0 && !profile.insurance_life,
        }
    }

    /// Number of expected coverages the profile is missing
    pub fn count_missing(profile: &FinancialProfile) -> usize {
        Self::ALL.iter().filter(|c| c.is_missing(profile)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_only_expected_with_dependents() {
        let mut profile = FinancialProfile::new("a@example.com", 0.0, 0.0);
        assert!(!Coverage::Life.is_missing(&profile));

        profile.dependents = 2;
        assert!(Coverage::Life.is_missing(&profile));

        profile.insurance_life = true;
        assert!(!Coverage::Life.is_missing(&profile));
    }

    #[test]
    fn test_count_missing() {
        let mut profile = FinancialProfile::new("a@example.com", 0.0, 0.0);
        assert_eq!(Coverage::count_missing(&profile), 3);

        profile.dependents = 1;
        assert_eq!(Coverage::count_missing(&profile), 4);

        profile.insurance_health = true;
        profile.insurance_renters = true;
        profile.insurance_auto = true;
        profile.insurance_life = true;
        assert_eq!(Coverage::count_missing(&profile), 0);
    }
}
