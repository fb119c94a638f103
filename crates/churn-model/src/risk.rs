//! Mapping from churn probability to the user-facing verdict.

use serde::Serialize;

/// Risk percentages strictly above this are High risk. Exactly 50.00 is Low:
/// the boundary is a fixed, tested constant, not re-derived.
pub const HIGH_RISK_THRESHOLD_PERCENT: f64 = 50.0;

/// Qualitative verdict category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    High,
    Low,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High risk",
            Self::Low => "Low risk",
        }
    }
}

/// The displayed outcome of one prediction.
#[derive(Debug, Clone, Serialize)]
pub struct RiskVerdict {
    /// Churn probability as a percentage, always in [0, 100].
    pub risk_percent: f64,
    pub category: RiskCategory,
}

impl RiskVerdict {
    pub fn recommendation(&self) -> &'static str {
        match self.category {
            RiskCategory::High => "Contact this customer with a retention offer.",
            RiskCategory::Low => "This customer is most likely safe.",
        }
    }
}

/// Categorize a churn probability.
///
/// The probability is clamped into [0, 1] before scaling so the displayed
/// percentage stays in range even for a numerically sloppy classifier.
pub fn categorize(probability: f64) -> RiskVerdict {
    let risk_percent = probability.clamp(0.0, 1.0) * 100.0;
    let category = if risk_percent > HIGH_RISK_THRESHOLD_PERCENT {
        RiskCategory::High
    } else {
        RiskCategory::Low
    };
    RiskVerdict {
        risk_percent,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_at_threshold_is_low_risk() {
        let verdict = categorize(0.5);
        assert_eq!(verdict.risk_percent, 50.0);
        assert_eq!(verdict.category, RiskCategory::Low);
    }

    #[test]
    fn epsilon_above_threshold_is_high_risk() {
        let verdict = categorize(0.5 + 1e-9);
        assert_eq!(verdict.category, RiskCategory::High);
    }

    #[test]
    fn percent_stays_in_range() {
        for &p in &[-0.5, 0.0, 0.25, 0.5, 0.999, 1.0, 1.5] {
            let verdict = categorize(p);
            assert!(
                (0.0..=100.0).contains(&verdict.risk_percent),
                "p={p} gave {}",
                verdict.risk_percent
            );
        }
    }

    #[test]
    fn verdict_wording() {
        assert_eq!(categorize(0.9).category.as_str(), "High risk");
        assert_eq!(
            categorize(0.9).recommendation(),
            "Contact this customer with a retention offer."
        );
        assert_eq!(
            categorize(0.1).recommendation(),
            "This customer is most likely safe."
        );
    }
}
