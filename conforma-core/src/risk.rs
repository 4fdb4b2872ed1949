//! Risk scoring.
//!
//! A 5x5 probability/impact matrix collapsed onto the product and
//! bucketed into five labels. Pure lookup, no state.

use serde::{Deserialize, Serialize};

/// Ordinal risk level, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "veryLow",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Map (probability, impact), each in 1..=5, onto a risk level.
///
/// Thresholds over the product p*i:
/// <=2 very low, 3..=5 low, 6..=10 medium, 11..=16 high, >=17 critical.
/// Monotonic non-decreasing in both inputs. Inputs are clamped into
/// 1..=5; range validation is the request boundary's job.
pub fn risk_level(probability: u8, impact: u8) -> RiskLevel {
    let p = probability.clamp(1, 5) as u16;
    let i = impact.clamp(1, 5) as u16;

    match p * i {
        0..=2 => RiskLevel::VeryLow,
        3..=5 => RiskLevel::Low,
        6..=10 => RiskLevel::Medium,
        11..=16 => RiskLevel::High,
        _ => RiskLevel::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_values() {
        assert_eq!(risk_level(1, 1), RiskLevel::VeryLow);
        assert_eq!(risk_level(1, 2), RiskLevel::VeryLow);
        assert_eq!(risk_level(1, 5), RiskLevel::Low);
        assert_eq!(risk_level(2, 3), RiskLevel::Medium);
        assert_eq!(risk_level(2, 5), RiskLevel::Medium);
        assert_eq!(risk_level(3, 4), RiskLevel::High);
        assert_eq!(risk_level(4, 4), RiskLevel::High);
        assert_eq!(risk_level(4, 5), RiskLevel::Critical);
        assert_eq!(risk_level(5, 5), RiskLevel::Critical);
    }

    #[test]
    fn all_five_levels_are_reachable() {
        let mut seen = std::collections::BTreeSet::new();
        for p in 1..=5 {
            for i in 1..=5 {
                seen.insert(risk_level(p, i));
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn monotonic_in_both_inputs() {
        for p in 1..=5u8 {
            for i in 1..=5u8 {
                let here = risk_level(p, i);
                if p < 5 {
                    assert!(risk_level(p + 1, i) >= here, "p {} i {}", p, i);
                }
                if i < 5 {
                    assert!(risk_level(p, i + 1) >= here, "p {} i {}", p, i);
                }
            }
        }
    }

    #[test]
    fn out_of_range_inputs_clamp() {
        assert_eq!(risk_level(0, 0), RiskLevel::VeryLow);
        assert_eq!(risk_level(9, 9), RiskLevel::Critical);
    }
}
