//! Financing events shared by both engines.
//!
//! Every capital raise dilutes the founders and costs score. Both the board
//! `Dilute` action and the path `CompleteFundingRound` action go through
//! [`apply_financing`], so ownership and penalty can never drift apart.
use serde::{Deserialize, Serialize};

use crate::constants::DILUTION_PENALTY_PER_POINT;
use crate::numbers::round_f64_to_i64;

/// Record of a completed raise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingEvent {
    pub round: String,
    /// Capital raised in $M.
    pub raised: f64,
    /// Fraction of the company sold, in `[0, 1]`.
    pub dilution: f64,
    pub ownership_before: f64,
    pub ownership_after: f64,
    /// Score points lost to this dilution.
    pub score_penalty: i64,
}

/// Apply a raise to the current founder ownership.
///
/// `dilution` is clamped into `[0, 1]`; ownership after the raise is
/// `ownership * (1 - dilution)`.
#[must_use]
pub fn apply_financing(
    ownership: f64,
    round: impl Into<String>,
    raised: f64,
    dilution: f64,
) -> FinancingEvent {
    let dilution = if dilution.is_finite() {
        dilution.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let ownership_after = (ownership * (1.0 - dilution)).clamp(0.0, 1.0);
    FinancingEvent {
        round: round.into(),
        raised,
        dilution,
        ownership_before: ownership,
        ownership_after,
        score_penalty: dilution_penalty(dilution),
    }
}

/// Score penalty for selling `dilution` of the company.
#[must_use]
pub fn dilution_penalty(dilution: f64) -> i64 {
    round_f64_to_i64(dilution * 100.0 * DILUTION_PENALTY_PER_POINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;

    #[test]
    fn ownership_is_product_of_retained_fractions() {
        let dilutions = [0.2, 0.15, 0.3, 0.0, 0.5];
        let mut ownership = 1.0;
        let mut expected = 1.0;
        for (idx, dilution) in dilutions.iter().enumerate() {
            let event = apply_financing(ownership, format!("r{idx}"), 10.0, *dilution);
            assert!(event.ownership_after <= event.ownership_before);
            ownership = event.ownership_after;
            expected *= 1.0 - dilution;
        }
        assert!((ownership - expected).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn out_of_range_dilution_is_clamped() {
        let event = apply_financing(0.8, "bad", 5.0, 1.7);
        assert!((event.dilution - 1.0).abs() < FLOAT_EPSILON);
        assert!(event.ownership_after.abs() < FLOAT_EPSILON);

        let event = apply_financing(0.8, "neg", 5.0, -0.3);
        assert!((event.ownership_after - 0.8).abs() < FLOAT_EPSILON);
        assert_eq!(event.score_penalty, 0);
    }

    #[test]
    fn penalty_scales_with_percentage_points() {
        assert_eq!(dilution_penalty(0.2), 60);
        assert_eq!(dilution_penalty(0.5), 150);
    }
}
