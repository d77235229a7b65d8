//! Funding round catalog and the confidence-scaled term sheet.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIDENCE_MAX, CONFIDENCE_MULTIPLIER_BASE, CONFIDENCE_MULTIPLIER_SPAN,
    FUNDING_RUNWAY_THRESHOLD_QUARTERS,
};
use crate::path::state::PathGameState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        f64::midpoint(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRoundDef {
    pub id: &'static str,
    pub name: &'static str,
    /// Raise size in $M.
    pub typical_raise: Band,
    /// Fraction of the company sold.
    pub dilution: Band,
}

pub static FUNDING_ROUND_DEFS: [FundingRoundDef; 5] = [
    FundingRoundDef {
        id: "seed",
        name: "Seed",
        typical_raise: Band::new(5.0, 15.0),
        dilution: Band::new(0.15, 0.25),
    },
    FundingRoundDef {
        id: "series-a",
        name: "Series A",
        typical_raise: Band::new(20.0, 50.0),
        dilution: Band::new(0.20, 0.30),
    },
    FundingRoundDef {
        id: "series-b",
        name: "Series B",
        typical_raise: Band::new(50.0, 100.0),
        dilution: Band::new(0.15, 0.25),
    },
    FundingRoundDef {
        id: "series-c",
        name: "Series C",
        typical_raise: Band::new(80.0, 150.0),
        dilution: Band::new(0.10, 0.20),
    },
    FundingRoundDef {
        id: "ipo",
        name: "IPO",
        typical_raise: Band::new(150.0, 300.0),
        dilution: Band::new(0.10, 0.20),
    },
];

#[must_use]
pub fn funding_round_def(round_id: &str) -> Option<&'static FundingRoundDef> {
    FUNDING_ROUND_DEFS.iter().find(|def| def.id == round_id)
}

/// Offer produced for a round at a given investor confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingTerms {
    pub round_id: String,
    pub confidence_multiplier: f64,
    /// Capital raised in $M, rounded to whole millions.
    pub raise: f64,
    pub dilution: f64,
}

/// Scale a round's average terms by investor confidence.
///
/// The multiplier spans `[0.7, 1.3]`; higher confidence raises more money
/// and sells less of the company. Returns `None` for unknown rounds.
#[must_use]
pub fn calculate_funding_terms(round_id: &str, confidence: u8) -> Option<FundingTerms> {
    let def = funding_round_def(round_id)?;
    let confidence = f64::from(confidence.min(CONFIDENCE_MAX));
    let multiplier =
        CONFIDENCE_MULTIPLIER_BASE + confidence / f64::from(CONFIDENCE_MAX) * CONFIDENCE_MULTIPLIER_SPAN;
    Some(FundingTerms {
        round_id: def.id.to_string(),
        confidence_multiplier: multiplier,
        raise: (def.typical_raise.average() * multiplier).round(),
        dilution: def.dilution.average() * (2.0 - multiplier),
    })
}

/// First incomplete round in the path's order once runway drops below a year.
#[must_use]
pub fn should_trigger_funding(state: &PathGameState) -> Option<&'static str> {
    let path = state.path()?;
    let runway = state.runway_quarters()?;
    if runway >= FUNDING_RUNWAY_THRESHOLD_QUARTERS {
        return None;
    }
    path.funding_rounds
        .iter()
        .copied()
        .find(|round| !state.funding_rounds_completed.iter().any(|done| done == round))
}
