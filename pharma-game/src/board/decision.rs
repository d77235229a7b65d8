//! Player decisions offered by the board, including the bankruptcy rescue.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    RESCUE_ASSET_SALE_ID, RESCUE_ASSET_SALE_PROCEEDS, RESCUE_ASSET_SALE_TOKEN_LOSS,
    RESCUE_DECISION_ID, RESCUE_EMERGENCY_FINANCING_ID, RESCUE_FINANCING_DILUTION_PCT,
    RESCUE_FINANCING_RAISE, RESCUE_SHUTDOWN_ID,
};
use crate::tokens::DataTokens;

/// What happens to the game status once an option is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Status is left as-is.
    #[default]
    Continue,
    /// Return to `playing` (used to climb out of bankruptcy).
    Resume,
    /// Wind the company down; the game stays lost.
    Shutdown,
}

/// Mechanical effect of picking an option.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionEffect {
    /// Capital delta in $M (negative values are payments).
    #[serde(default)]
    pub capital: f64,
    /// Equity sold alongside the capital, in percentage points.
    #[serde(default)]
    pub dilution_percent: f64,
    #[serde(default)]
    pub gain_tokens: DataTokens,
    #[serde(default)]
    pub lose_tokens: DataTokens,
    #[serde(default)]
    pub outcome: DecisionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub effect: DecisionEffect,
}

/// A choice presented to the player. Forced decisions cannot be dismissed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub options: SmallVec<[DecisionOption; 3]>,
    #[serde(default)]
    pub forced: bool,
}

impl Decision {
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    #[must_use]
    pub fn is_bankruptcy(&self) -> bool {
        self.id == RESCUE_DECISION_ID
    }
}

/// The forced three-way choice raised when capital runs out.
#[must_use]
pub fn bankruptcy_decision() -> Decision {
    let token_loss = DataTokens::new(
        RESCUE_ASSET_SALE_TOKEN_LOSS,
        RESCUE_ASSET_SALE_TOKEN_LOSS,
        RESCUE_ASSET_SALE_TOKEN_LOSS,
        RESCUE_ASSET_SALE_TOKEN_LOSS,
    );
    let options = [
        DecisionOption {
            id: RESCUE_EMERGENCY_FINANCING_ID.to_string(),
            label: "Take emergency financing on punitive terms".to_string(),
            effect: DecisionEffect {
                capital: RESCUE_FINANCING_RAISE,
                dilution_percent: RESCUE_FINANCING_DILUTION_PCT,
                outcome: DecisionOutcome::Resume,
                ..DecisionEffect::default()
            },
        },
        DecisionOption {
            id: RESCUE_ASSET_SALE_ID.to_string(),
            label: "Sell assets and out-license data packages".to_string(),
            effect: DecisionEffect {
                capital: RESCUE_ASSET_SALE_PROCEEDS,
                lose_tokens: token_loss,
                outcome: DecisionOutcome::Resume,
                ..DecisionEffect::default()
            },
        },
        DecisionOption {
            id: RESCUE_SHUTDOWN_ID.to_string(),
            label: "Shut the company down".to_string(),
            effect: DecisionEffect {
                outcome: DecisionOutcome::Shutdown,
                ..DecisionEffect::default()
            },
        },
    ];
    Decision {
        id: RESCUE_DECISION_ID.to_string(),
        title: "Out of cash".to_string(),
        options: SmallVec::from_iter(options),
        forced: true,
    }
}

/// Build a decision from a financing space offer: accept the raise or pass.
#[must_use]
pub fn financing_offer_decision(space_id: u8, amount: f64, dilution_percent: f64) -> Decision {
    let options = [
        DecisionOption {
            id: "accept".to_string(),
            label: format!("Raise ${amount:.0}M for {dilution_percent:.0}% of the company"),
            effect: DecisionEffect {
                capital: amount,
                dilution_percent,
                ..DecisionEffect::default()
            },
        },
        DecisionOption {
            id: "decline".to_string(),
            label: "Keep control and stay lean".to_string(),
            effect: DecisionEffect::default(),
        },
    ];
    Decision {
        id: format!("financing-{space_id}"),
        title: "Investors are interested".to_string(),
        options: SmallVec::from_iter(options),
        forced: false,
    }
}
