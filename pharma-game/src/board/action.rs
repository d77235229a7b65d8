//! Closed set of board actions.
use serde::{Deserialize, Serialize};

use crate::board::decision::Decision;
use crate::board::state::{Difficulty, GameState};
use crate::constants::{FIRST_SPACE, LAST_SPACE};
use crate::error::ActionError;
use crate::tokens::DataTokens;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameAction {
    StartGame { difficulty: Difficulty },
    AdvanceSpace,
    ReturnToSpace { space_id: u8 },
    PayCost { amount: f64 },
    GainData { tokens: DataTokens },
    LoseData { tokens: DataTokens },
    Dilute { amount: f64, dilution_percent: f64 },
    OfferDecision { decision: Decision },
    ResolveDecision { option_id: String },
    ShowShadowFailure { program_id: String },
    ShadowProgramFailed { program_id: String, cost: f64 },
    ShowPolicyScenario { scenario_id: String },
    ResolvePolicyScenario { choice_id: String },
    ApplyCard { card_id: String },
    EndTurn,
    Pause,
    Resume,
    Victory,
    ResetGame,
    LoadGame { state: Box<GameState> },
}

impl GameAction {
    /// Parse an action from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Decode`] for unknown action types or malformed
    /// payloads, and any validation error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        let action: Self = serde_json::from_str(json)?;
        action.validate()?;
        Ok(action)
    }

    /// Check payload shape before the reducer applies the action.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::PayCost { amount } => ActionError::check_amount("amount", *amount),
            Self::Dilute {
                amount,
                dilution_percent,
            } => {
                ActionError::check_amount("amount", *amount)?;
                ActionError::check_range("dilution_percent", *dilution_percent, 0.0, 100.0)
            }
            Self::ReturnToSpace { space_id } => {
                if *space_id == 0 {
                    Err(ActionError::TooSmall {
                        field: "space_id",
                        min: 1,
                        value: 0,
                    })
                } else {
                    Ok(())
                }
            }
            Self::OfferDecision { decision } => {
                ActionError::check_id("decision.id", &decision.id)?;
                if decision.options.is_empty() {
                    return Err(ActionError::TooSmall {
                        field: "decision.options",
                        min: 1,
                        value: 0,
                    });
                }
                Ok(())
            }
            Self::ResolveDecision { option_id } => ActionError::check_id("option_id", option_id),
            Self::ShowShadowFailure { program_id } => {
                ActionError::check_id("program_id", program_id)
            }
            Self::ShadowProgramFailed { program_id, cost } => {
                ActionError::check_id("program_id", program_id)?;
                ActionError::check_amount("cost", *cost)
            }
            Self::ShowPolicyScenario { scenario_id } => {
                ActionError::check_id("scenario_id", scenario_id)
            }
            Self::ResolvePolicyScenario { choice_id } => {
                ActionError::check_id("choice_id", choice_id)
            }
            Self::ApplyCard { card_id } => ActionError::check_id("card_id", card_id),
            Self::LoadGame { state } => {
                ActionError::check_amount("state.capital", state.capital)?;
                ActionError::check_range("state.founder_ownership", state.founder_ownership, 0.0, 1.0)?;
                ActionError::check_bounds(
                    "state.current_space",
                    i64::from(state.current_space),
                    i64::from(FIRST_SPACE),
                    i64::from(LAST_SPACE),
                )
            }
            Self::StartGame { .. }
            | Self::AdvanceSpace
            | Self::GainData { .. }
            | Self::LoseData { .. }
            | Self::EndTurn
            | Self::Pause
            | Self::Resume
            | Self::Victory
            | Self::ResetGame => Ok(()),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StartGame { .. } => "START_GAME",
            Self::AdvanceSpace => "ADVANCE_SPACE",
            Self::ReturnToSpace { .. } => "RETURN_TO_SPACE",
            Self::PayCost { .. } => "PAY_COST",
            Self::GainData { .. } => "GAIN_DATA",
            Self::LoseData { .. } => "LOSE_DATA",
            Self::Dilute { .. } => "DILUTE",
            Self::OfferDecision { .. } => "OFFER_DECISION",
            Self::ResolveDecision { .. } => "RESOLVE_DECISION",
            Self::ShowShadowFailure { .. } => "SHOW_SHADOW_FAILURE",
            Self::ShadowProgramFailed { .. } => "SHADOW_PROGRAM_FAILED",
            Self::ShowPolicyScenario { .. } => "SHOW_POLICY_SCENARIO",
            Self::ResolvePolicyScenario { .. } => "RESOLVE_POLICY_SCENARIO",
            Self::ApplyCard { .. } => "APPLY_CARD",
            Self::EndTurn => "END_TURN",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::Victory => "VICTORY",
            Self::ResetGame => "RESET_GAME",
            Self::LoadGame { .. } => "LOAD_GAME",
        }
    }
}
