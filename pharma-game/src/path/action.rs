//! Closed set of path actions.
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ADVANCE_QUARTERS, MAX_EVENT_TIME_IMPACT_YEARS, QUARTERS_PER_YEAR};
use crate::error::ActionError;
use crate::path::events::PathEvent;
use crate::path::state::PathGameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathAction {
    SelectPath {
        path_id: String,
    },
    AdvanceTime {
        quarters: u32,
    },
    TriggerEvent {
        event: PathEvent,
    },
    ResolveEvent {
        choice_id: String,
        event: PathEvent,
    },
    CompleteFundingRound {
        round_id: String,
        raised: f64,
        dilution: f64,
    },
    AdvancePhase,
    Reset,
    Load {
        state: Box<PathGameState>,
    },
}

impl PathAction {
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
            Self::SelectPath { path_id } => ActionError::check_id("path_id", path_id),
            Self::AdvanceTime { quarters } => {
                if *quarters == 0 {
                    return Err(ActionError::TooSmall {
                        field: "quarters",
                        min: 1,
                        value: 0,
                    });
                }
                ActionError::check_bounds(
                    "quarters",
                    i64::from(*quarters),
                    1,
                    i64::from(MAX_ADVANCE_QUARTERS),
                )
            }
            Self::TriggerEvent { event } => check_event(event),
            Self::ResolveEvent { choice_id, event } => {
                ActionError::check_id("choice_id", choice_id)?;
                check_event(event)
            }
            Self::CompleteFundingRound {
                round_id,
                raised,
                dilution,
            } => {
                ActionError::check_id("round_id", round_id)?;
                ActionError::check_amount("raised", *raised)?;
                ActionError::check_range("dilution", *dilution, 0.0, 1.0)
            }
            Self::Load { state } => {
                ActionError::check_finite("state.capital", state.capital)?;
                ActionError::check_range("state.founder_ownership", state.founder_ownership, 0.0, 1.0)?;
                ActionError::check_range("state.phase_progress", state.phase_progress, 0.0, 100.0)?;
                ActionError::check_amount("state.burn_rate", state.burn_rate)?;
                ActionError::check_amount("state.market_potential", state.market_potential)?;
                ActionError::check_bounds(
                    "state.current_quarter",
                    i64::from(state.current_quarter),
                    1,
                    i64::from(QUARTERS_PER_YEAR),
                )
            }
            Self::AdvancePhase | Self::Reset => Ok(()),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SelectPath { .. } => "SELECT_PATH",
            Self::AdvanceTime { .. } => "ADVANCE_TIME",
            Self::TriggerEvent { .. } => "TRIGGER_EVENT",
            Self::ResolveEvent { .. } => "RESOLVE_EVENT",
            Self::CompleteFundingRound { .. } => "COMPLETE_FUNDING_ROUND",
            Self::AdvancePhase => "ADVANCE_PHASE",
            Self::Reset => "RESET",
            Self::Load { .. } => "LOAD",
        }
    }
}

/// Every choice field the reducer folds into state must be a usable number.
fn check_event(event: &PathEvent) -> Result<(), ActionError> {
    ActionError::check_id("event.id", &event.id)?;
    for choice in &event.choices {
        ActionError::check_id("event.choices.id", &choice.id)?;
        ActionError::check_finite("event.choices.cost", choice.cost)?;
        ActionError::check_amount("event.choices.market_impact", choice.market_impact)?;
        ActionError::check_range(
            "event.choices.time_impact",
            choice.time_impact,
            -MAX_EVENT_TIME_IMPACT_YEARS,
            MAX_EVENT_TIME_IMPACT_YEARS,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_payloads() {
        let action =
            PathAction::from_json(r#"{"type":"ADVANCE_TIME","payload":{"quarters":20}}"#).unwrap();
        assert_eq!(action, PathAction::AdvanceTime { quarters: 20 });
        assert_eq!(
            PathAction::from_json(r#"{"type":"ADVANCE_PHASE"}"#).unwrap(),
            PathAction::AdvancePhase
        );
    }

    #[test]
    fn rejects_unknown_and_invalid_actions() {
        assert!(matches!(
            PathAction::from_json(r#"{"type":"SKIP_TRIALS"}"#),
            Err(ActionError::Decode(_))
        ));
        assert!(matches!(
            PathAction::from_json(r#"{"type":"ADVANCE_TIME","payload":{"quarters":0}}"#),
            Err(ActionError::TooSmall { .. })
        ));
        assert!(
            PathAction::CompleteFundingRound {
                round_id: "seed".to_string(),
                raised: 10.0,
                dilution: 1.5,
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn caps_single_time_steps() {
        assert!(PathAction::AdvanceTime { quarters: 400 }.validate().is_ok());
        assert!(matches!(
            PathAction::AdvanceTime { quarters: u32::MAX }.validate(),
            Err(ActionError::OutOfBounds {
                field: "quarters",
                ..
            })
        ));
    }

    fn event_with(cost: f64, market_impact: f64, time_impact: f64) -> PathEvent {
        serde_json::from_value(serde_json::json!({
            "id": "audit",
            "title": "Audit",
            "phase": "discovery",
            "choices": [{ "id": "comply", "label": "Comply" }],
        }))
        .map(|mut event: PathEvent| {
            event.choices[0].cost = cost;
            event.choices[0].market_impact = market_impact;
            event.choices[0].time_impact = time_impact;
            event
        })
        .unwrap()
    }

    #[test]
    fn event_choices_must_carry_usable_numbers() {
        let resolve = |event: PathEvent| PathAction::ResolveEvent {
            choice_id: "comply".to_string(),
            event,
        };
        assert!(resolve(event_with(-4.0, 1.2, -0.5)).validate().is_ok());
        assert!(resolve(event_with(f64::NAN, 1.0, 0.0)).validate().is_err());
        assert!(resolve(event_with(2.0, f64::INFINITY, 0.0)).validate().is_err());
        assert!(resolve(event_with(2.0, -0.5, 0.0)).validate().is_err());
        assert!(resolve(event_with(2.0, 1.0, 1.0e12)).validate().is_err());
        assert!(
            PathAction::TriggerEvent {
                event: event_with(f64::NAN, 1.0, 0.0)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn loaded_states_keep_the_calendar_in_range() {
        let mut state = PathGameState::default();
        assert!(PathAction::Load { state: Box::new(state.clone()) }.validate().is_ok());
        state.current_quarter = 5;
        assert!(matches!(
            PathAction::Load { state: Box::new(state.clone()) }.validate(),
            Err(ActionError::OutOfBounds {
                field: "state.current_quarter",
                ..
            })
        ));
        state.current_quarter = 0;
        assert!(PathAction::Load { state: Box::new(state) }.validate().is_err());
    }
}
