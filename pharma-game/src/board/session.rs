use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::board::action::GameAction;
use crate::board::cards::draw_card;
use crate::board::decision::financing_offer_decision;
use crate::board::policy::get_scenario_for_space;
use crate::board::reducer::game_reducer;
use crate::board::shadow::{roll_shadow_failure, shadow_failure_cost};
use crate::board::space::{Space, SpecialEffect, roll_space_attempt, space_by_id};
use crate::board::state::{
    Difficulty, GameState, GameStatus, PendingInteraction, create_initial_state,
};
use crate::tokens::{DataTokens, get_token_deficit, meets_gate_requirements};

/// What a single automated turn did to the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Nothing happened: the game is not playing or an interaction is open.
    Blocked,
    /// The turn was spent on a policy delay.
    Waited,
    /// Paying for the attempt emptied the treasury.
    Bankrupt,
    GateBlocked {
        space_id: u8,
        deficit: DataTokens,
        returned_to: Option<u8>,
    },
    AttemptFailed {
        space_id: u8,
        returned_to: Option<u8>,
    },
    Advanced {
        from: u8,
        to: u8,
    },
    Won {
        score: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub outcome: TurnOutcome,
    pub card_drawn: Option<String>,
    pub policy_scenario: Option<String>,
    pub shadow_failure: Option<String>,
}

/// Board game bound to a deterministic random stream.
///
/// Every change goes through [`game_reducer`]; the session only decides which
/// actions to send based on dice rolls.
#[derive(Debug, Clone)]
pub struct BoardSession {
    state: GameState,
    rng: ChaCha20Rng,
    seed: u64,
}

impl BoardSession {
    #[must_use]
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_state(create_initial_state(difficulty), seed)
    }

    /// Resume a session from a saved state.
    #[must_use]
    pub fn from_state(state: GameState, seed: u64) -> Self {
        Self {
            state,
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Apply one action through the reducer.
    pub fn dispatch(&mut self, action: GameAction) -> &GameState {
        let state = std::mem::take(&mut self.state);
        self.state = game_reducer(state, action);
        &self.state
    }

    /// Attempt the current space and finish the turn.
    ///
    /// Open interactions must be resolved with [`Self::dispatch`] first; until
    /// then the turn is reported as [`TurnOutcome::Blocked`].
    pub fn play_turn(&mut self) -> TurnReport {
        let mut report = TurnReport {
            turn: self.state.turn,
            outcome: TurnOutcome::Blocked,
            card_drawn: None,
            policy_scenario: None,
            shadow_failure: None,
        };
        if self.state.status != GameStatus::Playing || !self.state.pending.is_none() {
            return report;
        }
        let Some(space) = space_by_id(self.state.current_space) else {
            log::warn!("board session on unknown space {}", self.state.current_space);
            return report;
        };

        if self.state.is_waiting() {
            report.outcome = TurnOutcome::Waited;
        } else {
            report.outcome = self.attempt_space(space, &mut report);
            if matches!(
                report.outcome,
                TurnOutcome::Bankrupt | TurnOutcome::Won { .. }
            ) {
                return report;
            }
        }

        report.shadow_failure = self.roll_shadow();
        self.dispatch(GameAction::EndTurn);
        report
    }

    fn attempt_space(&mut self, space: &'static Space, report: &mut TurnReport) -> TurnOutcome {
        let cost = space.cost_for(self.state.difficulty);
        if cost > 0.0 {
            self.dispatch(GameAction::PayCost { amount: cost });
            if self.state.status == GameStatus::Lost {
                return TurnOutcome::Bankrupt;
            }
        }

        if let Some(requirement) = space.gate_requirement
            && !meets_gate_requirements(&self.state.data_tokens, &requirement)
        {
            let deficit = get_token_deficit(&self.state.data_tokens, &requirement);
            let returned_to = self.apply_failure(space);
            return TurnOutcome::GateBlocked {
                space_id: space.id,
                deficit,
                returned_to,
            };
        }

        if !roll_space_attempt(space, &mut self.rng) {
            let returned_to = self.apply_failure(space);
            return TurnOutcome::AttemptFailed {
                space_id: space.id,
                returned_to,
            };
        }

        if !space.reward.is_empty() {
            self.dispatch(GameAction::GainData {
                tokens: space.reward,
            });
        }
        self.apply_special(space, report);
        report.policy_scenario = self.show_policy_scenario(space.id);
        if self.state.status != GameStatus::Playing {
            return TurnOutcome::Bankrupt;
        }

        if space.is_final() {
            self.dispatch(GameAction::Victory);
            return TurnOutcome::Won {
                score: self.state.score,
            };
        }
        let from = self.state.current_space;
        self.dispatch(GameAction::AdvanceSpace);
        TurnOutcome::Advanced {
            from,
            to: self.state.current_space,
        }
    }

    /// Opens the space's policy scenario. Returns its id only when it is
    /// actually the pending interaction afterwards.
    fn show_policy_scenario(&mut self, space_id: u8) -> Option<String> {
        let scenario = get_scenario_for_space(space_id, self.state.difficulty)?;
        self.dispatch(GameAction::ShowPolicyScenario {
            scenario_id: scenario.id.clone(),
        });
        match &self.state.pending {
            PendingInteraction::PolicyScenario { scenario_id } if *scenario_id == scenario.id => {
                Some(scenario_id.clone())
            }
            _ => None,
        }
    }

    fn apply_special(&mut self, space: &Space, report: &mut TurnReport) {
        match space.special {
            Some(SpecialEffect::DrawCard) => {
                let card = draw_card(&mut self.rng);
                self.dispatch(GameAction::ApplyCard {
                    card_id: card.id.to_string(),
                });
                report.card_drawn = Some(card.id.to_string());
            }
            Some(SpecialEffect::FinancingOffer {
                amount,
                dilution_percent,
            }) => {
                self.dispatch(GameAction::OfferDecision {
                    decision: financing_offer_decision(space.id, amount, dilution_percent),
                });
            }
            Some(SpecialEffect::WaitTurns { turns }) => {
                // Review clock: the extra turns pass before the board moves on.
                for _ in 0..turns {
                    self.dispatch(GameAction::EndTurn);
                }
            }
            Some(SpecialEffect::ReturnToSpace { space_id }) => {
                self.dispatch(GameAction::ReturnToSpace { space_id });
            }
            None => {}
        }
    }

    fn apply_failure(&mut self, space: &Space) -> Option<u8> {
        match space.on_failure {
            Some(SpecialEffect::ReturnToSpace { space_id }) => {
                self.dispatch(GameAction::ReturnToSpace { space_id });
                Some(self.state.current_space)
            }
            _ => None,
        }
    }

    fn roll_shadow(&mut self) -> Option<String> {
        let program_id = roll_shadow_failure(&self.state.shadow_programs, &mut self.rng)?;
        let cost = shadow_failure_cost(self.state.phase);
        self.dispatch(GameAction::ShowShadowFailure {
            program_id: program_id.clone(),
        });
        self.dispatch(GameAction::ShadowProgramFailed {
            program_id: program_id.clone(),
            cost,
        });
        Some(program_id)
    }

    /// Deterministically reseed the random stream.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
