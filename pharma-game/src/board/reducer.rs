//! Pure state transitions for the board variant.
//!
//! [`game_reducer`] consumes the previous state and returns the next one.
//! Malformed actions are logged and dropped; actions that do not apply in
//! the current status or to unknown ids return the state unchanged.
use crate::board::action::GameAction;
use crate::board::cards::card_by_id;
use crate::board::decision::{Decision, DecisionOutcome, bankruptcy_decision};
use crate::board::policy::policy_catalog;
use crate::board::score::calculate_final_score;
use crate::board::shadow::ShadowStatus;
use crate::board::space::phase_for_space;
use crate::board::state::{
    DecisionRecord, FailedProgramRecord, GameState, GameStatus, PaymentRecord,
    PendingInteraction, ScorePenalty, create_initial_state,
};
use crate::constants::{LAST_SPACE, LOG_ACTION_DROPPED, LOG_BANKRUPTCY, LOG_VICTORY};
use crate::financing::apply_financing;
use crate::tokens::DataTokens;

/// Apply one action to the board state.
#[must_use]
pub fn game_reducer(state: GameState, action: GameAction) -> GameState {
    if let Err(err) = action.validate() {
        log::warn!("{LOG_ACTION_DROPPED} {}: {err}", action.label());
        return state;
    }
    if !accepts(&state, &action) {
        log::debug!(
            "board ignoring {} while {:?}",
            action.label(),
            state.status
        );
        return state;
    }

    match action {
        GameAction::StartGame { difficulty } => create_initial_state(difficulty),
        GameAction::AdvanceSpace => advance_space(state),
        GameAction::ReturnToSpace { space_id } => return_to_space(state, space_id),
        GameAction::PayCost { amount } => pay_cost(state, amount),
        GameAction::GainData { tokens } => gain_data(state, &tokens),
        GameAction::LoseData { tokens } => lose_data(state, &tokens),
        GameAction::Dilute {
            amount,
            dilution_percent,
        } => dilute(state, amount, dilution_percent),
        GameAction::OfferDecision { decision } => offer_decision(state, decision),
        GameAction::ResolveDecision { option_id } => resolve_decision(state, &option_id),
        GameAction::ShowShadowFailure { program_id } => show_shadow_failure(state, program_id),
        GameAction::ShadowProgramFailed { program_id, cost } => {
            shadow_program_failed(state, &program_id, cost)
        }
        GameAction::ShowPolicyScenario { scenario_id } => {
            show_policy_scenario(state, scenario_id)
        }
        GameAction::ResolvePolicyScenario { choice_id } => {
            resolve_policy_scenario(state, &choice_id)
        }
        GameAction::ApplyCard { card_id } => apply_card(state, &card_id),
        GameAction::EndTurn => end_turn(state),
        GameAction::Pause => GameState {
            status: GameStatus::Paused,
            ..state
        },
        GameAction::Resume => GameState {
            status: GameStatus::Playing,
            ..state
        },
        GameAction::Victory => victory(state),
        GameAction::ResetGame => GameState::default(),
        GameAction::LoadGame { state: loaded } => *loaded,
    }
}

fn accepts(state: &GameState, action: &GameAction) -> bool {
    match action {
        GameAction::ResetGame | GameAction::LoadGame { .. } => true,
        GameAction::StartGame { .. } => {
            !matches!(state.status, GameStatus::Playing | GameStatus::Paused)
        }
        GameAction::Resume => state.status == GameStatus::Paused,
        GameAction::ResolveDecision { .. } => {
            matches!(state.status, GameStatus::Playing | GameStatus::Lost)
        }
        _ => state.status == GameStatus::Playing,
    }
}

fn advance_space(mut state: GameState) -> GameState {
    if state.current_space >= LAST_SPACE {
        return state;
    }
    state.current_space += 1;
    state.phase = phase_for_space(state.current_space);
    state.history.space_visits.push(state.current_space);
    log::debug!(
        "board advanced to space {} ({})",
        state.current_space,
        state.phase
    );
    state
}

fn return_to_space(mut state: GameState, space_id: u8) -> GameState {
    if space_id > state.current_space {
        return state;
    }
    state.current_space = space_id;
    state.phase = phase_for_space(space_id);
    state.history.space_visits.push(space_id);
    state
}

fn pay_cost(mut state: GameState, amount: f64) -> GameState {
    let remaining = state.capital - amount;
    if remaining <= 0.0 {
        log::info!(
            "{LOG_BANKRUPTCY} paying {amount:.1} with {:.1} on hand",
            state.capital
        );
        state.capital = 0.0;
        state.status = GameStatus::Lost;
        state.pending = PendingInteraction::Decision(bankruptcy_decision());
        return state;
    }
    state.capital = remaining;
    state.history.payments.push(PaymentRecord {
        turn: state.turn,
        space_id: state.current_space,
        amount,
    });
    state
}

fn apply_capital_delta(mut state: GameState, delta: f64) -> GameState {
    if delta < 0.0 {
        return pay_cost(state, -delta);
    }
    state.capital += delta;
    state
}

fn gain_data(mut state: GameState, tokens: &DataTokens) -> GameState {
    state.data_tokens = state.data_tokens.gained(tokens);
    state
}

fn lose_data(mut state: GameState, tokens: &DataTokens) -> GameState {
    state.data_tokens = state.data_tokens.lost(tokens);
    state
}

fn dilute(mut state: GameState, amount: f64, dilution_percent: f64) -> GameState {
    let round = format!("space-{}", state.current_space);
    let event = apply_financing(
        state.founder_ownership,
        round,
        amount,
        dilution_percent / 100.0,
    );
    state.capital += amount;
    state.founder_ownership = event.ownership_after;
    if event.score_penalty > 0 {
        state.penalties.push(ScorePenalty {
            reason: format!("dilution:{}", event.round),
            points: event.score_penalty,
        });
    }
    state.history.financing.push(event);
    state
}

fn offer_decision(mut state: GameState, decision: Decision) -> GameState {
    if !state.pending.is_none() {
        return state;
    }
    state.pending = PendingInteraction::Decision(decision);
    state
}

fn resolve_decision(mut state: GameState, option_id: &str) -> GameState {
    let Some((decision_id, effect)) = state.pending.decision().and_then(|decision| {
        decision
            .option(option_id)
            .map(|option| (decision.id.clone(), option.effect.clone()))
    }) else {
        return state;
    };

    state.pending = PendingInteraction::None;
    state.history.decisions.push(DecisionRecord {
        turn: state.turn,
        decision_id,
        option_id: option_id.to_string(),
    });

    state = if effect.dilution_percent > 0.0 {
        dilute(state, effect.capital.max(0.0), effect.dilution_percent)
    } else {
        apply_capital_delta(state, effect.capital)
    };
    state = gain_data(state, &effect.gain_tokens);
    state = lose_data(state, &effect.lose_tokens);

    match effect.outcome {
        DecisionOutcome::Continue => {}
        DecisionOutcome::Resume => {
            if state.capital > 0.0 && state.pending.is_none() {
                state.status = GameStatus::Playing;
            }
        }
        DecisionOutcome::Shutdown => {
            state.status = GameStatus::Lost;
            state.pending = PendingInteraction::None;
        }
    }
    state
}

fn show_shadow_failure(mut state: GameState, program_id: String) -> GameState {
    let active = state
        .shadow_program(&program_id)
        .is_some_and(|program| program.is_active());
    if !active || !state.pending.is_none() {
        return state;
    }
    state.pending = PendingInteraction::ShadowFailure { program_id };
    state
}

fn shadow_program_failed(mut state: GameState, program_id: &str, cost: f64) -> GameState {
    if matches!(&state.pending, PendingInteraction::ShadowFailure { program_id: pending } if pending == program_id)
    {
        state.pending = PendingInteraction::None;
    }
    let Some(program) = state
        .shadow_programs
        .iter_mut()
        .find(|program| program.id == program_id)
    else {
        return state;
    };
    if program.status == ShadowStatus::Failed {
        return state;
    }
    program.status = ShadowStatus::Failed;
    state.total_failure_cost += cost;
    state.history.failed_programs.push(FailedProgramRecord {
        turn: state.turn,
        program_id: program_id.to_string(),
        cost,
    });
    state
}

fn show_policy_scenario(mut state: GameState, scenario_id: String) -> GameState {
    if !state.pending.is_none() || policy_catalog().get(&scenario_id).is_none() {
        return state;
    }
    state.pending = PendingInteraction::PolicyScenario { scenario_id };
    state
}

fn resolve_policy_scenario(mut state: GameState, choice_id: &str) -> GameState {
    let PendingInteraction::PolicyScenario { scenario_id } = &state.pending else {
        return state;
    };
    let Some(choice) = policy_catalog()
        .get(scenario_id)
        .and_then(|scenario| scenario.choice(choice_id))
    else {
        return state;
    };
    let effect = choice.effect.clone();
    let record = DecisionRecord {
        turn: state.turn,
        decision_id: scenario_id.clone(),
        option_id: choice_id.to_string(),
    };

    state.pending = PendingInteraction::None;
    if effect.score_penalty > 0 {
        state.penalties.push(ScorePenalty {
            reason: format!("policy:{}", record.decision_id),
            points: effect.score_penalty,
        });
    }
    state.history.policy_choices.push(record);
    state.wait_turns = state.wait_turns.saturating_add(effect.wait_turns);
    state = gain_data(state, &effect.gain_tokens);
    state = lose_data(state, &effect.lose_tokens);
    apply_capital_delta(state, effect.capital)
}

fn apply_card(mut state: GameState, card_id: &str) -> GameState {
    let Some(card) = card_by_id(card_id) else {
        return state;
    };
    state.history.cards_drawn.push(card.id.to_string());
    state = gain_data(state, &card.gain_tokens);
    state = lose_data(state, &card.lose_tokens);
    apply_capital_delta(state, card.capital)
}

fn end_turn(mut state: GameState) -> GameState {
    state.turn = state.turn.saturating_add(1);
    state.wait_turns = state.wait_turns.saturating_sub(1);
    state
}

fn victory(mut state: GameState) -> GameState {
    state.status = GameStatus::Won;
    state.pending = PendingInteraction::None;
    state.score = calculate_final_score(&state);
    log::info!(
        "{LOG_VICTORY} turn {} score {} ownership {:.3}",
        state.turn,
        state.score,
        state.founder_ownership
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::decision::financing_offer_decision;
    use crate::board::space::BoardPhase;
    use crate::board::state::Difficulty;
    use crate::constants::FLOAT_EPSILON;

    fn playing() -> GameState {
        create_initial_state(Difficulty::Specialty)
    }

    fn run(state: GameState, actions: impl IntoIterator<Item = GameAction>) -> GameState {
        actions.into_iter().fold(state, game_reducer)
    }

    #[test]
    fn blockbuster_full_cost_triggers_forced_rescue() {
        let state = create_initial_state(Difficulty::Blockbuster);
        let next = game_reducer(state, GameAction::PayCost { amount: 150.0 });
        assert!(next.capital.abs() < FLOAT_EPSILON);
        assert_eq!(next.status, GameStatus::Lost);
        let decision = next.pending.decision().expect("forced decision");
        assert!(decision.forced);
        assert_eq!(decision.options.len(), 3);
        assert!(next.history.payments.is_empty());
    }

    #[test]
    fn payments_accumulate_total_spent() {
        let next = run(
            playing(),
            [
                GameAction::PayCost { amount: 10.0 },
                GameAction::PayCost { amount: 15.5 },
            ],
        );
        assert!((next.capital - 149.5).abs() < FLOAT_EPSILON);
        assert!((next.total_spent() - 25.5).abs() < FLOAT_EPSILON);
        assert_eq!(next.status, GameStatus::Playing);
    }

    #[test]
    fn emergency_financing_rescues_and_dilutes() {
        let bankrupt = game_reducer(playing(), GameAction::PayCost { amount: 500.0 });
        let rescued = game_reducer(
            bankrupt,
            GameAction::ResolveDecision {
                option_id: "emergency-financing".to_string(),
            },
        );
        assert_eq!(rescued.status, GameStatus::Playing);
        assert!(rescued.pending.is_none());
        assert!((rescued.capital - 40.0).abs() < FLOAT_EPSILON);
        assert!((rescued.founder_ownership - 0.5).abs() < FLOAT_EPSILON);
        assert_eq!(rescued.history.decisions.len(), 1);
        assert_eq!(rescued.penalty_points(), 150);
    }

    #[test]
    fn asset_sale_trades_tokens_for_cash() {
        let mut state = playing();
        state.data_tokens = DataTokens::new(2, 0, 1, 1);
        let bankrupt = game_reducer(state, GameAction::PayCost { amount: 175.0 });
        let rescued = game_reducer(
            bankrupt,
            GameAction::ResolveDecision {
                option_id: "asset-sale".to_string(),
            },
        );
        assert_eq!(rescued.status, GameStatus::Playing);
        assert_eq!(rescued.data_tokens, DataTokens::new(1, 0, 0, 0));
        assert!((rescued.founder_ownership - 1.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn shutdown_keeps_the_game_lost() {
        let bankrupt = game_reducer(playing(), GameAction::PayCost { amount: 175.0 });
        let closed = game_reducer(
            bankrupt,
            GameAction::ResolveDecision {
                option_id: "shutdown".to_string(),
            },
        );
        assert_eq!(closed.status, GameStatus::Lost);
        assert!(closed.pending.is_none());
        let ignored = game_reducer(closed.clone(), GameAction::AdvanceSpace);
        assert_eq!(ignored, closed);
    }

    #[test]
    fn advance_recomputes_phase_and_logs_visit() {
        let mut state = playing();
        state.current_space = 6;
        let next = game_reducer(state, GameAction::AdvanceSpace);
        assert_eq!(next.current_space, 7);
        assert_eq!(next.phase, BoardPhase::Preclinical);
        assert_eq!(next.history.space_visits.last(), Some(&7));
    }

    #[test]
    fn advance_stops_at_final_space() {
        let mut state = playing();
        state.current_space = 24;
        let next = game_reducer(state, GameAction::AdvanceSpace);
        assert_eq!(next.current_space, 24);
    }

    #[test]
    fn return_only_moves_backwards() {
        let mut state = playing();
        state.current_space = 13;
        let back = game_reducer(state.clone(), GameAction::ReturnToSpace { space_id: 12 });
        assert_eq!(back.current_space, 12);
        let forward = game_reducer(state, GameAction::ReturnToSpace { space_id: 20 });
        assert_eq!(forward.current_space, 13);
    }

    #[test]
    fn lose_data_never_goes_negative() {
        let next = run(
            playing(),
            [
                GameAction::GainData {
                    tokens: DataTokens::new(1, 2, 0, 0),
                },
                GameAction::LoseData {
                    tokens: DataTokens::new(3, 1, 5, 0),
                },
            ],
        );
        assert_eq!(next.data_tokens, DataTokens::new(0, 1, 0, 0));
    }

    #[test]
    fn dilute_adds_capital_penalty_and_ownership() {
        let next = run(
            playing(),
            [
                GameAction::Dilute {
                    amount: 60.0,
                    dilution_percent: 20.0,
                },
                GameAction::Dilute {
                    amount: 100.0,
                    dilution_percent: 25.0,
                },
            ],
        );
        assert!((next.capital - 335.0).abs() < FLOAT_EPSILON);
        assert!((next.founder_ownership - 0.8 * 0.75).abs() < FLOAT_EPSILON);
        assert_eq!(next.history.financing.len(), 2);
        assert_eq!(next.penalty_points(), 60 + 75);
    }

    #[test]
    fn shadow_failure_is_idempotent() {
        let once = game_reducer(
            playing(),
            GameAction::ShadowProgramFailed {
                program_id: "helix-7".to_string(),
                cost: 45.0,
            },
        );
        let twice = game_reducer(
            once.clone(),
            GameAction::ShadowProgramFailed {
                program_id: "helix-7".to_string(),
                cost: 45.0,
            },
        );
        assert_eq!(once, twice);
        assert!((twice.total_failure_cost - 45.0).abs() < FLOAT_EPSILON);
        assert_eq!(twice.active_shadow_programs(), 4);
        assert_eq!(twice.history.failed_programs.len(), 1);
    }

    #[test]
    fn shadow_notice_clears_when_failure_lands() {
        let shown = game_reducer(
            playing(),
            GameAction::ShowShadowFailure {
                program_id: "corvid-2".to_string(),
            },
        );
        assert!(matches!(
            shown.pending,
            PendingInteraction::ShadowFailure { .. }
        ));
        let done = game_reducer(
            shown,
            GameAction::ShadowProgramFailed {
                program_id: "corvid-2".to_string(),
                cost: 90.0,
            },
        );
        assert!(done.pending.is_none());
    }

    #[test]
    fn only_one_interaction_can_be_pending() {
        let with_decision = game_reducer(
            playing(),
            GameAction::OfferDecision {
                decision: financing_offer_decision(10, 60.0, 20.0),
            },
        );
        let blocked = run(
            with_decision.clone(),
            [
                GameAction::ShowShadowFailure {
                    program_id: "helix-7".to_string(),
                },
                GameAction::ShowPolicyScenario {
                    scenario_id: "animal-testing-modernization".to_string(),
                },
            ],
        );
        assert_eq!(blocked.pending, with_decision.pending);
    }

    #[test]
    fn policy_resolution_applies_effect() {
        let mut state = playing();
        state.current_space = 20;
        let next = run(
            state,
            [
                GameAction::ShowPolicyScenario {
                    scenario_id: "accelerated-approval".to_string(),
                },
                GameAction::ResolvePolicyScenario {
                    choice_id: "standard-review".to_string(),
                },
            ],
        );
        assert!(next.pending.is_none());
        assert_eq!(next.wait_turns, 2);
        assert_eq!(next.history.policy_choices.len(), 1);
    }

    #[test]
    fn unknown_policy_choice_keeps_scenario_open() {
        let shown = game_reducer(
            playing(),
            GameAction::ShowPolicyScenario {
                scenario_id: "accelerated-approval".to_string(),
            },
        );
        let same = game_reducer(
            shown.clone(),
            GameAction::ResolvePolicyScenario {
                choice_id: "bribe".to_string(),
            },
        );
        assert_eq!(same, shown);
    }

    #[test]
    fn cards_apply_and_are_recorded() {
        let next = game_reducer(
            playing(),
            GameAction::ApplyCard {
                card_id: "cro-deal".to_string(),
            },
        );
        assert!((next.capital - 170.0).abs() < FLOAT_EPSILON);
        assert_eq!(next.data_tokens, DataTokens::new(0, 0, 1, 1));
        assert_eq!(next.history.cards_drawn, vec!["cro-deal".to_string()]);
    }

    #[test]
    fn end_turn_counts_down_waits() {
        let mut state = playing();
        state.wait_turns = 2;
        let next = run(state, [GameAction::EndTurn, GameAction::EndTurn, GameAction::EndTurn]);
        assert_eq!(next.turn, 3);
        assert_eq!(next.wait_turns, 0);
    }

    #[test]
    fn pause_blocks_play_until_resume() {
        let paused = game_reducer(playing(), GameAction::Pause);
        let blocked = game_reducer(paused.clone(), GameAction::AdvanceSpace);
        assert_eq!(blocked, paused);
        let resumed = game_reducer(paused, GameAction::Resume);
        assert_eq!(resumed.status, GameStatus::Playing);
    }

    #[test]
    fn victory_scores_and_locks_the_game() {
        let mut state = playing();
        state.turn = 40;
        let won = game_reducer(state, GameAction::Victory);
        assert_eq!(won.status, GameStatus::Won);
        assert_eq!(won.score, 100 + 2_000);
        let ignored = game_reducer(won.clone(), GameAction::PayCost { amount: 5.0 });
        assert_eq!(ignored, won);
        let reset = game_reducer(won, GameAction::ResetGame);
        assert_eq!(reset.status, GameStatus::Menu);
    }

    #[test]
    fn invalid_payloads_are_dropped() {
        let state = playing();
        let next = game_reducer(state.clone(), GameAction::PayCost { amount: f64::NAN });
        assert_eq!(next, state);
    }

    #[test]
    fn load_replaces_entire_state() {
        let mut saved = create_initial_state(Difficulty::Orphan);
        saved.current_space = 9;
        saved.turn = 12;
        let loaded = game_reducer(
            playing(),
            GameAction::LoadGame {
                state: Box::new(saved.clone()),
            },
        );
        assert_eq!(loaded, saved);
    }
}
