//! Pure state transitions for the path variant.
use crate::constants::{
    CONFIDENCE_MAX, LOG_ACTION_DROPPED, LOG_PATH_DEFEAT, LOG_PATH_VICTORY, PHASE_PROGRESS_MAX,
};
use crate::financing::apply_financing;
use crate::numbers::years_to_quarters;
use crate::path::action::PathAction;
use crate::path::catalog::path_by_id;
use crate::path::events::PathEvent;
use crate::path::state::{EventRecord, PathGameState, PathStatus, create_initial_path_state};

/// Apply one action to the path state.
#[must_use]
pub fn path_game_reducer(state: PathGameState, action: PathAction) -> PathGameState {
    if let Err(err) = action.validate() {
        log::warn!("{LOG_ACTION_DROPPED} {}: {err}", action.label());
        return state;
    }
    if !accepts(&state, &action) {
        log::debug!("path ignoring {} while {:?}", action.label(), state.status);
        return state;
    }

    match action {
        PathAction::SelectPath { path_id } => select_path(state, &path_id),
        PathAction::AdvanceTime { quarters } => advance_time(state, quarters),
        PathAction::TriggerEvent { event } => trigger_event(state, event),
        PathAction::ResolveEvent { choice_id, event } => resolve_event(state, &choice_id, &event),
        PathAction::CompleteFundingRound {
            round_id,
            raised,
            dilution,
        } => complete_funding_round(state, round_id, raised, dilution),
        PathAction::AdvancePhase => advance_phase(state),
        PathAction::Reset => create_initial_path_state(),
        PathAction::Load { state: loaded } => *loaded,
    }
}

fn accepts(state: &PathGameState, action: &PathAction) -> bool {
    match action {
        PathAction::Reset | PathAction::Load { .. } => true,
        PathAction::SelectPath { .. } => state.status == PathStatus::PathSelection,
        _ => state.status == PathStatus::Playing,
    }
}

fn select_path(state: PathGameState, path_id: &str) -> PathGameState {
    let Some(path) = path_by_id(path_id) else {
        log::debug!("unknown path {path_id}");
        return state;
    };
    PathGameState {
        path_id: Some(path.id.to_string()),
        capital: path.starting_capital,
        burn_rate: path.burn_rate(),
        market_potential: path.market_potential,
        status: PathStatus::Playing,
        ..create_initial_path_state()
    }
}

fn advance_time(mut state: PathGameState, quarters: u32) -> PathGameState {
    let delta = i32::try_from(quarters).unwrap_or(i32::MAX);
    state.shift_calendar(delta);
    state.quarters_elapsed = state.quarters_elapsed.saturating_add(quarters);
    state.capital -= state.burn_rate * f64::from(quarters);

    let duration = f64::from(state.current_phase.duration_quarters());
    let gained = f64::from(quarters) / duration * PHASE_PROGRESS_MAX;
    state.phase_progress = (state.phase_progress + gained).min(PHASE_PROGRESS_MAX);

    check_bankruptcy(state)
}

fn check_bankruptcy(mut state: PathGameState) -> PathGameState {
    if state.capital <= 0.0 {
        log::info!(
            "{LOG_PATH_DEFEAT} year {} q{} in {}",
            state.current_year,
            state.current_quarter,
            state.current_phase
        );
        state.capital = 0.0;
        state.status = PathStatus::Defeat;
    }
    state
}

fn trigger_event(mut state: PathGameState, event: PathEvent) -> PathGameState {
    if state.pending_event.is_none() {
        state.pending_event = Some(event);
    }
    state
}

fn resolve_event(mut state: PathGameState, choice_id: &str, event: &PathEvent) -> PathGameState {
    let Some(choice) = event.choice(choice_id) else {
        return state;
    };

    state.capital -= choice.cost;
    let confidence = i32::from(state.investor_confidence) + choice.confidence;
    let clamped = confidence.clamp(0, i32::from(CONFIDENCE_MAX));
    state.investor_confidence = u8::try_from(clamped).unwrap_or(CONFIDENCE_MAX);
    state.market_potential *= choice.market_impact;
    state.shift_calendar(years_to_quarters(choice.time_impact));

    state.event_history.push(EventRecord {
        event_id: event.id.clone(),
        choice_id: choice.id.clone(),
        phase: state.current_phase,
        year: state.current_year,
        quarter: state.current_quarter,
    });
    state.completed_events.push(event.id.clone());
    state.pending_event = None;

    check_bankruptcy(state)
}

fn complete_funding_round(
    mut state: PathGameState,
    round_id: String,
    raised: f64,
    dilution: f64,
) -> PathGameState {
    let event = apply_financing(state.founder_ownership, round_id.clone(), raised, dilution);
    log::debug!(
        "path funding {round_id}: +{raised:.1} for {:.1}%",
        event.dilution * 100.0
    );
    state.capital += raised;
    state.founder_ownership = event.ownership_after;
    state.funding_rounds_completed.push(round_id);
    state.funding_history.push(event);
    state
}

fn advance_phase(mut state: PathGameState) -> PathGameState {
    match state.current_phase.next() {
        Some(next) => {
            state.current_phase = next;
            state.phase_progress = 0.0;
        }
        None => {
            log::info!(
                "{LOG_PATH_VICTORY} {} after {} quarters",
                state.path_id.as_deref().unwrap_or("unknown"),
                state.quarters_elapsed
            );
            state.status = PathStatus::Victory;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::catalog::PathPhase;
    use crate::path::events::EventChoice;

    const EPS: f64 = 1e-9;

    fn selected(path_id: &str) -> PathGameState {
        path_game_reducer(
            create_initial_path_state(),
            PathAction::SelectPath {
                path_id: path_id.to_string(),
            },
        )
    }

    fn sample_event() -> PathEvent {
        PathEvent {
            id: "sample".to_string(),
            title: "Sample".to_string(),
            description: String::new(),
            phase: PathPhase::Discovery,
            paths: None,
            choices: vec![
                EventChoice {
                    id: "spend".to_string(),
                    label: "Spend".to_string(),
                    cost: 10.0,
                    confidence: 70,
                    market_impact: 1.5,
                    time_impact: -0.5,
                },
                EventChoice {
                    id: "panic".to_string(),
                    label: "Panic".to_string(),
                    cost: 0.0,
                    confidence: -90,
                    market_impact: 1.0,
                    time_impact: 0.0,
                },
            ],
        }
    }

    #[test]
    fn select_path_seeds_from_definition() {
        let state = selected("orphan-small-molecule");
        assert_eq!(state.status, PathStatus::Playing);
        assert!((state.capital - 80.0).abs() < EPS);
        assert!((state.burn_rate - 5.0).abs() < EPS);
        assert!((state.market_potential - 0.8).abs() < EPS);
    }

    #[test]
    fn unknown_path_is_ignored() {
        let state = path_game_reducer(
            create_initial_path_state(),
            PathAction::SelectPath {
                path_id: "perpetual-motion".to_string(),
            },
        );
        assert_eq!(state, create_initial_path_state());
    }

    #[test]
    fn twenty_quarters_bankrupts_orphan_small_molecule() {
        let state = path_game_reducer(
            selected("orphan-small-molecule"),
            PathAction::AdvanceTime { quarters: 20 },
        );
        assert_eq!(state.status, PathStatus::Defeat);
        assert!(state.capital.abs() < EPS);
        assert!(state.pending_event.is_none());
    }

    #[test]
    fn advance_time_rolls_calendar_and_progress() {
        let state = path_game_reducer(
            selected("orphan-small-molecule"),
            PathAction::AdvanceTime { quarters: 6 },
        );
        assert_eq!((state.current_year, state.current_quarter), (2, 3));
        assert!((state.capital - 50.0).abs() < EPS);
        assert!((state.phase_progress - 75.0).abs() < EPS);
        let state = path_game_reducer(state, PathAction::AdvanceTime { quarters: 4 });
        assert!((state.phase_progress - 100.0).abs() < EPS);
        assert_eq!(state.quarters_elapsed, 10);
    }

    #[test]
    fn resolve_event_applies_choice() {
        let mut state = selected("blockbuster-biologic");
        state.current_year = 3;
        state.current_quarter = 1;
        let state = path_game_reducer(
            state,
            PathAction::TriggerEvent {
                event: sample_event(),
            },
        );
        assert!(state.pending_event.is_some());
        let state = path_game_reducer(
            state,
            PathAction::ResolveEvent {
                choice_id: "spend".to_string(),
                event: sample_event(),
            },
        );
        assert!((state.capital - 120.0).abs() < EPS);
        assert_eq!(state.investor_confidence, 100);
        assert!((state.market_potential - 12.0).abs() < EPS);
        assert_eq!((state.current_year, state.current_quarter), (2, 3));
        assert!(state.pending_event.is_none());
        assert_eq!(state.completed_events, vec!["sample".to_string()]);
        assert_eq!(state.event_history.len(), 1);
    }

    #[test]
    fn confidence_floors_at_zero() {
        let state = path_game_reducer(
            selected("orphan-biologic"),
            PathAction::ResolveEvent {
                choice_id: "panic".to_string(),
                event: sample_event(),
            },
        );
        assert_eq!(state.investor_confidence, 0);
    }

    #[test]
    fn unknown_choice_keeps_event_pending() {
        let state = path_game_reducer(
            selected("orphan-biologic"),
            PathAction::TriggerEvent {
                event: sample_event(),
            },
        );
        let same = path_game_reducer(
            state.clone(),
            PathAction::ResolveEvent {
                choice_id: "ignore".to_string(),
                event: sample_event(),
            },
        );
        assert_eq!(same, state);
    }

    #[test]
    fn second_trigger_does_not_replace_pending_event() {
        let mut other = sample_event();
        other.id = "other".to_string();
        let state = path_game_reducer(
            selected("orphan-biologic"),
            PathAction::TriggerEvent {
                event: sample_event(),
            },
        );
        let state = path_game_reducer(state, PathAction::TriggerEvent { event: other });
        assert_eq!(state.pending_event.map(|e| e.id), Some("sample".to_string()));
    }

    #[test]
    fn funding_dilutes_and_adds_capital() {
        let state = selected("orphan-small-molecule");
        let state = path_game_reducer(
            state,
            PathAction::CompleteFundingRound {
                round_id: "seed".to_string(),
                raised: 12.0,
                dilution: 0.164,
            },
        );
        let state = path_game_reducer(
            state,
            PathAction::CompleteFundingRound {
                round_id: "series-a".to_string(),
                raised: 35.0,
                dilution: 0.25,
            },
        );
        assert!((state.capital - 127.0).abs() < EPS);
        assert!((state.founder_ownership - 0.836 * 0.75).abs() < EPS);
        assert_eq!(state.funding_rounds_completed, vec!["seed", "series-a"]);
        assert_eq!(state.funding_history.len(), 2);
    }

    #[test]
    fn phases_advance_in_order_then_win() {
        let mut state = selected("orphan-gene-therapy");
        for expected in &PathPhase::ALL[1..] {
            state = path_game_reducer(state, PathAction::AdvancePhase);
            assert_eq!(state.current_phase, *expected);
            assert!(state.phase_progress.abs() < EPS);
        }
        state = path_game_reducer(state, PathAction::AdvancePhase);
        assert_eq!(state.status, PathStatus::Victory);
        assert_eq!(state.current_phase, PathPhase::Approval);
    }

    #[test]
    fn terminal_states_absorb_everything_but_reset() {
        let defeated = path_game_reducer(
            selected("orphan-small-molecule"),
            PathAction::AdvanceTime { quarters: 40 },
        );
        let still = path_game_reducer(
            defeated.clone(),
            PathAction::CompleteFundingRound {
                round_id: "seed".to_string(),
                raised: 100.0,
                dilution: 0.1,
            },
        );
        assert_eq!(still, defeated);
        let reset = path_game_reducer(defeated, PathAction::Reset);
        assert_eq!(reset.status, PathStatus::PathSelection);
    }

    #[test]
    fn oversized_time_steps_are_dropped() {
        let start = selected("orphan-small-molecule");
        let same = path_game_reducer(start.clone(), PathAction::AdvanceTime { quarters: u32::MAX });
        assert_eq!(same, start);
        let defeated = path_game_reducer(start, PathAction::AdvanceTime { quarters: 400 });
        assert_eq!(defeated.status, PathStatus::Defeat);
        assert_eq!((defeated.current_year, defeated.current_quarter), (101, 1));
    }

    #[test]
    fn unusable_event_choices_are_dropped() {
        let start = selected("orphan-small-molecule");
        let mut poisoned = sample_event();
        poisoned.choices[0].cost = f64::NAN;
        poisoned.choices[0].market_impact = f64::NAN;
        let same = path_game_reducer(
            start.clone(),
            PathAction::ResolveEvent {
                choice_id: "spend".to_string(),
                event: poisoned,
            },
        );
        assert_eq!(same, start);

        let mut far_off = sample_event();
        far_off.choices[0].time_impact = f64::from(i32::MAX);
        let same = path_game_reducer(
            start.clone(),
            PathAction::ResolveEvent {
                choice_id: "spend".to_string(),
                event: far_off,
            },
        );
        assert_eq!(same, start);

        let defeated = path_game_reducer(same, PathAction::AdvanceTime { quarters: 400 });
        assert_eq!(defeated.status, PathStatus::Defeat);
        assert!(defeated.capital.abs() < EPS);
    }
}
