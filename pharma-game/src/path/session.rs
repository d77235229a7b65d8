use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{EVENT_CHANCE_PER_QUARTER, PHASE_PROGRESS_MAX};
use crate::path::action::PathAction;
use crate::path::catalog::PathPhase;
use crate::path::events::get_random_event;
use crate::path::funding::{FundingTerms, calculate_funding_terms, should_trigger_funding};
use crate::path::reducer::path_game_reducer;
use crate::path::state::{PathGameState, PathStatus, create_initial_path_state};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuarterOutcome {
    /// Not playing, or an event is waiting for a choice.
    Blocked,
    Progressed,
    PhaseAdvanced { to: PathPhase },
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterReport {
    pub year: i32,
    pub quarter: i32,
    pub outcome: QuarterOutcome,
    /// Event raised this quarter, now pending on the state.
    pub event: Option<String>,
    /// Terms on offer when runway has dropped below a year.
    pub funding_offer: Option<FundingTerms>,
}

/// Path game bound to a deterministic random stream.
#[derive(Debug, Clone)]
pub struct PathSession {
    state: PathGameState,
    rng: ChaCha20Rng,
    seed: u64,
}

impl PathSession {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_state(create_initial_path_state(), seed)
    }

    #[must_use]
    pub fn from_state(state: PathGameState, seed: u64) -> Self {
        Self {
            state,
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn dispatch(&mut self, action: PathAction) -> &PathGameState {
        let state = std::mem::take(&mut self.state);
        self.state = path_game_reducer(state, action);
        &self.state
    }

    /// Run one quarter: burn cash, move the phase along, and maybe raise an
    /// event. Phases advance automatically once progress fills up.
    pub fn play_quarter(&mut self) -> QuarterReport {
        let mut report = QuarterReport {
            year: self.state.current_year,
            quarter: self.state.current_quarter,
            outcome: QuarterOutcome::Blocked,
            event: None,
            funding_offer: None,
        };
        if self.state.status != PathStatus::Playing || self.state.pending_event.is_some() {
            return report;
        }

        self.dispatch(PathAction::AdvanceTime { quarters: 1 });
        report.year = self.state.current_year;
        report.quarter = self.state.current_quarter;
        if self.state.status == PathStatus::Defeat {
            report.outcome = QuarterOutcome::Defeat;
            return report;
        }

        report.outcome = QuarterOutcome::Progressed;
        if self.state.phase_progress >= PHASE_PROGRESS_MAX {
            self.dispatch(PathAction::AdvancePhase);
            if self.state.status == PathStatus::Victory {
                report.outcome = QuarterOutcome::Victory;
                return report;
            }
            report.outcome = QuarterOutcome::PhaseAdvanced {
                to: self.state.current_phase,
            };
        }

        if self.rng.gen_bool(EVENT_CHANCE_PER_QUARTER)
            && let Some(event) = get_random_event(&self.state, &mut self.rng)
        {
            report.event = Some(event.id.clone());
            self.dispatch(PathAction::TriggerEvent { event });
        }

        report.funding_offer = self.funding_offer();
        report
    }

    /// Terms for the next due round, if runway is short.
    #[must_use]
    pub fn funding_offer(&self) -> Option<FundingTerms> {
        let round_id = should_trigger_funding(&self.state)?;
        calculate_funding_terms(round_id, self.state.investor_confidence)
    }

    /// Close a round on the offered terms.
    pub fn accept_funding(&mut self, terms: &FundingTerms) -> &PathGameState {
        self.dispatch(PathAction::CompleteFundingRound {
            round_id: terms.round_id.clone(),
            raised: terms.raise,
            dilution: terms.dilution,
        })
    }

    /// Resolve the pending event with `choice_id`. No-op without one.
    pub fn resolve_pending(&mut self, choice_id: &str) -> &PathGameState {
        if let Some(event) = self.state.pending_event.clone() {
            self.dispatch(PathAction::ResolveEvent {
                choice_id: choice_id.to_string(),
                event,
            });
        }
        &self.state
    }

    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn state(&self) -> &PathGameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> PathGameState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(path_id: &str, seed: u64) -> PathSession {
        let mut session = PathSession::new(seed);
        session.dispatch(PathAction::SelectPath {
            path_id: path_id.to_string(),
        });
        session
    }

    #[test]
    fn quarters_are_blocked_before_selection() {
        let mut session = PathSession::new(1);
        assert_eq!(session.play_quarter().outcome, QuarterOutcome::Blocked);
    }

    #[test]
    fn pending_events_block_until_resolved() {
        let mut state = started("blockbuster-biologic", 8).into_state();
        state.capital = 10_000.0;
        let mut session = PathSession::from_state(state, 8);
        let mut raised = None;
        for _ in 0..40 {
            let report = session.play_quarter();
            if report.event.is_some() {
                raised = report.event;
                break;
            }
        }
        let raised = raised.expect("an event within forty quarters");
        assert_eq!(session.play_quarter().outcome, QuarterOutcome::Blocked);

        let choice = session.state().pending_event.as_ref().unwrap().choices[0].id.clone();
        session.resolve_pending(&choice);
        assert!(session.state().pending_event.is_none());
        assert!(session.state().completed_events.contains(&raised));
    }

    #[test]
    fn funding_offered_once_runway_is_short() {
        let mut session = started("orphan-small-molecule", 2);
        let mut offer = None;
        for _ in 0..16 {
            let report = session.play_quarter();
            if let Some(terms) = report.funding_offer {
                offer = Some(terms);
                break;
            }
            if let Some(event) = session.state().pending_event.clone() {
                session.resolve_pending(&event.choices[0].id);
            }
        }
        let terms = offer.expect("seed offered before cash runs out");
        assert_eq!(terms.round_id, "seed");
        let before = session.state().founder_ownership;
        session.accept_funding(&terms);
        assert!(session.state().founder_ownership < before);
        assert_eq!(session.state().funding_rounds_completed, vec!["seed"]);
    }

    #[test]
    fn same_seed_same_story() {
        let mut a = started("orphan-gene-therapy", 77);
        let mut b = started("orphan-gene-therapy", 77);
        for _ in 0..24 {
            let ra = a.play_quarter();
            let rb = b.play_quarter();
            assert_eq!(ra, rb);
            for session in [&mut a, &mut b] {
                if let Some(event) = session.state().pending_event.clone() {
                    session.resolve_pending(&event.choices[0].id);
                }
            }
        }
        assert_eq!(a.state(), b.state());
    }
}
