//! Path variant game state.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BURN_RATE, QUARTERS_PER_YEAR, STARTING_CONFIDENCE, STARTING_YEAR};
use crate::financing::FinancingEvent;
use crate::path::catalog::{GamePath, PathPhase, path_by_id};
use crate::path::events::PathEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathStatus {
    #[default]
    PathSelection,
    Playing,
    Victory,
    Defeat,
}

impl PathStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// One resolved narrative event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub choice_id: String,
    pub phase: PathPhase,
    pub year: i32,
    pub quarter: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGameState {
    pub path_id: Option<String>,
    pub capital: f64,
    pub burn_rate: f64,
    pub current_year: i32,
    /// Always within `1..=4`.
    pub current_quarter: i32,
    #[serde(default)]
    pub quarters_elapsed: u32,
    pub current_phase: PathPhase,
    pub phase_progress: f64,
    pub founder_ownership: f64,
    #[serde(default)]
    pub funding_rounds_completed: Vec<String>,
    #[serde(default)]
    pub funding_history: Vec<FinancingEvent>,
    #[serde(default)]
    pub pending_event: Option<PathEvent>,
    #[serde(default)]
    pub completed_events: Vec<String>,
    #[serde(default)]
    pub event_history: Vec<EventRecord>,
    pub investor_confidence: u8,
    /// Peak annual sales in $B, scaled by event outcomes.
    pub market_potential: f64,
    pub status: PathStatus,
}

impl Default for PathGameState {
    fn default() -> Self {
        Self {
            path_id: None,
            capital: 0.0,
            burn_rate: DEFAULT_BURN_RATE,
            current_year: STARTING_YEAR,
            current_quarter: 1,
            quarters_elapsed: 0,
            current_phase: PathPhase::Discovery,
            phase_progress: 0.0,
            founder_ownership: 1.0,
            funding_rounds_completed: Vec::new(),
            funding_history: Vec::new(),
            pending_event: None,
            completed_events: Vec::new(),
            event_history: Vec::new(),
            investor_confidence: STARTING_CONFIDENCE,
            market_potential: 0.0,
            status: PathStatus::PathSelection,
        }
    }
}

impl PathGameState {
    /// Static definition of the selected path.
    #[must_use]
    pub fn path(&self) -> Option<&'static GamePath> {
        self.path_id.as_deref().and_then(path_by_id)
    }

    /// Quarters of cash left at the current burn, or `None` when nothing burns.
    #[must_use]
    pub fn runway_quarters(&self) -> Option<f64> {
        (self.burn_rate > 0.0).then(|| self.capital / self.burn_rate)
    }

    /// Move the calendar by `delta` quarters. Negative deltas rewind across
    /// year boundaries.
    /// Saturates at the ends of the `i32` year range instead of wrapping.
    pub(crate) fn shift_calendar(&mut self, delta: i32) {
        let per_year = i64::from(QUARTERS_PER_YEAR);
        let index = (i64::from(self.current_year) * per_year + i64::from(self.current_quarter) - 1)
            .saturating_add(i64::from(delta));
        let year = index
            .div_euclid(per_year)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        self.current_year = i32::try_from(year).unwrap_or(self.current_year);
        self.current_quarter = i32::try_from(index.rem_euclid(per_year) + 1).unwrap_or(1);
    }

    /// Score points lost to dilution across every completed round.
    #[must_use]
    pub fn dilution_penalty_points(&self) -> i64 {
        self.funding_history.iter().map(|e| e.score_penalty).sum()
    }
}

/// Fresh record waiting for the player to pick a path.
#[must_use]
pub fn create_initial_path_state() -> PathGameState {
    PathGameState::default()
}
