//! Narrative events that interrupt path progress.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::ContentError;
use crate::path::catalog::PathPhase;
use crate::path::state::PathGameState;

const DEFAULT_PATH_EVENTS: &str = include_str!("../../assets/path_events.json");

const fn neutral_market_impact() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub id: String,
    pub label: String,
    /// $M spent; negative values bring money in.
    #[serde(default)]
    pub cost: f64,
    /// Investor confidence delta in points.
    #[serde(default)]
    pub confidence: i32,
    /// Multiplier applied to market potential.
    #[serde(default = "neutral_market_impact")]
    pub market_impact: f64,
    /// Calendar shift in years; negative values pull the timeline in.
    #[serde(default)]
    pub time_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub phase: PathPhase,
    /// Restricts the event to these path ids when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    pub choices: Vec<EventChoice>,
}

impl PathEvent {
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&EventChoice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    #[must_use]
    pub fn applies_to(&self, path_id: Option<&str>, phase: PathPhase) -> bool {
        self.phase == phase
            && self.paths.as_ref().is_none_or(|allowed| {
                path_id.is_some_and(|id| allowed.iter().any(|path| path == id))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventPool {
    pub events: Vec<PathEvent>,
}

impl EventPool {
    /// Parse an event pool from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, an event has no choices, or
    /// an id is reused.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let pool: Self = serde_json::from_str(json).map_err(|source| ContentError::Parse {
            table: "path_events",
            source,
        })?;
        for (idx, event) in pool.events.iter().enumerate() {
            if event.choices.is_empty() {
                return Err(ContentError::Invalid {
                    table: "path_events",
                    id: event.id.clone(),
                    reason: "event has no choices".to_string(),
                });
            }
            if pool.events[..idx].iter().any(|earlier| earlier.id == event.id) {
                return Err(ContentError::Invalid {
                    table: "path_events",
                    id: event.id.clone(),
                    reason: "duplicate event id".to_string(),
                });
            }
        }
        Ok(pool)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_PATH_EVENTS).unwrap_or_else(|err| {
            log::error!("embedded path events unusable: {err}");
            Self::default()
        })
    }

    /// Events that can fire for `path_id` during `phase`.
    #[must_use]
    pub fn pool_for(&self, path_id: Option<&str>, phase: PathPhase) -> Vec<&PathEvent> {
        self.events
            .iter()
            .filter(|event| event.applies_to(path_id, phase))
            .collect()
    }
}

pub fn event_pool() -> &'static EventPool {
    static POOL: OnceLock<EventPool> = OnceLock::new();
    POOL.get_or_init(EventPool::load_from_static)
}

/// Pick the next event for the state's path and phase.
///
/// Events not yet in `completed_events` are drawn first. Once the pool is
/// exhausted a random event is reissued under a fresh id stamped with the
/// game date and the number of events already completed.
pub fn get_random_event<R: Rng>(state: &PathGameState, rng: &mut R) -> Option<PathEvent> {
    let pool = event_pool().pool_for(state.path_id.as_deref(), state.current_phase);
    let unused: Vec<&PathEvent> = pool
        .iter()
        .copied()
        .filter(|event| !state.completed_events.contains(&event.id))
        .collect();
    if let Some(event) = unused.choose(rng) {
        return Some((*event).clone());
    }

    let mut recycled = (*pool.choose(rng)?).clone();
    recycled.id = format!(
        "{}#{}q{}-{}",
        recycled.id,
        state.current_year,
        state.current_quarter,
        state.completed_events.len()
    );
    Some(recycled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn embedded_pool_covers_every_phase() {
        let pool = event_pool();
        for phase in PathPhase::ALL {
            assert!(
                !pool.pool_for(None, phase).is_empty(),
                "no unrestricted events for {phase}"
            );
        }
    }

    #[test]
    fn restricted_events_only_match_listed_paths() {
        let pool = event_pool();
        let orphan = pool.pool_for(Some("orphan-gene-therapy"), PathPhase::Preclinical);
        let blockbuster = pool.pool_for(Some("blockbuster-small-molecule"), PathPhase::Preclinical);
        assert!(orphan.iter().any(|e| e.id == "vector-capacity-crunch"));
        assert!(!blockbuster.iter().any(|e| e.id == "vector-capacity-crunch"));
    }

    #[test]
    fn missing_fields_take_neutral_defaults() {
        let json = r#"{"events":[{"id":"e","title":"E","phase":"phase1",
            "choices":[{"id":"c","label":"C"}]}]}"#;
        let pool = EventPool::from_json(json).unwrap();
        let choice = &pool.events[0].choices[0];
        assert!((choice.market_impact - 1.0).abs() < f64::EPSILON);
        assert_eq!(choice.confidence, 0);
        assert!(choice.cost.abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"events":[
            {"id":"e","title":"E","phase":"phase1","choices":[{"id":"c","label":"C"}]},
            {"id":"e","title":"E2","phase":"phase2","choices":[{"id":"c","label":"C"}]}]}"#;
        assert!(matches!(
            EventPool::from_json(json),
            Err(ContentError::Invalid { .. })
        ));
    }

    #[test]
    fn unrestricted_events_serve_a_pathless_state() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let state = PathGameState::default();
        assert!(get_random_event(&state, &mut rng).is_some());
    }

    #[test]
    fn recycled_ids_carry_date_and_sequence() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut state = PathGameState {
            path_id: Some("blockbuster-biologic".to_string()),
            current_phase: PathPhase::Approval,
            current_year: 7,
            current_quarter: 3,
            ..PathGameState::default()
        };
        state.completed_events = event_pool()
            .pool_for(state.path_id.as_deref(), PathPhase::Approval)
            .iter()
            .map(|e| e.id.clone())
            .collect();
        let event = get_random_event(&state, &mut rng).unwrap();
        let n = state.completed_events.len();
        assert!(event.id.ends_with(&format!("#7q3-{n}")), "{}", event.id);
    }
}
