//! Competitor "shadow" programs that attrit alongside the player.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::space::BoardPhase;
use crate::constants::{SHADOW_FAILURE_BASE_COST, SHADOW_FAILURE_CHANCE, SHADOW_ROSTER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowStatus {
    #[default]
    Active,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowProgramState {
    pub id: String,
    pub name: String,
    pub indication: String,
    pub status: ShadowStatus,
}

impl ShadowProgramState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ShadowStatus::Active
    }
}

const ROSTER: [(&str, &str, &str); SHADOW_ROSTER_SIZE] = [
    ("helix-7", "Helix-7", "Alzheimer's disease"),
    ("corvid-2", "Corvid-2", "Heart failure"),
    ("tessera-ab", "Tessera-AB", "Triple-negative breast cancer"),
    ("lumen-gt", "Lumen-GT", "Retinitis pigmentosa"),
    ("quill-41", "Quill-41", "Non-alcoholic steatohepatitis"),
];

/// Fresh roster with every program active.
#[must_use]
pub fn initial_shadow_programs() -> Vec<ShadowProgramState> {
    ROSTER
        .iter()
        .map(|(id, name, indication)| ShadowProgramState {
            id: (*id).to_string(),
            name: (*name).to_string(),
            indication: (*indication).to_string(),
            status: ShadowStatus::Active,
        })
        .collect()
}

/// Sunk cost attributed to a program failing while the player is in `phase`.
/// Later failures burn more money.
#[must_use]
pub const fn shadow_failure_cost(phase: BoardPhase) -> f64 {
    let factor = match phase {
        BoardPhase::Discovery => 1.0,
        BoardPhase::Preclinical => 2.0,
        BoardPhase::Clinical => 4.0,
        BoardPhase::Regulatory => 6.0,
    };
    SHADOW_FAILURE_BASE_COST * factor
}

/// Roll whether one of the still-active programs fails this turn.
///
/// Returns the failing program's id. At most one program fails per roll.
pub fn roll_shadow_failure<R: Rng>(
    programs: &[ShadowProgramState],
    rng: &mut R,
) -> Option<String> {
    let active: Vec<&ShadowProgramState> = programs.iter().filter(|p| p.is_active()).collect();
    if active.is_empty() || !rng.gen_bool(SHADOW_FAILURE_CHANCE) {
        return None;
    }
    let idx = rng.gen_range(0..active.len());
    active.get(idx).map(|program| program.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn roster_starts_fully_active() {
        let roster = initial_shadow_programs();
        assert_eq!(roster.len(), SHADOW_ROSTER_SIZE);
        assert!(roster.iter().all(ShadowProgramState::is_active));
    }

    #[test]
    fn failed_programs_are_never_rolled_again() {
        let mut roster = initial_shadow_programs();
        for program in &mut roster {
            program.status = ShadowStatus::Failed;
        }
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        assert!((0..200).all(|_| roll_shadow_failure(&roster, &mut rng).is_none()));
    }

    #[test]
    fn rolls_eventually_pick_an_active_program() {
        let mut roster = initial_shadow_programs();
        roster[0].status = ShadowStatus::Failed;
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let picked: Vec<String> = (0..500)
            .filter_map(|_| roll_shadow_failure(&roster, &mut rng))
            .collect();
        assert!(!picked.is_empty());
        assert!(picked.iter().all(|id| id != "helix-7"));
    }

    #[test]
    fn later_phases_cost_more() {
        assert!(
            shadow_failure_cost(BoardPhase::Regulatory) > shadow_failure_cost(BoardPhase::Discovery)
        );
    }
}
