//! End-of-game scoring for the board variant.
use serde::{Deserialize, Serialize};

use crate::board::space::approval_requirement;
use crate::board::state::GameState;
use crate::constants::{
    SCORE_FAILED_PROGRAM_PENALTY, SCORE_SPEND_BONUS, SCORE_SPEND_PAR, SCORE_TOKEN_SURPLUS_BONUS,
    SCORE_TURN_BONUS, SCORE_TURN_PAR,
};
use crate::numbers::round_f64_to_i64;

/// Individual score components, kept for the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time_bonus: i64,
    pub cost_bonus: i64,
    pub data_bonus: i64,
    pub penalties: i64,
    pub failed_program_penalty: i64,
    pub total: i64,
}

#[must_use]
pub fn score_breakdown(state: &GameState) -> ScoreBreakdown {
    let turns = i64::from(state.turn);
    let time_bonus = ((SCORE_TURN_PAR - turns) * SCORE_TURN_BONUS).max(0);
    let cost_bonus =
        round_f64_to_i64(((SCORE_SPEND_PAR - state.total_spent()) * SCORE_SPEND_BONUS).max(0.0));
    let surplus = state.data_tokens.surplus_over(&approval_requirement());
    let data_bonus = i64::from(surplus) * SCORE_TOKEN_SURPLUS_BONUS;
    let penalties = state.penalty_points();
    let failed = i64::try_from(state.history.failed_programs.len()).unwrap_or(i64::MAX);
    let failed_program_penalty = failed.saturating_mul(SCORE_FAILED_PROGRAM_PENALTY);

    let total = (time_bonus + cost_bonus + data_bonus)
        .saturating_sub(penalties)
        .saturating_sub(failed_program_penalty)
        .max(0);

    ScoreBreakdown {
        time_bonus,
        cost_bonus,
        data_bonus,
        penalties,
        failed_program_penalty,
        total,
    }
}

/// Final score awarded on victory, floored at zero.
#[must_use]
pub fn calculate_final_score(state: &GameState) -> i64 {
    score_breakdown(state).total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::state::{
        Difficulty, FailedProgramRecord, PaymentRecord, ScorePenalty, create_initial_state,
    };
    use crate::tokens::DataTokens;

    fn scored_state() -> GameState {
        let mut state = create_initial_state(Difficulty::Specialty);
        state.turn = 30;
        state.history.payments = vec![PaymentRecord {
            turn: 1,
            space_id: 1,
            amount: 400.0,
        }];
        state.data_tokens = DataTokens::new(8, 6, 5, 4);
        state
    }

    #[test]
    fn components_follow_formula() {
        let breakdown = score_breakdown(&scored_state());
        assert_eq!(breakdown.time_bonus, 200);
        assert_eq!(breakdown.cost_bonus, 1_200);
        assert_eq!(breakdown.data_bonus, 15);
        assert_eq!(breakdown.total, 1_415);
    }

    #[test]
    fn penalties_and_failed_programs_subtract() {
        let mut state = scored_state();
        state.penalties.push(ScorePenalty {
            reason: "dilution".to_string(),
            points: 60,
        });
        state.history.failed_programs.push(FailedProgramRecord {
            turn: 4,
            program_id: "helix-7".to_string(),
            cost: 45.0,
        });
        assert_eq!(calculate_final_score(&state), 1_415 - 60 - 80);
    }

    #[test]
    fn slow_expensive_games_floor_at_zero() {
        let mut state = scored_state();
        state.turn = 90;
        state.history.payments[0].amount = 2_000.0;
        state.data_tokens = DataTokens::ZERO;
        state.penalties.push(ScorePenalty {
            reason: "policy".to_string(),
            points: 10,
        });
        let breakdown = score_breakdown(&state);
        assert_eq!(breakdown.time_bonus, 0);
        assert_eq!(breakdown.cost_bonus, 0);
        assert_eq!(breakdown.total, 0);
    }
}
