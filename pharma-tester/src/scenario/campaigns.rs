//! Full playthroughs driven by a strategy, checked against the engine's
//! standing invariants once the run ends.
use anyhow::{Result, ensure};
use pharma_game::{Difficulty, GameStatus, PathStatus, calculate_final_score};

use crate::logic::simulation::run_plan;
use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary, SimulationTarget};

const EPS: f64 = 1e-9;

pub fn smoke_plan() -> SimulationPlan {
    SimulationPlan::new(
        SimulationTarget::Board(Difficulty::Specialty),
        GameplayStrategy::Balanced,
    )
    .with_max_steps(12)
    .with_expectation(smoke_expectation)
}

pub fn board_plan(difficulty: Difficulty) -> SimulationPlan {
    SimulationPlan::new(
        SimulationTarget::Board(difficulty),
        GameplayStrategy::Balanced,
    )
    .with_expectation(finished_expectation)
    .with_expectation(board_invariants_expectation)
}

pub fn path_plan(path_id: &'static str) -> SimulationPlan {
    SimulationPlan::new(SimulationTarget::Path(path_id), GameplayStrategy::Conservative)
        .with_expectation(finished_expectation)
        .with_expectation(path_invariants_expectation)
}

pub fn replay_plan() -> SimulationPlan {
    SimulationPlan::new(
        SimulationTarget::Board(Difficulty::Blockbuster),
        GameplayStrategy::MonteCarlo,
    )
    .with_expectation(replay_expectation)
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.steps > 0, "No turns were played");
    board_invariants_expectation(summary)?;
    let Some(state) = summary.board() else {
        anyhow::bail!("smoke run did not drive the board");
    };
    ensure!(
        state.history.space_visits.first() == Some(&1),
        "Run should start on space 1"
    );
    Ok(())
}

fn finished_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.game_ended,
        "Game did not reach an ending within {} steps",
        summary.steps
    );
    Ok(())
}

fn board_invariants_expectation(summary: &SimulationSummary) -> Result<()> {
    let Some(state) = summary.board() else {
        return Ok(());
    };
    ensure!(state.capital >= 0.0, "Capital went negative: {}", state.capital);
    ensure!(
        (1..=24).contains(&state.current_space),
        "Token left the board: {}",
        state.current_space
    );
    ensure!(
        state.active_shadow_programs() <= 5,
        "Shadow roster grew to {}",
        state.active_shadow_programs()
    );

    let expected: f64 = state
        .history
        .financing
        .iter()
        .map(|event| 1.0 - event.dilution)
        .product();
    ensure!(
        (state.founder_ownership - expected).abs() < EPS,
        "Ownership {:.6} does not match financing history {:.6}",
        state.founder_ownership,
        expected
    );

    let paid: f64 = state.history.payments.iter().map(|p| p.amount).sum();
    ensure!(
        (state.total_spent() - paid).abs() < EPS,
        "Spend ledger out of sync"
    );

    if state.status == GameStatus::Won {
        ensure!(state.current_space == 24, "Won away from approval");
        ensure!(
            state.score == calculate_final_score(state),
            "Recorded score {} differs from recomputed {}",
            state.score,
            calculate_final_score(state)
        );
    }
    Ok(())
}

fn path_invariants_expectation(summary: &SimulationSummary) -> Result<()> {
    let Some(state) = summary.path() else {
        return Ok(());
    };
    ensure!(state.capital >= 0.0, "Capital went negative: {}", state.capital);
    ensure!(
        state.investor_confidence <= 100,
        "Confidence out of range: {}",
        state.investor_confidence
    );
    ensure!(
        (0.0..=100.0).contains(&state.phase_progress),
        "Phase progress out of range: {}",
        state.phase_progress
    );

    let expected: f64 = state
        .funding_history
        .iter()
        .map(|event| 1.0 - event.dilution)
        .product();
    ensure!(
        (state.founder_ownership - expected).abs() < EPS,
        "Ownership {:.6} does not match funding history {:.6}",
        state.founder_ownership,
        expected
    );

    if state.status == PathStatus::Defeat {
        ensure!(state.capital.abs() < EPS, "Defeat left capital behind");
        ensure!(state.pending_event.is_none(), "Defeat left an event open");
    }
    Ok(())
}

fn replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let plan = SimulationPlan::new(summary.target, summary.strategy);
    let replay = run_plan(&plan, summary.seed);
    ensure!(
        replay.final_state == summary.final_state,
        "Replay of seed {} diverged: {} vs {}",
        summary.seed,
        replay.final_snapshot(),
        summary.final_snapshot()
    );
    ensure!(
        replay.board_turns == summary.board_turns && replay.quarters == summary.quarters,
        "Replay of seed {} took a different route",
        summary.seed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_plans_pass_their_own_expectations() {
        for plan in [
            smoke_plan(),
            board_plan(Difficulty::Orphan),
            path_plan("orphan-gene-therapy"),
            replay_plan(),
        ] {
            for seed in [1, 1337] {
                let summary = run_plan(&plan, seed);
                for expectation in &plan.expectations {
                    expectation.evaluate(&summary).unwrap();
                }
            }
        }
    }

    #[test]
    fn invariants_catch_a_tampered_ledger() {
        let plan = board_plan(Difficulty::Specialty);
        let mut summary = run_plan(&plan, 3);
        if let crate::logic::simulation::FinalState::Board(state) = &mut summary.final_state {
            state.founder_ownership = 0.42;
        }
        assert!(board_invariants_expectation(&summary).is_err());
    }
}
