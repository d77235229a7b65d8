use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use pharma_game::board::{policy_catalog, shadow_failure_cost};
use pharma_game::{
    BoardSession, Difficulty, GameAction, GameState, GameStatus, PathAction, PathGameState,
    PathSession, PathStatus, PendingInteraction, QuarterOutcome, TurnOutcome,
};

use super::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

pub const DEFAULT_MAX_TURNS: u32 = 1_000;
pub const DEFAULT_MAX_QUARTERS: u32 = 200;

/// Which engine a run drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Board,
    Path,
}

impl EngineKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Path => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationTarget {
    Board(Difficulty),
    Path(&'static str),
}

impl SimulationTarget {
    #[must_use]
    pub const fn engine(self) -> EngineKind {
        match self {
            Self::Board(_) => EngineKind::Board,
            Self::Path(_) => EngineKind::Path,
        }
    }
}

impl fmt::Display for SimulationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(difficulty) => write!(f, "board/{difficulty}"),
            Self::Path(path_id) => write!(f, "path/{path_id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub target: SimulationTarget,
    pub strategy: GameplayStrategy,
    pub max_steps: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(target: SimulationTarget, strategy: GameplayStrategy) -> Self {
        Self {
            target,
            strategy,
            max_steps: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: GameplayStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    const fn step_limit(&self) -> u32 {
        match (self.max_steps, self.target) {
            (Some(limit), _) => limit,
            (None, SimulationTarget::Board(_)) => DEFAULT_MAX_TURNS,
            (None, SimulationTarget::Path(_)) => DEFAULT_MAX_QUARTERS,
        }
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// Run the hook against a finished summary.
    ///
    /// # Errors
    ///
    /// Returns the hook's error when the run broke an expectation.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One answered prompt, kept for failure reports.
#[derive(Debug, Clone)]
pub struct DecisionLogEntry {
    pub step: u32,
    pub prompt_id: String,
    pub choice_id: String,
    pub policy_name: &'static str,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FinalState {
    Board(GameState),
    Path(PathGameState),
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub target: SimulationTarget,
    pub strategy: GameplayStrategy,
    pub steps: u32,
    pub board_turns: Vec<TurnOutcome>,
    pub quarters: Vec<QuarterOutcome>,
    pub decision_log: Vec<DecisionLogEntry>,
    pub final_state: FinalState,
    pub ending_message: String,
    pub game_ended: bool,
    pub won: bool,
}

impl SimulationSummary {
    #[must_use]
    pub const fn board(&self) -> Option<&GameState> {
        match &self.final_state {
            FinalState::Board(state) => Some(state),
            FinalState::Path(_) => None,
        }
    }

    #[must_use]
    pub const fn path(&self) -> Option<&PathGameState> {
        match &self.final_state {
            FinalState::Path(state) => Some(state),
            FinalState::Board(_) => None,
        }
    }

    /// One-line view of the final numbers.
    #[must_use]
    pub fn final_snapshot(&self) -> String {
        match &self.final_state {
            FinalState::Board(state) => format!(
                "space {} capital {:.1} ownership {:.3} tokens {}",
                state.current_space,
                state.capital,
                state.founder_ownership,
                state.data_tokens.total()
            ),
            FinalState::Path(state) => format!(
                "phase {} progress {:.0}% capital {:.1} ownership {:.3} confidence {}",
                state.current_phase,
                state.phase_progress,
                state.capital,
                state.founder_ownership,
                state.investor_confidence
            ),
        }
    }
}

/// Run `plan` once under `seed`.
#[must_use]
pub fn run_plan(plan: &SimulationPlan, seed: u64) -> SimulationSummary {
    let mut policy = plan.strategy.create_policy(seed);
    match plan.target {
        SimulationTarget::Board(difficulty) => {
            run_board(plan, difficulty, seed, policy.as_mut())
        }
        SimulationTarget::Path(path_id) => run_path(plan, path_id, seed, policy.as_mut()),
    }
}

fn run_board(
    plan: &SimulationPlan,
    difficulty: Difficulty,
    seed: u64,
    policy: &mut dyn PlayerPolicy,
) -> SimulationSummary {
    let mut session = BoardSession::new(difficulty, seed);
    let mut decision_log = Vec::new();
    let mut board_turns = Vec::new();
    let limit = plan.step_limit();

    let mut steps = 0;
    while steps < limit {
        if let Some(entry) = answer_board_prompt(&mut session, policy, steps) {
            decision_log.push(entry);
        }
        if session.state().status.is_terminal() && session.state().pending.is_none() {
            break;
        }
        let report = session.play_turn();
        log::debug!(
            "seed {seed} turn {} space {} -> {:?}",
            report.turn,
            session.state().current_space,
            report.outcome
        );
        board_turns.push(report.outcome);
        steps += 1;
    }
    if let Some(entry) = answer_board_prompt(&mut session, policy, steps) {
        decision_log.push(entry);
    }

    let state = session.into_state();
    let game_ended = state.status.is_terminal() && state.pending.is_none();
    let won = state.status == GameStatus::Won;
    let ending_message = match state.status {
        GameStatus::Won => format!("Approved (score {})", state.score),
        GameStatus::Lost => "Shut down".to_string(),
        status => format!("Halted while {status:?}"),
    };

    SimulationSummary {
        seed,
        target: plan.target,
        strategy: plan.strategy,
        steps,
        board_turns,
        quarters: Vec::new(),
        decision_log,
        final_state: FinalState::Board(state),
        ending_message,
        game_ended,
        won,
    }
}

/// Answer whatever the board is waiting on. Returns the logged answer, if any.
fn answer_board_prompt(
    session: &mut BoardSession,
    policy: &mut dyn PlayerPolicy,
    step: u32,
) -> Option<DecisionLogEntry> {
    let state = session.state();
    let (prompt_id, choice_id, pick, action) = match &state.pending {
        PendingInteraction::None => return None,
        PendingInteraction::Decision(decision) => {
            let pick = policy.pick_option(state, decision);
            let option = decision.options.get(pick.choice_index)?;
            let action = GameAction::ResolveDecision {
                option_id: option.id.clone(),
            };
            (decision.id.clone(), option.id.clone(), pick, action)
        }
        PendingInteraction::PolicyScenario { scenario_id } => {
            let scenario = policy_catalog().get(scenario_id)?;
            let pick = policy.pick_policy_choice(state, scenario);
            let choice = scenario.choices.get(pick.choice_index)?;
            let action = GameAction::ResolvePolicyScenario {
                choice_id: choice.id.clone(),
            };
            (scenario.id.clone(), choice.id.clone(), pick, action)
        }
        PendingInteraction::ShadowFailure { program_id } => {
            let action = GameAction::ShadowProgramFailed {
                program_id: program_id.clone(),
                cost: shadow_failure_cost(state.phase),
            };
            let pick = PolicyDecision::new(0, Some("acknowledged".to_string()));
            (program_id.clone(), "acknowledge".to_string(), pick, action)
        }
    };
    session.dispatch(action);
    Some(DecisionLogEntry {
        step,
        prompt_id,
        choice_id,
        policy_name: policy.name(),
        rationale: pick.rationale,
    })
}

fn run_path(
    plan: &SimulationPlan,
    path_id: &'static str,
    seed: u64,
    policy: &mut dyn PlayerPolicy,
) -> SimulationSummary {
    let mut session = PathSession::new(seed);
    session.dispatch(PathAction::SelectPath {
        path_id: path_id.to_string(),
    });
    let mut decision_log = Vec::new();
    let mut quarters = Vec::new();
    let limit = plan.step_limit();

    let mut steps = 0;
    while steps < limit {
        if let Some(entry) = answer_path_event(&mut session, policy, steps) {
            decision_log.push(entry);
        }
        if session.state().status.is_terminal() {
            break;
        }
        let report = session.play_quarter();
        log::debug!(
            "seed {seed} Y{}Q{} {} -> {:?}",
            report.year,
            report.quarter,
            session.state().current_phase,
            report.outcome
        );
        if let Some(terms) = report.funding_offer.as_ref()
            && policy.accept_funding(session.state(), terms)
        {
            session.accept_funding(terms);
            decision_log.push(DecisionLogEntry {
                step: steps,
                prompt_id: terms.round_id.clone(),
                choice_id: "accept".to_string(),
                policy_name: policy.name(),
                rationale: Some(format!(
                    "raise {:.1} for {:.1}%",
                    terms.raise,
                    terms.dilution * 100.0
                )),
            });
        }
        let blocked = report.outcome == QuarterOutcome::Blocked;
        quarters.push(report.outcome);
        steps += 1;
        if blocked {
            break;
        }
    }

    let state = session.into_state();
    let game_ended = state.status.is_terminal();
    let won = state.status == PathStatus::Victory;
    let ending_message = match state.status {
        PathStatus::Victory => "Approved".to_string(),
        PathStatus::Defeat => "Ran out of cash".to_string(),
        status => format!("Halted in {status:?}"),
    };

    SimulationSummary {
        seed,
        target: plan.target,
        strategy: plan.strategy,
        steps,
        board_turns: Vec::new(),
        quarters,
        decision_log,
        final_state: FinalState::Path(state),
        ending_message,
        game_ended,
        won,
    }
}

fn answer_path_event(
    session: &mut PathSession,
    policy: &mut dyn PlayerPolicy,
    step: u32,
) -> Option<DecisionLogEntry> {
    let event = session.state().pending_event.clone()?;
    let pick = policy.pick_event_choice(session.state(), &event);
    let choice = event.choices.get(pick.choice_index)?;
    session.resolve_pending(&choice.id);
    Some(DecisionLogEntry {
        step,
        prompt_id: event.id.clone(),
        choice_id: choice.id.clone(),
        policy_name: policy.name(),
        rationale: pick.rationale,
    })
}
