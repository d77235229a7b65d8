use std::fmt;

use clap::ValueEnum;
use pharma_game::board::{DecisionOutcome, PolicyChoice, PolicyScenario};
use pharma_game::numbers::i64_to_f64;
use pharma_game::path::EventChoice;
use pharma_game::{Decision, DecisionOption, FundingTerms, GameState, PathEvent, PathGameState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick an option for a pending board decision (rescue or financing offer).
    fn pick_option(&mut self, state: &GameState, decision: &Decision) -> PolicyDecision;

    /// Pick a response to a policy scenario on the board.
    fn pick_policy_choice(&mut self, state: &GameState, scenario: &PolicyScenario)
    -> PolicyDecision;

    /// Pick a response to a pending path event.
    fn pick_event_choice(&mut self, state: &PathGameState, event: &PathEvent) -> PolicyDecision;

    /// Whether to close a funding round on the offered terms.
    fn accept_funding(&mut self, state: &PathGameState, terms: &FundingTerms) -> bool;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum GameplayStrategy {
    Conservative,
    Aggressive,
    Balanced,
    MonteCarlo,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [
        Self::Conservative,
        Self::Aggressive,
        Self::Balanced,
        Self::MonteCarlo,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Conservative => "Conservative",
            GameplayStrategy::Aggressive => "Aggressive",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::MonteCarlo => "Monte Carlo",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Conservative => Box::new(ConservativePolicy),
            GameplayStrategy::Aggressive => Box::new(AggressivePolicy),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::MonteCarlo => Box::new(MonteCarloPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct ConservativePolicy;
struct AggressivePolicy;
struct BalancedPolicy;

struct MonteCarloPolicy {
    rng: ChaCha20Rng,
    simulations: u32,
}

impl MonteCarloPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            simulations: 12,
        }
    }
}

/// Below this stake nobody takes the rescue round again.
const OWNERSHIP_FLOOR: f64 = 0.2;

impl PlayerPolicy for ConservativePolicy {
    fn name(&self) -> &'static str {
        "Conservative"
    }

    fn pick_option(&mut self, state: &GameState, decision: &Decision) -> PolicyDecision {
        let (idx, risk) = best_by(&decision.options, |option| {
            -option_risk(state, option)
        });
        PolicyDecision::new(idx, Some(format!("risk {:.1}", -risk)))
    }

    fn pick_policy_choice(
        &mut self,
        _state: &GameState,
        scenario: &PolicyScenario,
    ) -> PolicyDecision {
        let (idx, cost) = best_by(&scenario.choices, |choice| {
            choice.effect.capital - f64::from(choice.effect.wait_turns) * 5.0
        });
        PolicyDecision::new(idx, Some(format!("cost {:.1}", -cost)))
    }

    fn pick_event_choice(&mut self, _state: &PathGameState, event: &PathEvent) -> PolicyDecision {
        let (idx, cost) = best_by(&event.choices, |choice| -choice.cost);
        PolicyDecision::new(idx, Some(format!("cost {:.1}", -cost)))
    }

    fn accept_funding(&mut self, _state: &PathGameState, _terms: &FundingTerms) -> bool {
        true
    }
}

impl PlayerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn pick_option(&mut self, state: &GameState, decision: &Decision) -> PolicyDecision {
        let (idx, reward) = best_by(&decision.options, |option| {
            option_reward(option) - shutdown_penalty(state, option) - floor_penalty(state, option)
        });
        PolicyDecision::new(idx, Some(format!("reward {reward:.1}")))
    }

    fn pick_policy_choice(
        &mut self,
        _state: &GameState,
        scenario: &PolicyScenario,
    ) -> PolicyDecision {
        let (idx, reward) = best_by(&scenario.choices, policy_reward);
        PolicyDecision::new(idx, Some(format!("reward {reward:.1}")))
    }

    fn pick_event_choice(&mut self, _state: &PathGameState, event: &PathEvent) -> PolicyDecision {
        let (idx, reward) = best_by(&event.choices, event_reward);
        PolicyDecision::new(idx, Some(format!("reward {reward:.1}")))
    }

    fn accept_funding(&mut self, state: &PathGameState, _terms: &FundingTerms) -> bool {
        // Hold out for better terms until half a year of cash is left.
        state
            .runway_quarters()
            .is_none_or(|runway| runway < 2.0)
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_option(&mut self, state: &GameState, decision: &Decision) -> PolicyDecision {
        let (idx, score) = best_by(&decision.options, |option| {
            option_reward(option) - option_risk(state, option)
        });
        PolicyDecision::new(idx, Some(format!("score {score:.1}")))
    }

    fn pick_policy_choice(
        &mut self,
        _state: &GameState,
        scenario: &PolicyScenario,
    ) -> PolicyDecision {
        let (idx, score) = best_by(&scenario.choices, |choice| {
            policy_reward(choice) + choice.effect.capital
        });
        PolicyDecision::new(idx, Some(format!("score {score:.1}")))
    }

    fn pick_event_choice(&mut self, state: &PathGameState, event: &PathEvent) -> PolicyDecision {
        let (idx, score) = best_by(&event.choices, |choice| event_score(state, choice));
        PolicyDecision::new(idx, Some(format!("score {score:.1}")))
    }

    fn accept_funding(&mut self, state: &PathGameState, terms: &FundingTerms) -> bool {
        terms.dilution <= 0.25 || state.runway_quarters().is_none_or(|runway| runway < 3.0)
    }
}

impl PlayerPolicy for MonteCarloPolicy {
    fn name(&self) -> &'static str {
        "Monte Carlo"
    }

    fn pick_option(&mut self, state: &GameState, decision: &Decision) -> PolicyDecision {
        let simulations = self.simulations;
        let rng = &mut self.rng;
        let (idx, score) = best_by(&decision.options, |option| {
            jittered(rng, simulations, option_reward(option) - option_risk(state, option))
        });
        PolicyDecision::new(idx, Some(format!("score {score:.2}")))
    }

    fn pick_policy_choice(
        &mut self,
        _state: &GameState,
        scenario: &PolicyScenario,
    ) -> PolicyDecision {
        let simulations = self.simulations;
        let rng = &mut self.rng;
        let (idx, score) = best_by(&scenario.choices, |choice| {
            jittered(rng, simulations, policy_reward(choice) + choice.effect.capital)
        });
        PolicyDecision::new(idx, Some(format!("score {score:.2}")))
    }

    fn pick_event_choice(&mut self, state: &PathGameState, event: &PathEvent) -> PolicyDecision {
        let simulations = self.simulations;
        let rng = &mut self.rng;
        let (idx, score) = best_by(&event.choices, |choice| {
            jittered(rng, simulations, event_score(state, choice))
        });
        PolicyDecision::new(idx, Some(format!("score {score:.2}")))
    }

    fn accept_funding(&mut self, state: &PathGameState, _terms: &FundingTerms) -> bool {
        let urgency = state
            .runway_quarters()
            .map_or(1.0, |runway| (1.0 - runway / 4.0).clamp(0.25, 1.0));
        self.rng.gen_bool(urgency)
    }
}

/// Index and score of the highest-scoring item; the first wins ties.
fn best_by<T>(items: &[T], mut score: impl FnMut(&T) -> f64) -> (usize, f64) {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| (idx, score(item)))
        .fold((0, f64::NEG_INFINITY), |best, candidate| {
            if candidate.1 > best.1 { candidate } else { best }
        })
}

fn option_reward(option: &DecisionOption) -> f64 {
    let effect = &option.effect;
    effect.capital + f64::from(effect.gain_tokens.total()) * 10.0
        - f64::from(effect.lose_tokens.total()) * 10.0
}

fn option_risk(state: &GameState, option: &DecisionOption) -> f64 {
    let effect = &option.effect;
    let stake_lost = state.founder_ownership * effect.dilution_percent;
    let risk = stake_lost + f64::from(effect.lose_tokens.total()) * 15.0;
    risk + shutdown_penalty(state, option) + floor_penalty(state, option)
}

/// Walking away only makes sense once the stake is nearly gone.
fn shutdown_penalty(state: &GameState, option: &DecisionOption) -> f64 {
    if option.effect.outcome == DecisionOutcome::Shutdown
        && state.founder_ownership > OWNERSHIP_FLOOR
    {
        500.0
    } else {
        0.0
    }
}

fn floor_penalty(state: &GameState, option: &DecisionOption) -> f64 {
    if option.effect.dilution_percent > 0.0 && state.founder_ownership <= OWNERSHIP_FLOOR {
        1_000.0
    } else {
        0.0
    }
}

fn policy_reward(choice: &PolicyChoice) -> f64 {
    let effect = &choice.effect;
    f64::from(effect.gain_tokens.total()) * 12.0
        - f64::from(effect.lose_tokens.total()) * 12.0
        - f64::from(effect.wait_turns) * 4.0
        - i64_to_f64(effect.score_penalty.max(0)) / 10.0
}

fn event_reward(choice: &EventChoice) -> f64 {
    (choice.market_impact - 1.0) * 100.0 + f64::from(choice.confidence)
}

fn event_score(state: &PathGameState, choice: &EventChoice) -> f64 {
    let mut score = event_reward(choice) - choice.cost;
    if state.capital - choice.cost <= state.burn_rate {
        score -= 1_000.0;
    }
    score - choice.time_impact.max(0.0) * 20.0
}

fn jittered(rng: &mut ChaCha20Rng, simulations: u32, base: f64) -> f64 {
    let iterations = simulations.max(1);
    let mut total = 0.0_f64;
    for _ in 0..iterations {
        total += base + rng.r#gen::<f64>();
    }
    total / f64::from(iterations)
}
