//! Board variant game state.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::decision::Decision;
use crate::board::shadow::{ShadowProgramState, initial_shadow_programs};
use crate::board::space::{BoardPhase, phase_for_space};
use crate::constants::FIRST_SPACE;
use crate::financing::FinancingEvent;
use crate::tokens::DataTokens;

/// Market the player is developing for. Bigger markets start with less cash
/// relative to their costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Orphan,
    #[default]
    Specialty,
    Blockbuster,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Orphan, Self::Specialty, Self::Blockbuster];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orphan => "orphan",
            Self::Specialty => "specialty",
            Self::Blockbuster => "blockbuster",
        }
    }

    #[must_use]
    pub const fn starting_capital(self) -> f64 {
        match self {
            Self::Orphan => 200.0,
            Self::Specialty => 175.0,
            Self::Blockbuster => 150.0,
        }
    }

    #[must_use]
    pub const fn cost_multiplier(self) -> f64 {
        match self {
            Self::Orphan => 0.8,
            Self::Specialty => 1.0,
            Self::Blockbuster => 1.25,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orphan" => Ok(Self::Orphan),
            "specialty" => Ok(Self::Specialty),
            "blockbuster" => Ok(Self::Blockbuster),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// The single interaction awaiting the player. Only one can be open at once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingInteraction {
    #[default]
    None,
    Decision(Decision),
    ShadowFailure {
        program_id: String,
    },
    PolicyScenario {
        scenario_id: String,
    },
}

impl PendingInteraction {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Decision(decision) => Some(decision),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePenalty {
    pub reason: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub turn: u32,
    pub decision_id: String,
    pub option_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedProgramRecord {
    pub turn: u32,
    pub program_id: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub turn: u32,
    pub space_id: u8,
    pub amount: f64,
}

/// Append-only logs. Only the payment log feeds back into logic (total spend).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardHistory {
    #[serde(default)]
    pub decisions: Vec<DecisionRecord>,
    #[serde(default)]
    pub financing: Vec<FinancingEvent>,
    #[serde(default)]
    pub failed_programs: Vec<FailedProgramRecord>,
    #[serde(default)]
    pub space_visits: Vec<u8>,
    #[serde(default)]
    pub cards_drawn: Vec<String>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub policy_choices: Vec<DecisionRecord>,
}

impl BoardHistory {
    #[must_use]
    pub fn total_spent(&self) -> f64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub capital: f64,
    pub data_tokens: DataTokens,
    pub current_space: u8,
    pub phase: BoardPhase,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    #[serde(default)]
    pub pending: PendingInteraction,
    pub shadow_programs: Vec<ShadowProgramState>,
    pub founder_ownership: f64,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub wait_turns: u32,
    #[serde(default)]
    pub total_failure_cost: f64,
    #[serde(default)]
    pub penalties: Vec<ScorePenalty>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub history: BoardHistory,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            capital: 0.0,
            data_tokens: DataTokens::ZERO,
            current_space: FIRST_SPACE,
            phase: phase_for_space(FIRST_SPACE),
            difficulty: Difficulty::default(),
            status: GameStatus::Menu,
            pending: PendingInteraction::None,
            shadow_programs: initial_shadow_programs(),
            founder_ownership: 1.0,
            turn: 0,
            wait_turns: 0,
            total_failure_cost: 0.0,
            penalties: Vec::new(),
            score: 0,
            history: BoardHistory::default(),
        }
    }
}

impl GameState {
    #[must_use]
    pub fn total_spent(&self) -> f64 {
        self.history.total_spent()
    }

    #[must_use]
    pub fn penalty_points(&self) -> i64 {
        self.penalties.iter().map(|p| p.points).sum()
    }

    #[must_use]
    pub fn shadow_program(&self, program_id: &str) -> Option<&ShadowProgramState> {
        self.shadow_programs.iter().find(|p| p.id == program_id)
    }

    #[must_use]
    pub fn active_shadow_programs(&self) -> usize {
        self.shadow_programs.iter().filter(|p| p.is_active()).count()
    }

    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.wait_turns > 0
    }
}

/// Fresh playing state for a new game at `difficulty`.
#[must_use]
pub fn create_initial_state(difficulty: Difficulty) -> GameState {
    GameState {
        capital: difficulty.starting_capital(),
        difficulty,
        status: GameStatus::Playing,
        history: BoardHistory {
            space_visits: vec![FIRST_SPACE],
            ..BoardHistory::default()
        },
        ..GameState::default()
    }
}

/// Whether the player can pay `amount` without going bankrupt.
#[must_use]
pub fn can_afford(state: &GameState, amount: f64) -> bool {
    state.capital > amount
}
