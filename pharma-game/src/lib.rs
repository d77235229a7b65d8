//! Pharma Pipeline Game Engine
//!
//! Platform-agnostic core logic for an educational drug development game.
//! Two independent variants share the financing rules:
//!
//! | Module | Role |
//! |--------|------|
//! | [`board`] | 24-space board driven by [`game_reducer`] |
//! | [`path`] | Quarter-based path and event game driven by [`path_game_reducer`] |
//! | [`financing`] | Ownership dilution and score penalty for every raise |
//! | [`tokens`] | Data token counters and gate checks |
//! | [`constants`] | Balance tuning |
//!
//! Reducers are pure; randomness only enters through helpers that take an
//! explicit `rand::Rng`, and through the seeded sessions built on top.

pub mod board;
pub mod constants;
pub mod error;
pub mod financing;
pub mod numbers;
pub mod path;
pub mod tokens;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use board::{
    BoardPhase, BoardSession, Decision, DecisionOption, Difficulty, GameAction, GameState,
    GameStatus, PendingInteraction, ScoreBreakdown, TurnOutcome, TurnReport, calculate_final_score,
    can_afford, create_initial_state, game_reducer, get_scenario_for_space, phase_for_space,
    score_breakdown,
};
pub use error::{ActionError, ContentError};
pub use financing::{FinancingEvent, apply_financing};
pub use path::{
    FundingTerms, PathAction, PathEvent, PathGameState, PathPhase, PathSession, PathStatus,
    QuarterOutcome, QuarterReport, calculate_funding_terms, create_initial_path_state,
    get_random_event, path_game_reducer, should_trigger_funding,
};
pub use tokens::{DataTokens, TokenKind, get_token_deficit, meets_gate_requirements};

/// A stored game of either variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "state", rename_all = "lowercase")]
pub enum SavedGame {
    Board(GameState),
    Path(PathGameState),
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a game
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot be saved.
    fn save_game(&self, save_name: &str, game: &SavedGame) -> Result<(), Self::Error>;

    /// Load a game
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<SavedGame>, Self::Error>;

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Creates sessions and moves their state in and out of storage.
pub struct GameEngine<S: GameStorage> {
    storage: S,
}

impl<S: GameStorage> GameEngine<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn create_board_session(&self, difficulty: Difficulty, seed: u64) -> BoardSession {
        BoardSession::new(difficulty, seed)
    }

    #[must_use]
    pub fn create_path_session(&self, seed: u64) -> PathSession {
        PathSession::new(seed)
    }

    /// Save a board game.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the save.
    pub fn save_board(&self, save_name: &str, state: &GameState) -> Result<(), S::Error> {
        self.storage
            .save_game(save_name, &SavedGame::Board(state.clone()))
    }

    /// Save a path game.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the save.
    pub fn save_path(&self, save_name: &str, state: &PathGameState) -> Result<(), S::Error> {
        self.storage
            .save_game(save_name, &SavedGame::Path(state.clone()))
    }

    /// Restore a board session by dispatching `LoadGame` into a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails, the save holds a path game, or the
    /// saved state fails validation.
    pub fn load_board(&self, save_name: &str, seed: u64) -> Result<Option<BoardSession>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        match self.storage.load_game(save_name).map_err(Into::into)? {
            None => Ok(None),
            Some(SavedGame::Board(state)) => {
                let action = GameAction::LoadGame {
                    state: Box::new(state),
                };
                action
                    .validate()
                    .with_context(|| format!("save {save_name} holds an invalid board game"))?;
                let mut session = BoardSession::from_state(GameState::default(), seed);
                session.dispatch(action);
                Ok(Some(session))
            }
            Some(SavedGame::Path(_)) => {
                anyhow::bail!("save {save_name} holds a path game, not a board game")
            }
        }
    }

    /// Restore a path session by dispatching `Load` into a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails, the save holds a board game, or the
    /// saved state fails validation.
    pub fn load_path(&self, save_name: &str, seed: u64) -> Result<Option<PathSession>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        match self.storage.load_game(save_name).map_err(Into::into)? {
            None => Ok(None),
            Some(SavedGame::Path(state)) => {
                let action = PathAction::Load {
                    state: Box::new(state),
                };
                action
                    .validate()
                    .with_context(|| format!("save {save_name} holds an invalid path game"))?;
                let mut session = PathSession::new(seed);
                session.dispatch(action);
                Ok(Some(session))
            }
            Some(SavedGame::Board(_)) => {
                anyhow::bail!("save {save_name} holds a board game, not a path game")
            }
        }
    }

    /// Delete a save.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}
