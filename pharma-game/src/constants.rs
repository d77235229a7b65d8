//! Centralized balance and tuning constants for the drug development game.
//!
//! These values define the deterministic math for both engines. Keeping them
//! together ensures that gameplay can only be adjusted via code changes
//! reviewed in version control, rather than through external JSON assets.

// Log keys -------------------------------------------------------------------
pub(crate) const LOG_BANKRUPTCY: &str = "log.board.bankruptcy";
pub(crate) const LOG_VICTORY: &str = "log.board.victory";
pub(crate) const LOG_PATH_DEFEAT: &str = "log.path.defeat";
pub(crate) const LOG_PATH_VICTORY: &str = "log.path.victory";
pub(crate) const LOG_ACTION_DROPPED: &str = "log.action.dropped";

// Board layout ---------------------------------------------------------------
pub const FIRST_SPACE: u8 = 1;
pub const LAST_SPACE: u8 = 24;
pub(crate) const DISCOVERY_LAST_SPACE: u8 = 6;
pub(crate) const PRECLINICAL_LAST_SPACE: u8 = 11;
pub(crate) const CLINICAL_LAST_SPACE: u8 = 18;
pub const SHADOW_ROSTER_SIZE: usize = 5;

// Board scoring --------------------------------------------------------------
pub(crate) const SCORE_TURN_PAR: i64 = 50;
pub(crate) const SCORE_TURN_BONUS: i64 = 10;
pub(crate) const SCORE_SPEND_PAR: f64 = 1_000.0;
pub(crate) const SCORE_SPEND_BONUS: f64 = 2.0;
pub(crate) const SCORE_TOKEN_SURPLUS_BONUS: i64 = 5;
pub(crate) const SCORE_FAILED_PROGRAM_PENALTY: i64 = 80;
pub(crate) const DILUTION_PENALTY_PER_POINT: f64 = 3.0;

// Board bankruptcy rescue ----------------------------------------------------
pub(crate) const RESCUE_DECISION_ID: &str = "bankruptcy";
pub(crate) const RESCUE_EMERGENCY_FINANCING_ID: &str = "emergency-financing";
pub(crate) const RESCUE_ASSET_SALE_ID: &str = "asset-sale";
pub(crate) const RESCUE_SHUTDOWN_ID: &str = "shutdown";
pub(crate) const RESCUE_FINANCING_RAISE: f64 = 40.0;
pub(crate) const RESCUE_FINANCING_DILUTION_PCT: f64 = 50.0;
pub(crate) const RESCUE_ASSET_SALE_PROCEEDS: f64 = 25.0;
pub(crate) const RESCUE_ASSET_SALE_TOKEN_LOSS: u32 = 1;

// Shadow programs ------------------------------------------------------------
pub(crate) const SHADOW_FAILURE_CHANCE: f64 = 0.08;
pub(crate) const SHADOW_FAILURE_BASE_COST: f64 = 45.0;

// Path engine ----------------------------------------------------------------
pub const DEFAULT_BURN_RATE: f64 = 5.0;
pub const QUARTERS_PER_YEAR: i32 = 4;
pub const STARTING_YEAR: i32 = 1;
pub(crate) const STARTING_CONFIDENCE: u8 = 50;
pub(crate) const CONFIDENCE_MAX: u8 = 100;
pub(crate) const PHASE_PROGRESS_MAX: f64 = 100.0;
pub(crate) const FUNDING_RUNWAY_THRESHOLD_QUARTERS: f64 = 4.0;
pub(crate) const CONFIDENCE_MULTIPLIER_BASE: f64 = 0.7;
pub(crate) const CONFIDENCE_MULTIPLIER_SPAN: f64 = 0.6;
pub(crate) const EVENT_CHANCE_PER_QUARTER: f64 = 0.35;
/// Longest single `AdvanceTime` step the reducer accepts (a century).
pub const MAX_ADVANCE_QUARTERS: u32 = 400;
/// Largest calendar shift, in years, a single event choice may carry.
pub const MAX_EVENT_TIME_IMPACT_YEARS: f64 = 25.0;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
