//! Path variant: a chosen disease and modality progress through six
//! development phases quarter by quarter while cash burns down.
pub mod action;
pub mod catalog;
pub mod events;
pub mod funding;
pub mod reducer;
pub mod session;
pub mod state;

pub use action::PathAction;
pub use catalog::{DiseaseTier, GAME_PATHS, GamePath, Modality, PathPhase, path_by_id};
pub use events::{EventChoice, EventPool, PathEvent, event_pool, get_random_event};
pub use funding::{
    Band, FUNDING_ROUND_DEFS, FundingRoundDef, FundingTerms, calculate_funding_terms,
    funding_round_def, should_trigger_funding,
};
pub use reducer::path_game_reducer;
pub use session::{PathSession, QuarterOutcome, QuarterReport};
pub use state::{EventRecord, PathGameState, PathStatus, create_initial_path_state};
