//! Board variant: a token walks 24 spaces from target identification to FDA
//! approval, paying for each attempt and collecting data tokens.
pub mod action;
pub mod cards;
pub mod decision;
pub mod policy;
pub mod reducer;
pub mod score;
pub mod session;
pub mod shadow;
pub mod space;
pub mod state;

pub use action::GameAction;
pub use cards::{CARDS, Card, card_by_id, draw_card};
pub use decision::{
    Decision, DecisionEffect, DecisionOption, DecisionOutcome, bankruptcy_decision,
    financing_offer_decision,
};
pub use policy::{
    PolicyCatalog, PolicyChoice, PolicyEffect, PolicyScenario, get_scenario_for_space,
    policy_catalog,
};
pub use reducer::game_reducer;
pub use score::{ScoreBreakdown, calculate_final_score, score_breakdown};
pub use session::{BoardSession, TurnOutcome, TurnReport};
pub use shadow::{
    ShadowProgramState, ShadowStatus, initial_shadow_programs, roll_shadow_failure,
    shadow_failure_cost,
};
pub use space::{
    BoardPhase, SPACES, Space, SpaceKind, SpecialEffect, approval_requirement, phase_for_space,
    roll_space_attempt, space_by_id,
};
pub use state::{
    BoardHistory, DecisionRecord, Difficulty, FailedProgramRecord, GameState, GameStatus,
    PaymentRecord, PendingInteraction, ScorePenalty, can_afford, create_initial_state,
};
