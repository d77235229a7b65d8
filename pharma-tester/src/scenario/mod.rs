pub mod campaigns;
pub mod catalog;

use crate::logic::{EngineKind, SimulationPlan};
use pharma_game::Difficulty;

/// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> EngineKind {
        self.plan.target.engine()
    }
}

const SCENARIOS: [(&str, &str); 13] = [
    ("smoke", "Smoke Test"),
    ("board-campaign", "Board Campaign - Specialty"),
    ("board-orphan", "Board Campaign - Orphan"),
    ("board-blockbuster", "Board Campaign - Blockbuster"),
    ("path-campaign", "Path Campaign - Orphan Small Molecule"),
    ("path-gene-therapy", "Path Campaign - Blockbuster Gene Therapy"),
    ("deterministic-replay", "Deterministic Replay"),
    ("bankruptcy-rescue", "Bankruptcy Rescue Options"),
    ("gate-enforcement", "Gate Enforcement"),
    ("runway-defeat", "Runway Defeat"),
    ("funding-terms", "Funding Terms"),
    ("event-recycling", "Event Recycling"),
    ("saved-games", "Saved Game Roundtrip"),
];

fn canonical_key(name: &str) -> String {
    let key = name.to_lowercase();
    match key.as_str() {
        "board" => "board-campaign".to_string(),
        "path" => "path-campaign".to_string(),
        "deterministic" => "deterministic-replay".to_string(),
        _ => key,
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = canonical_key(name);
    let (_, title) = SCENARIOS.iter().find(|(listed, _)| *listed == key)?;
    let plan = match key.as_str() {
        "smoke" => campaigns::smoke_plan(),
        "board-campaign" => campaigns::board_plan(Difficulty::Specialty),
        "board-orphan" => campaigns::board_plan(Difficulty::Orphan),
        "board-blockbuster" => campaigns::board_plan(Difficulty::Blockbuster),
        "path-campaign" => campaigns::path_plan("orphan-small-molecule"),
        "path-gene-therapy" => campaigns::path_plan("blockbuster-gene-therapy"),
        "deterministic-replay" => campaigns::replay_plan(),
        other => catalog::catalog_plan(other)?,
    };
    Some(TestScenario::simulation(*title, plan))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}
