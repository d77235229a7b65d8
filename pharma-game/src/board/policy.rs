//! Policy scenarios triggered by landing on specific board spaces.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::board::state::Difficulty;
use crate::error::ContentError;
use crate::tokens::DataTokens;

const DEFAULT_POLICY_SCENARIOS: &str = include_str!("../../assets/policy_scenarios.json");

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyEffect {
    #[serde(default)]
    pub capital: f64,
    #[serde(default)]
    pub gain_tokens: DataTokens,
    #[serde(default)]
    pub lose_tokens: DataTokens,
    #[serde(default)]
    pub wait_turns: u32,
    #[serde(default)]
    pub score_penalty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyChoice {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub effect: PolicyEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyScenario {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub trigger_space: u8,
    /// When present, the scenario only fires at the listed difficulties.
    #[serde(default)]
    pub applicable_difficulties: Option<Vec<Difficulty>>,
    pub choices: Vec<PolicyChoice>,
}

impl PolicyScenario {
    #[must_use]
    pub fn applies_to(&self, difficulty: Difficulty) -> bool {
        self.applicable_difficulties
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&difficulty))
    }

    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&PolicyChoice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyCatalog {
    pub scenarios: Vec<PolicyScenario>,
}

impl PolicyCatalog {
    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the catalog shape or a
    /// scenario offers no choices.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let catalog: Self = serde_json::from_str(json).map_err(|source| ContentError::Parse {
            table: "policy_scenarios",
            source,
        })?;
        if let Some(empty) = catalog.scenarios.iter().find(|s| s.choices.is_empty()) {
            return Err(ContentError::Invalid {
                table: "policy_scenarios",
                id: empty.id.clone(),
                reason: "scenario has no choices".to_string(),
            });
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_POLICY_SCENARIOS).unwrap_or_else(|err| {
            log::error!("embedded policy scenarios unusable: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub fn get(&self, scenario_id: &str) -> Option<&PolicyScenario> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }

    /// First scenario triggered by `space_id` that applies at `difficulty`.
    #[must_use]
    pub fn for_space(&self, space_id: u8, difficulty: Difficulty) -> Option<&PolicyScenario> {
        self.scenarios
            .iter()
            .find(|s| s.trigger_space == space_id && s.applies_to(difficulty))
    }
}

/// Shared catalog parsed from the embedded asset.
pub fn policy_catalog() -> &'static PolicyCatalog {
    static CATALOG: OnceLock<PolicyCatalog> = OnceLock::new();
    CATALOG.get_or_init(PolicyCatalog::load_from_static)
}

/// Look up the policy scenario for a space at the current difficulty.
#[must_use]
pub fn get_scenario_for_space(space_id: u8, difficulty: Difficulty) -> Option<&'static PolicyScenario> {
    policy_catalog().for_space(space_id, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = policy_catalog();
        assert!(!catalog.scenarios.is_empty());
    }

    #[test]
    fn unrestricted_scenarios_match_every_difficulty() {
        for difficulty in Difficulty::ALL {
            let scenario = get_scenario_for_space(8, difficulty).expect("space 8 scenario");
            assert_eq!(scenario.id, "animal-testing-modernization");
        }
    }

    #[test]
    fn allow_list_filters_by_difficulty() {
        assert_eq!(
            get_scenario_for_space(14, Difficulty::Blockbuster).map(|s| s.id.as_str()),
            Some("price-negotiation")
        );
        assert_eq!(
            get_scenario_for_space(14, Difficulty::Orphan).map(|s| s.id.as_str()),
            Some("orphan-exclusivity")
        );
        assert!(get_scenario_for_space(23, Difficulty::Orphan).is_none());
        assert!(get_scenario_for_space(2, Difficulty::Specialty).is_none());
    }

    #[test]
    fn at_most_one_scenario_per_space_and_difficulty() {
        let catalog = policy_catalog();
        for difficulty in Difficulty::ALL {
            for space_id in 1..=24 {
                let hits = catalog
                    .scenarios
                    .iter()
                    .filter(|s| s.trigger_space == space_id && s.applies_to(difficulty))
                    .count();
                assert!(hits <= 1, "space {space_id} has {hits} scenarios");
            }
        }
    }

    #[test]
    fn empty_choice_lists_are_rejected() {
        let json = r#"{"scenarios":[{"id":"x","title":"X","trigger_space":3,"choices":[]}]}"#;
        assert!(matches!(
            PolicyCatalog::from_json(json),
            Err(ContentError::Invalid { .. })
        ));
        assert!(matches!(
            PolicyCatalog::from_json("{"),
            Err(ContentError::Parse { .. })
        ));
    }
}
