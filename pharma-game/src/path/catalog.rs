//! Static path definitions and the fixed six-phase development timeline.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_BURN_RATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPhase {
    #[default]
    Discovery,
    Preclinical,
    Phase1,
    Phase2,
    Phase3,
    Approval,
}

impl PathPhase {
    pub const ALL: [Self; 6] = [
        Self::Discovery,
        Self::Preclinical,
        Self::Phase1,
        Self::Phase2,
        Self::Phase3,
        Self::Approval,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Preclinical => "preclinical",
            Self::Phase1 => "phase1",
            Self::Phase2 => "phase2",
            Self::Phase3 => "phase3",
            Self::Approval => "approval",
        }
    }

    /// Following phase, or `None` once approval is reached.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Discovery => Some(Self::Preclinical),
            Self::Preclinical => Some(Self::Phase1),
            Self::Phase1 => Some(Self::Phase2),
            Self::Phase2 => Some(Self::Phase3),
            Self::Phase3 => Some(Self::Approval),
            Self::Approval => None,
        }
    }

    /// Quarters of work needed to fill the phase progress bar.
    #[must_use]
    pub const fn duration_quarters(self) -> u32 {
        match self {
            Self::Discovery => 8,
            Self::Preclinical => 6,
            Self::Phase1 => 6,
            Self::Phase2 => 8,
            Self::Phase3 => 12,
            Self::Approval => 4,
        }
    }
}

impl fmt::Display for PathPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathPhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseTier {
    Orphan,
    Blockbuster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    SmallMolecule,
    Biologic,
    GeneTherapy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamePath {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: DiseaseTier,
    pub modality: Modality,
    /// Opening treasury in $M.
    pub starting_capital: f64,
    /// $M spent per quarter; `None` falls back to the default burn.
    pub burn_rate: Option<f64>,
    /// Peak annual sales in $B if the drug is approved.
    pub market_potential: f64,
    /// Funding rounds available to this path, in the order they are offered.
    pub funding_rounds: &'static [&'static str],
}

impl GamePath {
    #[must_use]
    pub fn burn_rate(&self) -> f64 {
        self.burn_rate.unwrap_or(DEFAULT_BURN_RATE)
    }
}

const LEAN_ROUNDS: &[&str] = &["seed", "series-a", "series-b", "ipo"];
const FULL_ROUNDS: &[&str] = &["seed", "series-a", "series-b", "series-c", "ipo"];

pub static GAME_PATHS: [GamePath; 6] = [
    GamePath {
        id: "orphan-small-molecule",
        name: "Rare metabolic disorder, oral small molecule",
        tier: DiseaseTier::Orphan,
        modality: Modality::SmallMolecule,
        starting_capital: 80.0,
        burn_rate: None,
        market_potential: 0.8,
        funding_rounds: LEAN_ROUNDS,
    },
    GamePath {
        id: "orphan-biologic",
        name: "Rare autoimmune disease, monoclonal antibody",
        tier: DiseaseTier::Orphan,
        modality: Modality::Biologic,
        starting_capital: 110.0,
        burn_rate: Some(7.0),
        market_potential: 1.2,
        funding_rounds: FULL_ROUNDS,
    },
    GamePath {
        id: "orphan-gene-therapy",
        name: "Inherited blindness, one-time gene therapy",
        tier: DiseaseTier::Orphan,
        modality: Modality::GeneTherapy,
        starting_capital: 140.0,
        burn_rate: Some(9.0),
        market_potential: 2.0,
        funding_rounds: FULL_ROUNDS,
    },
    GamePath {
        id: "blockbuster-small-molecule",
        name: "Type 2 diabetes, once-daily pill",
        tier: DiseaseTier::Blockbuster,
        modality: Modality::SmallMolecule,
        starting_capital: 100.0,
        burn_rate: Some(6.0),
        market_potential: 5.0,
        funding_rounds: FULL_ROUNDS,
    },
    GamePath {
        id: "blockbuster-biologic",
        name: "Psoriasis, injectable biologic",
        tier: DiseaseTier::Blockbuster,
        modality: Modality::Biologic,
        starting_capital: 130.0,
        burn_rate: Some(8.0),
        market_potential: 8.0,
        funding_rounds: FULL_ROUNDS,
    },
    GamePath {
        id: "blockbuster-gene-therapy",
        name: "Familial hypercholesterolemia, in vivo gene editing",
        tier: DiseaseTier::Blockbuster,
        modality: Modality::GeneTherapy,
        starting_capital: 170.0,
        burn_rate: Some(11.0),
        market_potential: 6.0,
        funding_rounds: FULL_ROUNDS,
    },
];

#[must_use]
pub fn path_by_id(path_id: &str) -> Option<&'static GamePath> {
    GAME_PATHS.iter().find(|path| path.id == path_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::funding::funding_round_def;
    use std::collections::HashSet;

    #[test]
    fn phase_order_ends_at_approval() {
        let mut phase = PathPhase::Discovery;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            visited.push(next);
            phase = next;
        }
        assert_eq!(visited, PathPhase::ALL.to_vec());
    }

    #[test]
    fn phases_parse_from_wire_names() {
        for phase in PathPhase::ALL {
            assert_eq!(phase.as_str().parse(), Ok(phase));
        }
        assert_eq!(
            serde_json::to_value(PathPhase::Phase2).unwrap(),
            serde_json::json!("phase2")
        );
    }

    #[test]
    fn paths_cover_every_tier_and_modality() {
        let combos: HashSet<_> = GAME_PATHS.iter().map(|p| (p.tier, p.modality)).collect();
        assert_eq!(combos.len(), 6);
        let ids: HashSet<_> = GAME_PATHS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), GAME_PATHS.len());
    }

    #[test]
    fn orphan_small_molecule_uses_default_burn() {
        let path = path_by_id("orphan-small-molecule").unwrap();
        assert!((path.starting_capital - 80.0).abs() < f64::EPSILON);
        assert!((path.burn_rate() - DEFAULT_BURN_RATE).abs() < f64::EPSILON);
        assert!(path_by_id("cold-fusion").is_none());
    }

    #[test]
    fn declared_rounds_exist() {
        for path in &GAME_PATHS {
            assert_eq!(path.funding_rounds.first(), Some(&"seed"));
            for round in path.funding_rounds {
                assert!(funding_round_def(round).is_some(), "{} -> {round}", path.id);
            }
        }
    }
}
