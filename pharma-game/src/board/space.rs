//! The 24-space development board.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::state::Difficulty;
use crate::constants::{
    CLINICAL_LAST_SPACE, DISCOVERY_LAST_SPACE, FIRST_SPACE, LAST_SPACE, PRECLINICAL_LAST_SPACE,
};
use crate::tokens::DataTokens;

/// Development stage a board space belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardPhase {
    #[default]
    Discovery,
    Preclinical,
    Clinical,
    Regulatory,
}

impl BoardPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Preclinical => "preclinical",
            Self::Clinical => "clinical",
            Self::Regulatory => "regulatory",
        }
    }
}

impl fmt::Display for BoardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a space id onto its development phase.
#[must_use]
pub const fn phase_for_space(space_id: u8) -> BoardPhase {
    if space_id <= DISCOVERY_LAST_SPACE {
        BoardPhase::Discovery
    } else if space_id <= PRECLINICAL_LAST_SPACE {
        BoardPhase::Preclinical
    } else if space_id <= CLINICAL_LAST_SPACE {
        BoardPhase::Clinical
    } else {
        BoardPhase::Regulatory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    Research,
    Gate,
    Chance,
    Financing,
    Policy,
    Review,
    Approval,
}

/// Side effect attached to landing on, or failing, a space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SpecialEffect {
    ReturnToSpace { space_id: u8 },
    WaitTurns { turns: u32 },
    DrawCard,
    FinancingOffer { amount: f64, dilution_percent: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Space {
    pub id: u8,
    pub name: &'static str,
    pub kind: SpaceKind,
    /// Base cost in $M before the difficulty multiplier.
    pub cost: f64,
    pub success_probability: f64,
    pub gate_requirement: Option<DataTokens>,
    /// Evidence earned when the attempt succeeds.
    pub reward: DataTokens,
    pub special: Option<SpecialEffect>,
    pub on_failure: Option<SpecialEffect>,
}

impl Space {
    /// Cost of attempting this space at the given difficulty.
    #[must_use]
    pub fn cost_for(&self, difficulty: Difficulty) -> f64 {
        (self.cost * difficulty.cost_multiplier()).round()
    }

    #[must_use]
    pub const fn phase(&self) -> BoardPhase {
        phase_for_space(self.id)
    }

    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.id == LAST_SPACE
    }
}

const fn space(
    id: u8,
    name: &'static str,
    kind: SpaceKind,
    cost: f64,
    success_probability: f64,
) -> Space {
    Space {
        id,
        name,
        kind,
        cost,
        success_probability,
        gate_requirement: None,
        reward: DataTokens::ZERO,
        special: None,
        on_failure: None,
    }
}

const fn research(id: u8, name: &'static str, cost: f64, p: f64, reward: DataTokens) -> Space {
    Space {
        reward,
        ..space(id, name, SpaceKind::Research, cost, p)
    }
}

const fn gate(id: u8, name: &'static str, cost: f64, req: DataTokens, remediate: u8) -> Space {
    Space {
        gate_requirement: Some(req),
        on_failure: Some(SpecialEffect::ReturnToSpace {
            space_id: remediate,
        }),
        ..space(id, name, SpaceKind::Gate, cost, 1.0)
    }
}

const APPROVAL_REQUIREMENT: DataTokens = DataTokens::new(6, 6, 4, 4);

pub static SPACES: [Space; 24] = [
    research(1, "Target Identification", 5.0, 0.9, DataTokens::new(1, 0, 0, 0)),
    research(2, "Hit Screening", 8.0, 0.8, DataTokens::new(1, 0, 0, 0)),
    research(3, "Lead Optimization", 10.0, 0.75, DataTokens::new(0, 0, 1, 0)),
    Space {
        special: Some(SpecialEffect::DrawCard),
        ..space(4, "Lab Surprise", SpaceKind::Chance, 0.0, 1.0)
    },
    research(5, "Candidate Nomination", 12.0, 0.8, DataTokens::new(1, 1, 0, 0)),
    gate(6, "Discovery Review", 5.0, DataTokens::new(2, 0, 1, 0), 3),
    research(7, "GLP Toxicology", 15.0, 0.75, DataTokens::new(0, 2, 0, 0)),
    Space {
        reward: DataTokens::new(1, 0, 0, 0),
        ..space(8, "Animal Models", SpaceKind::Policy, 12.0, 0.7)
    },
    research(9, "CMC Scale-up", 14.0, 0.8, DataTokens::new(0, 0, 0, 2)),
    Space {
        special: Some(SpecialEffect::FinancingOffer {
            amount: 60.0,
            dilution_percent: 20.0,
        }),
        ..space(10, "Series A Pitch", SpaceKind::Financing, 2.0, 1.0)
    },
    gate(11, "IND Filing", 10.0, DataTokens::new(2, 2, 1, 1), 7),
    research(12, "Phase 1 Trial", 25.0, 0.7, DataTokens::new(0, 2, 1, 0)),
    Space {
        reward: DataTokens::new(0, 0, 2, 0),
        on_failure: Some(SpecialEffect::ReturnToSpace { space_id: 12 }),
        ..space(13, "Dose Escalation", SpaceKind::Research, 20.0, 0.65)
    },
    space(14, "Market Access Debate", SpaceKind::Policy, 5.0, 1.0),
    research(15, "Phase 2 Trial", 40.0, 0.55, DataTokens::new(2, 0, 0, 0)),
    Space {
        special: Some(SpecialEffect::DrawCard),
        ..space(16, "Trial Site Surprise", SpaceKind::Chance, 0.0, 1.0)
    },
    Space {
        special: Some(SpecialEffect::FinancingOffer {
            amount: 100.0,
            dilution_percent: 25.0,
        }),
        ..space(17, "Series B Roadshow", SpaceKind::Financing, 3.0, 1.0)
    },
    gate(18, "End-of-Phase-2 Meeting", 15.0, DataTokens::new(4, 4, 2, 2), 15),
    research(19, "Phase 3 Trial", 60.0, 0.6, DataTokens::new(2, 2, 0, 0)),
    space(20, "Regulatory Strategy", SpaceKind::Policy, 5.0, 1.0),
    research(21, "Manufacturing Validation", 20.0, 0.8, DataTokens::new(0, 0, 0, 2)),
    Space {
        special: Some(SpecialEffect::WaitTurns { turns: 2 }),
        ..space(22, "NDA Submission", SpaceKind::Review, 25.0, 0.9)
    },
    Space {
        reward: DataTokens::new(0, 1, 1, 0),
        on_failure: Some(SpecialEffect::ReturnToSpace { space_id: 21 }),
        ..space(23, "Advisory Committee", SpaceKind::Policy, 10.0, 0.75)
    },
    Space {
        gate_requirement: Some(APPROVAL_REQUIREMENT),
        on_failure: Some(SpecialEffect::ReturnToSpace { space_id: 21 }),
        ..space(24, "FDA Approval", SpaceKind::Approval, 10.0, 1.0)
    },
];

/// Look up a space by id.
#[must_use]
pub fn space_by_id(space_id: u8) -> Option<&'static Space> {
    if !(FIRST_SPACE..=LAST_SPACE).contains(&space_id) {
        return None;
    }
    SPACES.get(usize::from(space_id - FIRST_SPACE))
}

/// Minimum token holdings required by the final approval gate.
#[must_use]
pub const fn approval_requirement() -> DataTokens {
    APPROVAL_REQUIREMENT
}

/// Roll a success check for attempting `space`.
pub fn roll_space_attempt<R: Rng>(space: &Space, rng: &mut R) -> bool {
    let p = space.success_probability.clamp(0.0, 1.0);
    rng.r#gen::<f64>() < p
}
