//! Scientific evidence counters and gate checks.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four categories of accumulated scientific evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Efficacy,
    Safety,
    Pkpd,
    Cmc,
}

impl TokenKind {
    pub const ALL: [Self; 4] = [Self::Efficacy, Self::Safety, Self::Pkpd, Self::Cmc];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efficacy => "efficacy",
            Self::Safety => "safety",
            Self::Pkpd => "pkpd",
            Self::Cmc => "cmc",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative evidence counters. Also used as a gate requirement record and
/// as a gain/loss delta, since all three share the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DataTokens {
    #[serde(default)]
    pub efficacy: u32,
    #[serde(default)]
    pub safety: u32,
    #[serde(default)]
    pub pkpd: u32,
    #[serde(default)]
    pub cmc: u32,
}

impl DataTokens {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(efficacy: u32, safety: u32, pkpd: u32, cmc: u32) -> Self {
        Self {
            efficacy,
            safety,
            pkpd,
            cmc,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: TokenKind) -> u32 {
        match kind {
            TokenKind::Efficacy => self.efficacy,
            TokenKind::Safety => self.safety,
            TokenKind::Pkpd => self.pkpd,
            TokenKind::Cmc => self.cmc,
        }
    }

    fn slot_mut(&mut self, kind: TokenKind) -> &mut u32 {
        match kind {
            TokenKind::Efficacy => &mut self.efficacy,
            TokenKind::Safety => &mut self.safety,
            TokenKind::Pkpd => &mut self.pkpd,
            TokenKind::Cmc => &mut self.cmc,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.efficacy + self.safety + self.pkpd + self.cmc
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Per-key addition, saturating at `u32::MAX`.
    #[must_use]
    pub fn gained(mut self, delta: &Self) -> Self {
        for kind in TokenKind::ALL {
            let slot = self.slot_mut(kind);
            *slot = slot.saturating_add(delta.get(kind));
        }
        self
    }

    /// Per-key subtraction, clamping every key at zero.
    #[must_use]
    pub fn lost(mut self, delta: &Self) -> Self {
        for kind in TokenKind::ALL {
            let slot = self.slot_mut(kind);
            *slot = slot.saturating_sub(delta.get(kind));
        }
        self
    }

    /// Tokens held in excess of `floor`, summed over all categories.
    #[must_use]
    pub fn surplus_over(&self, floor: &Self) -> u32 {
        TokenKind::ALL
            .iter()
            .map(|kind| self.get(*kind).saturating_sub(floor.get(*kind)))
            .sum()
    }
}

/// Conjunctive gate check: every category must meet or exceed its threshold.
#[must_use]
pub fn meets_gate_requirements(tokens: &DataTokens, requirement: &DataTokens) -> bool {
    TokenKind::ALL
        .iter()
        .all(|kind| tokens.get(*kind) >= requirement.get(*kind))
}

/// How many tokens of each category are still missing to satisfy `requirement`.
#[must_use]
pub fn get_token_deficit(tokens: &DataTokens, requirement: &DataTokens) -> DataTokens {
    requirement.lost(tokens)
}
