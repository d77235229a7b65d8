//! Chance cards drawn on surprise spaces.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::tokens::DataTokens;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: &'static str,
    pub title: &'static str,
    /// Capital delta in $M.
    pub capital: f64,
    pub gain_tokens: DataTokens,
    pub lose_tokens: DataTokens,
}

const fn card(id: &'static str, title: &'static str, capital: f64) -> Card {
    Card {
        id,
        title,
        capital,
        gain_tokens: DataTokens::ZERO,
        lose_tokens: DataTokens::ZERO,
    }
}

pub static CARDS: [Card; 8] = [
    Card {
        gain_tokens: DataTokens::new(1, 0, 0, 0),
        ..card("serendipity", "Serendipitous biomarker", 0.0)
    },
    card("grant", "Rare-disease research grant", 10.0),
    card("equipment-failure", "Freezer failure destroys samples", -8.0),
    Card {
        lose_tokens: DataTokens::new(0, 1, 0, 0),
        ..card("tox-signal", "Unexpected liver signal", 0.0)
    },
    Card {
        gain_tokens: DataTokens::new(0, 0, 1, 1),
        ..card("cro-deal", "CRO partnership", -5.0)
    },
    Card {
        gain_tokens: DataTokens::new(0, 0, 0, 1),
        ..card("process-patent", "Process patent granted", 0.0)
    },
    Card {
        lose_tokens: DataTokens::new(1, 0, 0, 0),
        ..card("replication", "Key result fails to replicate", 0.0)
    },
    card("milestone", "Partner milestone payment", 15.0),
];

#[must_use]
pub fn card_by_id(card_id: &str) -> Option<&'static Card> {
    CARDS.iter().find(|card| card.id == card_id)
}

/// Draw one card uniformly from the deck.
pub fn draw_card<R: Rng>(rng: &mut R) -> &'static Card {
    CARDS.choose(rng).unwrap_or(&CARDS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn card_ids_are_unique() {
        let ids: HashSet<&str> = CARDS.iter().map(|card| card.id).collect();
        assert_eq!(ids.len(), CARDS.len());
        assert!(card_by_id("grant").is_some());
        assert!(card_by_id("missing").is_none());
    }

    #[test]
    fn draws_cover_the_deck() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let seen: HashSet<&str> = (0..400).map(|_| draw_card(&mut rng).id).collect();
        assert_eq!(seen.len(), CARDS.len());
    }
}
