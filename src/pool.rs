use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::card::{Suit, SuitId};
use crate::error::{DealError, UnknownIdentity};

/// The set of distinct suits a deal can draw from.
#[derive(Debug, Clone)]
pub struct SuitPool {
    suits: Vec<Suit>,
}

impl SuitPool {
    /// Build a pool, dropping any suit whose id was already seen.
    pub fn new(suits: impl IntoIterator<Item = Suit>) -> Self {
        let mut unique: Vec<Suit> = Vec::new();
        for suit in suits {
            if unique.iter().any(|s| s.id == suit.id) {
                debug!(id = %suit.id, "Dropping duplicate suit from pool");
                continue;
            }
            unique.push(suit);
        }
        SuitPool { suits: unique }
    }

    /// The built-in pool: 18 suits, enough for a 6x6 board.
    pub fn standard() -> Self {
        Self::new(
            [
                ("anchor", "AN"),
                ("bell", "BE"),
                ("clover", "CL"),
                ("crown", "CR"),
                ("diamond", "DI"),
                ("eagle", "EA"),
                ("flame", "FL"),
                ("gem", "GE"),
                ("heart", "HE"),
                ("key", "KE"),
                ("leaf", "LE"),
                ("moon", "MO"),
                ("orb", "OR"),
                ("pearl", "PE"),
                ("rose", "RO"),
                ("sun", "SU"),
                ("tower", "TO"),
                ("wave", "WA"),
            ]
            .into_iter()
            .map(|(id, symbol)| Suit::new(id, symbol)),
        )
    }

    pub fn len(&self) -> usize {
        self.suits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suits.is_empty()
    }

    pub fn suits(&self) -> &[Suit] {
        &self.suits
    }

    pub fn lookup(&self, id: &SuitId) -> Result<&Suit, UnknownIdentity> {
        self.suits
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| UnknownIdentity { id: id.clone() })
    }

    /// Produce `total_cards` identities, each chosen suit exactly twice, in
    /// random order.
    pub fn generate_deal<R: Rng + ?Sized>(
        &self,
        total_cards: usize,
        rng: &mut R,
    ) -> Result<Vec<SuitId>, DealError> {
        if total_cards % 2 != 0 {
            return Err(DealError::OddCardCount { cards: total_cards });
        }
        let pairs = total_cards / 2;
        if pairs > self.suits.len() {
            return Err(DealError::InsufficientSuits {
                pairs,
                available: self.suits.len(),
            });
        }

        // Draw without replacement: each pick shrinks the candidate list.
        let mut candidates: Vec<&Suit> = self.suits.iter().collect();
        let mut deal = Vec::with_capacity(total_cards);
        for _ in 0..pairs {
            let picked = candidates.remove(rng.random_range(0..candidates.len()));
            deal.push(picked.id.clone());
            deal.push(picked.id.clone());
        }

        deal.shuffle(rng);
        Ok(deal)
    }

    /// Deal using a generator seeded from OS entropy.
    pub fn deal_random(&self, total_cards: usize) -> Result<Vec<SuitId>, DealError> {
        let mut rng = SmallRng::from_os_rng();
        self.generate_deal(total_cards, &mut rng)
    }

    /// Deal from a specific seed (reproducible games).
    pub fn deal_seeded(&self, total_cards: usize, seed: u64) -> Result<Vec<SuitId>, DealError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.generate_deal(total_cards, &mut rng)
    }
}
