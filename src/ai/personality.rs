//! Personality profiles for automated players.
//!
//! A profile scales the doubt threshold and decides whether a raise gets
//! pushed one quantity further than the minimum.

use serde::{Deserialize, Serialize};

use crate::core::{Bid, GameRng, Personality, DEFAULT_DOUBT_THRESHOLD};

/// Chance that an eager profile adds one to its raise.
pub const ESCALATION_CHANCE: f64 = 0.3;

/// Aggressiveness above which a profile may escalate.
pub const ESCALATION_CUTOFF: f64 = 0.6;

/// Tuning knobs for one personality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Doubt threshold this personality plays at when the base is the default.
    pub doubt_threshold: f64,
    /// How eagerly raises go past the minimum (0..=1).
    pub bid_aggressiveness: f64,
}

impl Personality {
    /// Tuning for this personality.
    #[must_use]
    pub const fn profile(self) -> PersonalityProfile {
        match self {
            Personality::Default => PersonalityProfile {
                doubt_threshold: 0.6,
                bid_aggressiveness: 0.5,
            },
            Personality::Cautious => PersonalityProfile {
                doubt_threshold: 0.7,
                bid_aggressiveness: 0.3,
            },
            Personality::Aggressive => PersonalityProfile {
                doubt_threshold: 0.5,
                bid_aggressiveness: 0.8,
            },
            Personality::Analytical => PersonalityProfile {
                doubt_threshold: 0.65,
                bid_aggressiveness: 0.6,
            },
        }
    }

    /// Scale a base threshold. `Default` returns `base` unchanged.
    #[must_use]
    pub fn doubt_threshold(self, base: f64) -> f64 {
        base * self.profile().doubt_threshold / DEFAULT_DOUBT_THRESHOLD
    }

    /// Whether this personality ever raises past the minimum.
    #[must_use]
    pub fn escalates(self) -> bool {
        self.profile().bid_aggressiveness > ESCALATION_CUTOFF
    }

    /// Maybe add one to a raise's quantity, never beyond `ceiling`.
    #[must_use]
    pub fn adjust_bid(self, bid: Bid, ceiling: u32, rng: &mut GameRng) -> Bid {
        if self.escalates() && bid.quantity < ceiling && rng.gen_bool(ESCALATION_CHANCE) {
            Bid {
                quantity: bid.quantity + 1,
                ..bid
            }
        } else {
            bid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_default_keeps_base() {
        assert!((Personality::Default.doubt_threshold(0.6) - 0.6).abs() < 1e-12);
        assert!((Personality::Default.doubt_threshold(0.4) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_cautious_doubts_sooner() {
        let base = 0.6;
        assert!(Personality::Cautious.doubt_threshold(base) > base);
        assert!(Personality::Aggressive.doubt_threshold(base) < base);
        assert!((Personality::Analytical.doubt_threshold(base) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_only_aggressive_escalates() {
        assert!(Personality::Aggressive.escalates());
        assert!(!Personality::Default.escalates());
        assert!(!Personality::Cautious.escalates());
        assert!(!Personality::Analytical.escalates());
    }

    #[test]
    fn test_adjust_bid_respects_ceiling() {
        let mut rng = GameRng::new(5);
        let bid = Bid::new(10, 3, PlayerId::new("ai"));
        for _ in 0..50 {
            let adjusted = Personality::Aggressive.adjust_bid(bid.clone(), 10, &mut rng);
            assert_eq!(adjusted.quantity, 10);
        }
    }

    #[test]
    fn test_adjust_bid_sometimes_escalates() {
        let mut rng = GameRng::new(11);
        let bid = Bid::new(3, 4, PlayerId::new("ai"));
        let raised = (0..200)
            .map(|_| Personality::Aggressive.adjust_bid(bid.clone(), 10, &mut rng))
            .filter(|b| b.quantity == 4)
            .count();
        assert!(raised > 0 && raised < 200);

        for _ in 0..50 {
            let same = Personality::Default.adjust_bid(bid.clone(), 10, &mut rng);
            assert_eq!(same, bid);
        }
    }
}
