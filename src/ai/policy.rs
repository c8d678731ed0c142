//! Decision policy for automated players.
//!
//! Every function here takes a `PlayerView`, never the full `GameState`:
//! the policy sees its own hand and the dice counts, nothing else.
//!
//! The probability estimate is a deliberate simplification. Each unknown die
//! matches the claimed face or is wild with chance 2/6, so the expected
//! number of matches hidden in other hands is `unknown / 3`.

use crate::core::{count_dice_value, is_valid_bid, Bid, Die, GameRng, Personality, PlayerView, MAX_FACE};

/// Face the policy resets to when a raise wraps past six.
const LOWEST_NATURAL_FACE: Die = 2;

/// Quantity of the policy's opening bid.
const OPENING_QUANTITY: u32 = 2;

/// Estimated chance that `bid` holds, given our own dice.
///
/// `(own matches + unknown dice / 3) / quantity`. Not a true probability;
/// values above 1.0 mean "comfortably likely".
#[must_use]
pub fn calculate_probability(bid: &Bid, own_dice: &[Die], total_dice_in_play: usize) -> f64 {
    if bid.quantity == 0 {
        return 1.0;
    }
    let own_matches = count_dice_value(own_dice, bid.value) as f64;
    let unknown_dice = total_dice_in_play.saturating_sub(own_dice.len()) as f64;
    (own_matches + unknown_dice / 3.0) / f64::from(bid.quantity)
}

/// Doubt `bid` when its estimated probability falls below `threshold`.
#[must_use]
pub fn should_doubt(bid: &Bid, view: &PlayerView, threshold: f64) -> bool {
    calculate_probability(bid, &view.own_dice, view.total_dice()) < threshold
}

/// Opening claim: two of the face we hold most of.
///
/// Ones are never opened on. Ties go to the lower face.
#[must_use]
pub fn opening_bid(view: &PlayerView) -> Bid {
    let mut counts = [0usize; MAX_FACE as usize + 1];
    for &die in &view.own_dice {
        counts[die as usize] += 1;
    }

    let mut best = LOWEST_NATURAL_FACE;
    for face in LOWEST_NATURAL_FACE + 1..=MAX_FACE {
        if counts[face as usize] > counts[best as usize] {
            best = face;
        }
    }

    Bid::new(OPENING_QUANTITY, best, view.player_id.clone())
}

/// Smallest raise over `previous`, or `None` if it would claim more dice
/// than are on the table.
#[must_use]
pub fn raise(previous: &Bid, view: &PlayerView) -> Option<Bid> {
    let (quantity, value) = if previous.value >= MAX_FACE {
        (previous.quantity.checked_add(1)?, LOWEST_NATURAL_FACE)
    } else {
        (previous.quantity, previous.value + 1)
    };

    if u64::from(quantity) > view.total_dice() as u64 {
        return None;
    }

    let candidate = Bid::new(quantity, value, view.player_id.clone());
    is_valid_bid(&candidate, Some(previous)).then_some(candidate)
}

/// Bid to make next: an opening if nothing is on the table, else the
/// minimal raise. `None` means the caller should challenge instead.
#[must_use]
pub fn generate_bid(previous: Option<&Bid>, view: &PlayerView) -> Option<Bid> {
    match previous {
        None => Some(opening_bid(view)),
        Some(previous) => raise(previous, view),
    }
}

/// What an automated player decided to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Raise(Bid),
    Challenge,
}

/// Policy for choosing an automated player's action.
pub trait OpponentPolicy: Send + Sync {
    /// Decide from what the seat can see.
    fn decide(&self, view: &PlayerView, rng: &mut GameRng) -> Decision;
}

/// Threshold-and-raise heuristic, tuned by personality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicOpponent {
    pub personality: Personality,
    pub base_threshold: f64,
}

impl HeuristicOpponent {
    #[must_use]
    pub fn new(personality: Personality, base_threshold: f64) -> Self {
        Self {
            personality,
            base_threshold,
        }
    }

    /// Threshold after personality scaling.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.personality.doubt_threshold(self.base_threshold)
    }
}

impl OpponentPolicy for HeuristicOpponent {
    fn decide(&self, view: &PlayerView, rng: &mut GameRng) -> Decision {
        let ceiling = view.total_dice() as u32;

        let Some(current) = view.current_bid.as_ref() else {
            let bid = opening_bid(view);
            return Decision::Raise(self.personality.adjust_bid(bid, ceiling, rng));
        };

        if should_doubt(current, view, self.threshold()) {
            return Decision::Challenge;
        }

        match raise(current, view) {
            Some(bid) => Decision::Raise(self.personality.adjust_bid(bid, ceiling, rng)),
            None => Decision::Challenge,
        }
    }
}
