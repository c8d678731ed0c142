//! Bids and the ordering rule between them.
//!
//! A bid claims that at least `quantity` dice on the table show `value`,
//! counting wild ones. Bids are never mutated; a new bid supersedes the old.

use serde::{Deserialize, Serialize};

use super::dice::{is_valid_face, Die};
use super::player::PlayerId;
use crate::error::GameError;

/// A claim made by one player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub quantity: u32,
    pub value: Die,
    pub player_id: PlayerId,
}

impl Bid {
    #[must_use]
    pub fn new(quantity: u32, value: Die, player_id: PlayerId) -> Self {
        Self {
            quantity,
            value,
            player_id,
        }
    }

    /// Whether this bid strictly outranks `previous`.
    #[must_use]
    pub fn outranks(&self, previous: &Bid) -> bool {
        (self.quantity, self.value) > (previous.quantity, previous.value)
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.quantity, self.value)
    }
}

/// Ordering rule only: does `candidate` legally follow `previous`?
///
/// With no previous bid anything goes. Otherwise the quantity must rise, or
/// stay equal with a higher face. Ties are never valid. Range checks are the
/// caller's job (see [`check_range`]).
///
/// ```
/// use liars_dice::core::{is_valid_bid, Bid, PlayerId};
///
/// let p = PlayerId::new("p1");
/// let previous = Bid::new(2, 3, p.clone());
/// assert!(is_valid_bid(&Bid::new(2, 4, p.clone()), Some(&previous)));
/// assert!(!is_valid_bid(&Bid::new(2, 3, p), Some(&previous)));
/// ```
#[must_use]
pub fn is_valid_bid(candidate: &Bid, previous: Option<&Bid>) -> bool {
    match previous {
        None => true,
        Some(previous) => candidate.outranks(previous),
    }
}

/// Reject quantities below one and values outside 1..=6.
pub fn check_range(quantity: u32, value: Die) -> Result<(), GameError> {
    if quantity >= 1 && is_valid_face(value) {
        Ok(())
    } else {
        Err(GameError::BidOutOfRange { quantity, value })
    }
}
