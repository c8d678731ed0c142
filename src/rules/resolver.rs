//! Challenge resolution.
//!
//! Pure: reveals every hand, counts the claimed face (wilds included) and
//! says whether the bid held. Applying the lost die is the engine's job.

use serde::{Deserialize, Serialize};

use crate::core::{count_dice_value, Bid, Die};

/// Outcome of revealing the dice against a bid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Dice showing the bid's face or a wild one.
    pub actual_count: usize,
    /// The bid held: at least `quantity` matching dice.
    pub bidder_won: bool,
}

impl Resolution {
    /// Seat that loses a die: the challenger if the bid held, else the bidder.
    #[must_use]
    pub fn loser(&self, challenger: usize, bidder: usize) -> usize {
        if self.bidder_won {
            challenger
        } else {
            bidder
        }
    }
}

/// Count every hand against `bid`. Ties go to the bidder.
///
/// ```
/// use liars_dice::core::{Bid, PlayerId};
/// use liars_dice::rules::resolve_challenge;
///
/// let bid = Bid::new(3, 5, PlayerId::new("p1"));
/// let hands: [&[u8]; 2] = [&[1, 5, 2], &[3, 1, 4]];
/// let resolution = resolve_challenge(&bid, hands);
/// assert_eq!(resolution.actual_count, 3);
/// assert!(resolution.bidder_won);
/// ```
pub fn resolve_challenge<'a, I>(bid: &Bid, hands: I) -> Resolution
where
    I: IntoIterator<Item = &'a [Die]>,
{
    let actual_count = hands
        .into_iter()
        .map(|hand| count_dice_value(hand, bid.value))
        .sum::<usize>();

    Resolution {
        actual_count,
        bidder_won: actual_count >= bid.quantity as usize,
    }
}
