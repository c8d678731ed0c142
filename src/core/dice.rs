//! Dice primitives: faces, hands, rolling and wild-aware counting.
//!
//! A die showing `1` is wild and counts toward any claimed face.

use smallvec::SmallVec;

/// A single die face, 1 through 6.
pub type Die = u8;

/// A player's dice. Inline storage covers the standard five-die hand.
pub type Hand = SmallVec<[Die; 5]>;

/// The wild face.
pub const WILD: Die = 1;

/// Lowest face on a die.
pub const MIN_FACE: Die = 1;

/// Highest face on a die.
pub const MAX_FACE: Die = 6;

/// Check that a value is a real die face.
#[must_use]
pub const fn is_valid_face(value: Die) -> bool {
    value >= MIN_FACE && value <= MAX_FACE
}

/// Count dice matching `target`, including wild ones.
///
/// A die showing 1 is counted once even when `target` is itself 1.
///
/// ```
/// use liars_dice::core::count_dice_value;
///
/// assert_eq!(count_dice_value(&[1, 1, 2, 3, 5], 5), 3);
/// assert_eq!(count_dice_value(&[2, 3, 4], 6), 0);
/// ```
#[must_use]
pub fn count_dice_value(dice: &[Die], target: Die) -> usize {
    dice.iter().filter(|&&d| d == target || d == WILD).count()
}

/// Source of uniformly random die faces.
pub trait DieSource {
    /// Roll one die, returning a face in 1..=6.
    fn roll_die(&mut self) -> Die;
}

/// Roll a fresh hand of `count` dice.
pub fn roll_hand<S: DieSource + ?Sized>(source: &mut S, count: usize) -> Hand {
    (0..count).map(|_| source.roll_die()).collect()
}

/// Re-roll every die in place, keeping the hand size.
pub fn reroll_in_place<S: DieSource + ?Sized>(source: &mut S, hand: &mut Hand) {
    for die in hand.iter_mut() {
        *die = source.roll_die();
    }
}
