//! Core types: dice, bids, players, state, actions, RNG, configuration.
//!
//! Everything here is plain data plus the two pure rules the rest of the
//! crate leans on: wild-aware counting and bid ordering.

pub mod dice;
pub mod bid;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use dice::{count_dice_value, is_valid_face, roll_hand, Die, DieSource, Hand, MAX_FACE, MIN_FACE, WILD};
pub use bid::{check_range, is_valid_bid, Bid};
pub use player::{Personality, Player, PlayerId, PlayerKind, Seat};
pub use rng::{GameRng, GameRngState};
pub use config::{ConfigError, GameConfig, DEFAULT_AUTOMATED_DELAY, DEFAULT_DICE_PER_PLAYER, DEFAULT_DOUBT_THRESHOLD};
pub use action::Action;
pub use state::{GameState, GameStatus, PlayerView, PublicPlayer};

/// Milliseconds since the Unix epoch, for history timestamps.
#[must_use]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
