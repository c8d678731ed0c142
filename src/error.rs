//! Error taxonomy.
//!
//! Two families live here:
//!
//! - `GameError`: structural violations. The call was impossible for the
//!   current state (acting after the game finished, challenging with no bid
//!   on the table, unknown game id). Callers must not retry blindly.
//! - `ChannelError`: the sync/transport side. Kept apart so a transport
//!   hiccup is never mistaken for a rules violation.
//!
//! Routine invalid input (a bid that does not raise, acting out of turn) is
//! not an error at all; see `rules::Rejection`.

use thiserror::Error;

use crate::core::{ConfigError, GameStatus, PlayerId};
use crate::session::GameId;

/// Structural failures of the rules engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("game is not in progress (status: {status})")]
    NotPlaying { status: GameStatus },

    #[error("game already started (status: {status})")]
    NotWaiting { status: GameStatus },

    #[error("there is no bid to challenge")]
    NoOutstandingBid,

    #[error("bid out of range (quantity={quantity}, value={value})")]
    BidOutOfRange { quantity: u32, value: u8 },

    #[error("roster is full (capacity={capacity})")]
    RosterFull { capacity: usize },

    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),

    #[error("not enough players (joined={joined}, required={required})")]
    NotEnoughPlayers { joined: usize, required: usize },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("current player {0} is not automated")]
    NotAutomated(PlayerId),

    #[error("unknown game {0}")]
    UnknownGame(GameId),

    #[error("game {0} already exists")]
    GameExists(GameId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    /// Short message suitable for showing to the player who triggered it.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            GameError::NotPlaying { .. } => "The game is not in progress.",
            GameError::NotWaiting { .. } => "The game has already started.",
            GameError::NoOutstandingBid => "There is no bid to challenge yet.",
            GameError::BidOutOfRange { .. } => "Bids need a quantity of at least 1 and a face from 1 to 6.",
            GameError::RosterFull { .. } => "This table is full.",
            GameError::DuplicatePlayer(_) => "You are already at this table.",
            GameError::NotEnoughPlayers { .. } => "Waiting for more players to join.",
            GameError::UnknownPlayer(_) => "That player is not at this table.",
            GameError::NotAutomated(_) => "It is not the computer's turn.",
            GameError::UnknownGame(_) => "Game not found.",
            GameError::GameExists(_) => "A game with that code already exists.",
            GameError::Config(_) => "The game could not be configured.",
        }
    }
}

/// Failures of the sync channel, never of the game rules.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl ChannelError {
    /// Short message suitable for the acting player.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ChannelError::Encoding(_) => "Connection problem, reconnecting...",
            ChannelError::Game(err) => err.user_message(),
        }
    }
}
