//! Game configuration.
//!
//! A `GameConfig` fixes the table shape before dice are dealt: how many dice
//! each player starts with, how many seats the table takes, who is pre-seated,
//! and the tuning of the automated opponent.
//!
//! Two presets cover the usual deployments:
//! - `GameConfig::local()`: one human against one automated opponent.
//! - `GameConfig::networked()`: empty table, exactly two players must join.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{Personality, Seat};

/// Default number of dice dealt to each player.
pub const DEFAULT_DICE_PER_PLAYER: usize = 5;

/// Default probability below which the automated opponent doubts a bid.
pub const DEFAULT_DOUBT_THRESHOLD: f64 = 0.6;

/// Default pause before the automated opponent acts.
pub const DEFAULT_AUTOMATED_DELAY: Duration = Duration::from_millis(1500);

/// Largest table supported.
pub const MAX_SEATS: usize = 6;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dice_per_player must be > 0")]
    NoDice,
    #[error("player limits invalid (min={min}, max={max}, supported=2..={supported})")]
    PlayerLimits { min: usize, max: usize, supported: usize },
    #[error("{seated} seats configured but max_players is {max}")]
    TooManySeats { seated: usize, max: usize },
    #[error("doubt threshold must be within 0..=1 (got {0})")]
    Threshold(f64),
}

/// Table configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Dice dealt to every player at game start.
    pub dice_per_player: usize,

    /// Seats required before the game can start.
    pub min_players: usize,

    /// Seats the table can hold.
    pub max_players: usize,

    /// Players seated before anyone joins (local games).
    pub seats: Vec<Seat>,

    /// Base doubt threshold for automated players, before personality scaling.
    pub base_doubt_threshold: f64,

    /// Pause before an automated player acts.
    pub automated_delay: Duration,

    /// Seed for dice rolls.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl GameConfig {
    /// One human (`"player"`) against one automated opponent (`"ai"`).
    #[must_use]
    pub fn local() -> Self {
        Self {
            dice_per_player: DEFAULT_DICE_PER_PLAYER,
            min_players: 2,
            max_players: 2,
            seats: vec![
                Seat::human("player", "You"),
                Seat::automated("ai", "Computer", Personality::Default),
            ],
            base_doubt_threshold: DEFAULT_DOUBT_THRESHOLD,
            automated_delay: DEFAULT_AUTOMATED_DELAY,
            seed: 42,
        }
    }

    /// Empty two-seat table filled by `join`.
    #[must_use]
    pub fn networked() -> Self {
        Self {
            seats: Vec::new(),
            ..Self::local()
        }
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the pre-seated roster and widen the table to fit it.
    #[must_use]
    pub fn with_seats(mut self, seats: Vec<Seat>) -> Self {
        self.max_players = self.max_players.max(seats.len());
        self.seats = seats;
        self
    }

    /// Change the personality of every pre-seated automated player.
    #[must_use]
    pub fn with_personality(mut self, personality: Personality) -> Self {
        for seat in &mut self.seats {
            if seat.kind.is_automated() {
                seat.kind = super::player::PlayerKind::Automated(personality);
            }
        }
        self
    }

    #[must_use]
    pub fn with_dice_per_player(mut self, dice: usize) -> Self {
        self.dice_per_player = dice;
        self
    }

    #[must_use]
    pub fn with_doubt_threshold(mut self, threshold: f64) -> Self {
        self.base_doubt_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_automated_delay(mut self, delay: Duration) -> Self {
        self.automated_delay = delay;
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dice_per_player == 0 {
            return Err(ConfigError::NoDice);
        }
        if self.min_players < 2 || self.min_players > self.max_players || self.max_players > MAX_SEATS {
            return Err(ConfigError::PlayerLimits {
                min: self.min_players,
                max: self.max_players,
                supported: MAX_SEATS,
            });
        }
        if self.seats.len() > self.max_players {
            return Err(ConfigError::TooManySeats {
                seated: self.seats.len(),
                max: self.max_players,
            });
        }
        if !(0.0..=1.0).contains(&self.base_doubt_threshold) {
            return Err(ConfigError::Threshold(self.base_doubt_threshold));
        }
        Ok(())
    }
}
