//! Game state and its projections.
//!
//! ## GameState
//!
//! The single mutable source of truth for one table: roster with private
//! hands, whose turn it is, the live bid, the round counter and status.
//!
//! ## Projections
//!
//! - `PlayerView`: what one seat may know before a challenge reveals the
//!   dice: its own hand, every seat's dice count, the live bid. The automated
//!   policy only ever sees this.
//! - `PublicPlayer`: roster entry with the hand reduced to a count, for
//!   observers that must not see any dice.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::bid::Bid;
use super::dice::Hand;
use super::player::{Player, PlayerId, PlayerKind};

/// Lifecycle status of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Playing => "playing",
            GameStatus::Finished => "finished",
        })
    }
}

/// Complete state of one table.
///
/// Invariants while `status == Playing`:
/// - `current_player_index < players.len()`
/// - no player holds an empty hand
/// - `current_bid`, if any, belongs to a seated player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seats in turn order.
    pub players: Vec<Player>,

    /// Seat whose turn it is.
    pub current_player_index: usize,

    /// The live bid, cleared when a challenge resolves or a round is reseeded.
    pub current_bid: Option<Bid>,

    /// Seat that lost the previous round; it opens the next one.
    pub last_round_loser_index: usize,

    /// Round counter, starts at 1.
    pub round_number: u32,

    pub status: GameStatus,

    pub winner_id: Option<PlayerId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            current_player_index: 0,
            current_bid: None,
            last_round_loser_index: 0,
            round_number: 1,
            status: GameStatus::Waiting,
            winner_id: None,
        }
    }
}

impl GameState {
    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Total dice still on the table.
    #[must_use]
    pub fn total_dice(&self) -> usize {
        self.players.iter().map(Player::dice_count).sum()
    }

    /// Players still holding dice, in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_eliminated())
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Informationally fair view for one seat.
    #[must_use]
    pub fn view_for(&self, seat: usize) -> Option<PlayerView> {
        let me = self.players.get(seat)?;
        Some(PlayerView {
            seat,
            player_id: me.id.clone(),
            own_dice: me.dice.clone(),
            dice_counts: self.players.iter().map(Player::dice_count).collect(),
            current_bid: self.current_bid.clone(),
            round_number: self.round_number,
        })
    }

    /// Roster with hands hidden.
    #[must_use]
    pub fn public_players(&self) -> Vec<PublicPlayer> {
        self.players.iter().map(PublicPlayer::from).collect()
    }
}

/// What one seat can legitimately know before dice are revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerView {
    pub seat: usize,
    pub player_id: PlayerId,
    pub own_dice: Hand,
    /// Dice held by every seat, in seat order (own seat included).
    pub dice_counts: SmallVec<[usize; 6]>,
    pub current_bid: Option<Bid>,
    pub round_number: u32,
}

impl PlayerView {
    /// Dice on the table across all seats.
    #[must_use]
    pub fn total_dice(&self) -> usize {
        self.dice_counts.iter().sum()
    }
}

/// Roster entry without the hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub dice_count: usize,
    pub kind: PlayerKind,
}

impl From<&Player> for PublicPlayer {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            dice_count: player.dice_count(),
            kind: player.kind,
        }
    }
}
