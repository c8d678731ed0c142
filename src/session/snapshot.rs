//! Published game state.
//!
//! A `Snapshot` is immutable once built and shared as `Arc<Snapshot>`.
//! Readers recompute derived views (the open round, a seat's view) from the
//! latest snapshot instead of patching their own copy from a stream.
//!
//! Only the authoritative side holds a full `Snapshot`. Seats and observers
//! are handed a `PublicSnapshot`, which carries at most the viewer's own hand.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::GameId;
use crate::core::{Bid, GameState, GameStatus, Hand, PlayerId, PlayerView, PublicPlayer};
use crate::error::ChannelError;
use crate::history::{derive_current_round, HistoryEntry, RoundResult};
use crate::rules::Game;

/// Full state of one table at one version. Contains every hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game_id: GameId,
    /// Bumped on every applied transition, never on rejections.
    pub version: u64,
    pub state: GameState,
    pub history: Vector<HistoryEntry>,
    /// Sealed rounds, oldest first.
    pub rounds: Vector<RoundResult>,
}

impl Snapshot {
    #[must_use]
    pub fn capture(game_id: GameId, version: u64, game: &Game) -> Self {
        Self {
            game_id,
            version,
            state: game.state().clone(),
            history: game.history().clone(),
            rounds: game.ledger().completed().clone(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ChannelError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChannelError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// The round in progress, rebuilt from the history log.
    #[must_use]
    pub fn current_round(&self) -> Option<RoundResult> {
        derive_current_round(&self.history, &self.state)
    }

    /// What `player` may see.
    #[must_use]
    pub fn view_for(&self, player: &PlayerId) -> Option<PlayerView> {
        self.state.view_for(self.state.index_of(player)?)
    }

    /// Projection with every hand reduced to a count.
    #[must_use]
    pub fn public(&self) -> PublicSnapshot {
        PublicSnapshot {
            game_id: self.game_id.clone(),
            version: self.version,
            status: self.state.status,
            round_number: self.state.round_number,
            current_player_index: self.state.current_player_index,
            last_round_loser_index: self.state.last_round_loser_index,
            current_player: self.state.current_player().map(|p| p.id.clone()),
            current_bid: self.state.current_bid.clone(),
            players: self.state.public_players(),
            own_dice: None,
            winner_id: self.state.winner_id.clone(),
            history: self.history.clone(),
            rounds: self.rounds.clone(),
        }
    }

    /// Public projection plus `viewer`'s own hand. An unseated viewer gets
    /// the plain observer projection.
    #[must_use]
    pub fn public_for(&self, viewer: &PlayerId) -> PublicSnapshot {
        let mut public = self.public();
        public.own_dice = self.state.player(viewer).map(|p| p.dice.clone());
        public
    }
}

/// Snapshot safe to show any observer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSnapshot {
    pub game_id: GameId,
    pub version: u64,
    pub status: GameStatus,
    pub round_number: u32,
    pub current_player_index: usize,
    pub last_round_loser_index: usize,
    pub current_player: Option<PlayerId>,
    pub current_bid: Option<Bid>,
    pub players: Vec<PublicPlayer>,
    /// The viewer's hand. Always `None` for observers.
    pub own_dice: Option<Hand>,
    pub winner_id: Option<PlayerId>,
    pub history: Vector<HistoryEntry>,
    pub rounds: Vector<RoundResult>,
}
