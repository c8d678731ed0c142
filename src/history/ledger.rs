//! Round ledger: per-round summaries derived from play.
//!
//! A `RoundResult` is opened when a round begins, gains one entry per bid,
//! and is sealed exactly once when a challenge ends the round. Sealed rounds
//! move to the completed list and are never touched again.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::event::{HistoryEntry, HistoryKind};
use crate::core::{Bid, GameState, PlayerId};

/// A bid as it appears in a round summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBid {
    pub player_id: PlayerId,
    pub player_name: String,
    pub bid: Bid,
}

/// How the round's challenge went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDetail {
    pub challenger_id: PlayerId,
    pub challenger_name: String,
    pub bidder_id: PlayerId,
    pub bidder_name: String,
    pub bid: Bid,
    pub actual_count: usize,
    pub bidder_won: bool,
    pub loser_id: PlayerId,
    pub loser_name: String,
}

/// Summary of one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_number: u32,
    pub start_time: u64,
    /// Set when the round is sealed.
    pub end_time: Option<u64>,
    /// Bids in the order they were placed.
    pub bids: Vec<RoundBid>,
    pub challenge: Option<ChallengeDetail>,
    /// Dice held per player (at open, then at close once sealed).
    pub player_dice_counts: OrdMap<PlayerId, usize>,
}

impl RoundResult {
    /// Open a round with no bids.
    #[must_use]
    pub fn open(round_number: u32, start_time: u64, player_dice_counts: OrdMap<PlayerId, usize>) -> Self {
        Self {
            round_number,
            start_time,
            end_time: None,
            bids: Vec::new(),
            challenge: None,
            player_dice_counts,
        }
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Dice count per seated player.
#[must_use]
pub fn dice_counts(state: &GameState) -> OrdMap<PlayerId, usize> {
    state
        .players
        .iter()
        .map(|p| (p.id.clone(), p.dice_count()))
        .collect()
}

/// Completed rounds plus the one in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLedger {
    completed: Vector<RoundResult>,
    current: Option<RoundResult>,
}

impl RoundLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a round, dropping any unsealed one.
    pub fn open(&mut self, round: RoundResult) {
        self.current = Some(round);
    }

    /// Append a bid to the open round.
    pub fn record_bid(&mut self, bid: RoundBid) {
        if let Some(round) = self.current.as_mut() {
            round.bids.push(bid);
        }
    }

    /// Close the open round with its challenge and move it to `completed`.
    ///
    /// Returns the sealed round, or `None` if no round was open.
    pub fn seal(
        &mut self,
        challenge: ChallengeDetail,
        player_dice_counts: OrdMap<PlayerId, usize>,
        end_time: u64,
    ) -> Option<&RoundResult> {
        let mut round = self.current.take()?;
        round.end_time = Some(end_time);
        round.challenge = Some(challenge);
        round.player_dice_counts = player_dice_counts;
        self.completed.push_back(round);
        self.completed.last()
    }

    /// Drop the open round without sealing it.
    pub fn discard_current(&mut self) -> Option<RoundResult> {
        self.current.take()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&RoundResult> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn completed(&self) -> &Vector<RoundResult> {
        &self.completed
    }
}

/// Rebuild the in-progress round from a history snapshot.
///
/// Used by readers that only receive snapshots: rather than patching a
/// round summary from a stream of pushes, recompute it from the log each
/// time. Returns `None` unless the game is being played.
#[must_use]
pub fn derive_current_round(history: &Vector<HistoryEntry>, state: &GameState) -> Option<RoundResult> {
    if !state.is_playing() {
        return None;
    }
    let round_number = state.round_number;

    let in_round = || history.iter().filter(move |e| e.round_number == round_number);

    let start_time = in_round()
        .find(|e| matches!(e.kind, HistoryKind::RoundStart))
        .map(|e| e.timestamp_ms)?;

    // A challenge already logged for this round means it is closed.
    if in_round().any(|e| matches!(e.kind, HistoryKind::Challenge(_))) {
        return None;
    }

    let bids = in_round()
        .filter_map(|e| {
            e.bid().map(|bid| RoundBid {
                player_id: e.player_id.clone(),
                player_name: state
                    .player(&e.player_id)
                    .map_or_else(|| e.player_name.clone(), |p| p.name.clone()),
                bid: bid.clone(),
            })
        })
        .collect();

    Some(RoundResult {
        bids,
        ..RoundResult::open(round_number, start_time, dice_counts(state))
    })
}
