//! History entries.
//!
//! The history is an append-only, time-ordered log. Every bid and every
//! challenge produces exactly one entry; rounds opening and the game ending
//! are logged too. Entries are observational and never edited.

use serde::{Deserialize, Serialize};

use crate::core::{Bid, PlayerId};

/// Challenge outcome as recorded in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub bidder_won: bool,
    pub actual_count: usize,
    pub loser_id: PlayerId,
    pub loser_name: String,
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    RoundStart,
    Bid(Bid),
    Challenge(ChallengeSummary),
    RoundEnd { winner: Option<PlayerId> },
}

impl HistoryKind {
    /// Stable lowercase tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            HistoryKind::RoundStart => "round_start",
            HistoryKind::Bid(_) => "bid",
            HistoryKind::Challenge(_) => "challenge",
            HistoryKind::RoundEnd { .. } => "round_end",
        }
    }
}

/// One logged event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the log, starting at 0.
    pub seq: u64,
    pub timestamp_ms: u64,
    /// Round the event belongs to.
    pub round_number: u32,
    /// Acting player (for `RoundStart`, the player who opens the round).
    pub player_id: PlayerId,
    pub player_name: String,
    pub kind: HistoryKind,
}

impl HistoryEntry {
    /// Unique id within one game's log.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}-{}", self.kind.tag(), self.seq, self.player_id)
    }

    /// The bid carried by a `Bid` entry.
    #[must_use]
    pub fn bid(&self) -> Option<&Bid> {
        match &self.kind {
            HistoryKind::Bid(bid) => Some(bid),
            _ => None,
        }
    }
}
