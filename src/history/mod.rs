//! Game history and round ledger.
//!
//! Both are projections of the state machine's transitions:
//! - `event`: the append-only log (`HistoryEntry`)
//! - `ledger`: per-round summaries (`RoundResult`), sealed on each challenge

pub mod event;
pub mod ledger;

pub use event::{ChallengeSummary, HistoryEntry, HistoryKind};
pub use ledger::{derive_current_round, dice_counts, ChallengeDetail, RoundBid, RoundLedger, RoundResult};
