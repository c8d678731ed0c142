//! Persistence hooks for history and sealed rounds.
//!
//! The store calls a sink after every committed transition with the history
//! entries and sealed rounds it has not forwarded yet. History is
//! append-only per game; rounds are keyed by `(game, round number)`.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;

use super::GameId;
use crate::history::{HistoryEntry, RoundResult};

/// Destination for history entries and sealed rounds.
pub trait EventSink: Send + Sync {
    /// Append one history entry.
    fn append(&self, game: &GameId, entry: &HistoryEntry);

    /// Store a sealed round under its round number.
    fn seal_round(&self, game: &GameId, round: &RoundResult);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn append(&self, _game: &GameId, _entry: &HistoryEntry) {}

    fn seal_round(&self, _game: &GameId, _round: &RoundResult) {}
}

/// In-process sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    history: Mutex<FxHashMap<GameId, Vec<HistoryEntry>>>,
    rounds: Mutex<BTreeMap<(GameId, u32), RoundResult>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended for `game`, in order.
    #[must_use]
    pub fn history(&self, game: &GameId) -> Vec<HistoryEntry> {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.get(game).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn round(&self, game: &GameId, round_number: u32) -> Option<RoundResult> {
        let rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        rounds.get(&(game.clone(), round_number)).cloned()
    }

    /// Sealed rounds for `game`, by round number.
    #[must_use]
    pub fn rounds(&self, game: &GameId) -> Vec<RoundResult> {
        let rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        rounds
            .iter()
            .filter(|((id, _), _)| id == game)
            .map(|(_, round)| round.clone())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn append(&self, game: &GameId, entry: &HistoryEntry) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.entry(game.clone()).or_default().push(entry.clone());
    }

    fn seal_round(&self, game: &GameId, round: &RoundResult) {
        let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        rounds.insert((game.clone(), round.round_number), round.clone());
    }
}
