//! Sessions: many tables side by side, shared through a state channel.
//!
//! - `store`: `SessionStore`, one serialized `Game` per `GameId`, plus the
//!   `StateChannel` contract (per-viewer reads, apply, subscribe)
//! - `snapshot`: immutable published state, with a hand-free projection
//! - `sink`: append-only history and sealed-round persistence
//! - `scheduler`: delayed, cancellable automated turns

pub mod scheduler;
pub mod sink;
pub mod snapshot;
pub mod store;

use serde::{Deserialize, Serialize};

pub use scheduler::TurnScheduler;
pub use sink::{EventSink, MemorySink, NullSink};
pub use snapshot::{PublicSnapshot, Snapshot};
pub use store::{SessionStore, StateChannel};

/// Identifier of one table (a room code, for networked play).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
