//! Delayed automated turns.
//!
//! After a commit leaves an automated seat to act, the store asks the
//! scheduler to play it after the configured delay. Each pending turn
//! remembers the snapshot version it was scheduled against; any newer
//! commit for the same game aborts it, and a turn that wakes against a
//! different version is dropped.

use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::store::SessionStore;
use super::GameId;

/// At most one pending automated turn per game.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    pending: Mutex<FxHashMap<GameId, (u64, JoinHandle<()>)>>,
}

impl TurnScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Play the automated turn for `game` after `delay`, unless the game
    /// moves past `version` first. Replaces any pending turn.
    ///
    /// Needs a tokio runtime; without one nothing is scheduled.
    pub fn schedule(&self, game: GameId, version: u64, delay: Duration, store: Weak<SessionStore>) {
        self.cancel(&game);

        let Ok(runtime) = Handle::try_current() else {
            warn!(%game, "no runtime, automated turn not scheduled");
            return;
        };

        let task_game = game.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(store) = store.upgrade() {
                store.play_scheduled(&task_game, version);
            }
        });

        debug!(%game, version, delay_ms = delay.as_millis() as u64, "automated turn scheduled");
        self.lock().insert(game, (version, task));
    }

    /// Abort the pending turn for `game`. Returns whether one was pending.
    pub fn cancel(&self, game: &GameId) -> bool {
        match self.lock().remove(game) {
            Some((version, task)) => {
                task.abort();
                debug!(%game, version, "automated turn cancelled");
                true
            }
            None => false,
        }
    }

    /// Forget the turn for `game` scheduled at `version` once it has fired.
    pub(crate) fn fired(&self, game: &GameId, version: u64) {
        let mut pending = self.lock();
        if pending.get(game).is_some_and(|(v, _)| *v == version) {
            pending.remove(game);
        }
    }

    #[must_use]
    pub fn is_pending(&self, game: &GameId) -> bool {
        self.lock().contains_key(game)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<GameId, (u64, JoinHandle<()>)>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TurnScheduler {
    fn drop(&mut self) {
        for (_, (_, task)) in self.lock().drain() {
            task.abort();
        }
    }
}
