//! Session store: every live table, each behind its own lock.
//!
//! Transitions for one game are serialized by that game's mutex, so two
//! challenges can never race on the same table. Different games proceed
//! independently. After each applied transition the store bumps the
//! version, forwards new history to the sink, publishes a fresh snapshot
//! and, when an automated seat is up, schedules its turn.
//!
//! Full snapshots, hands included, stay with the store. Everything handed
//! out through `StateChannel` is a `PublicSnapshot`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use rustc_hash::FxHashMap;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::scheduler::TurnScheduler;
use super::sink::EventSink;
use super::snapshot::{PublicSnapshot, Snapshot};
use super::GameId;
use crate::core::{Action, GameConfig, GameRng, PlayerId};
use crate::error::{ChannelError, GameError};
use crate::rules::{Game, GameParts, Transition};

/// Read state, apply a transition, watch for changes.
///
/// Implemented by the in-process store; a remote transport would implement
/// it by shipping actions to wherever the authoritative `Game` lives.
pub trait StateChannel: Send + Sync {
    /// Latest state as `viewer` may see it: the public projection plus the
    /// viewer's own hand. `None` reads as an observer.
    fn snapshot_for(&self, game: &GameId, viewer: Option<&PlayerId>) -> Result<PublicSnapshot, ChannelError>;

    /// Apply one action atomically.
    fn apply(&self, game: &GameId, action: Action) -> Result<Transition, ChannelError>;

    /// Receiver that always holds the latest observer projection.
    fn subscribe(&self, game: &GameId) -> Result<watch::Receiver<Arc<PublicSnapshot>>, ChannelError>;
}

struct Table {
    game: Game,
    version: u64,
    /// History entries already handed to the sink.
    forwarded: usize,
    /// Sealed rounds already handed to the sink.
    sealed: usize,
}

struct Slot {
    table: Mutex<Table>,
    published: watch::Sender<Arc<Snapshot>>,
    observed: watch::Sender<Arc<PublicSnapshot>>,
}

impl Slot {
    fn new(table: Table, snapshot: Arc<Snapshot>) -> Self {
        let (observed, _) = watch::channel(Arc::new(snapshot.public()));
        let (published, _) = watch::channel(snapshot);
        Self {
            table: Mutex::new(table),
            published,
            observed,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: Snapshot) {
        self.observed.send_replace(Arc::new(snapshot.public()));
        self.published.send_replace(Arc::new(snapshot));
    }
}

/// All tables of one process.
pub struct SessionStore {
    this: Weak<SessionStore>,
    games: RwLock<FxHashMap<GameId, Arc<Slot>>>,
    sink: Arc<dyn EventSink>,
    scheduler: TurnScheduler,
    auto_play: bool,
}

impl SessionStore {
    /// Store that plays automated seats on its own after their delay.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Arc<Self> {
        Self::build(sink, true)
    }

    /// Store that leaves automated turns to explicit `Action::AutomatedTurn`.
    #[must_use]
    pub fn manual(sink: Arc<dyn EventSink>) -> Arc<Self> {
        Self::build(sink, false)
    }

    fn build(sink: Arc<dyn EventSink>, auto_play: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            games: RwLock::new(FxHashMap::default()),
            sink,
            scheduler: TurnScheduler::new(),
            auto_play,
        })
    }

    /// Open a table under `id`. Dice come from the config seed mixed with
    /// the id, so equal seeds on different tables still roll differently.
    pub fn create(&self, id: GameId, config: GameConfig) -> Result<Arc<Snapshot>, GameError> {
        let rng = GameRng::new(config.seed).for_context(id.as_str());
        let game = Game::with_rng(config, rng)?;
        self.open(id, game, 0)
    }

    /// Reopen a table from a checkpoint, dice stream included. History
    /// already in the checkpoint is not sent to the sink again.
    pub fn resume(&self, id: GameId, parts: GameParts) -> Result<Arc<Snapshot>, GameError> {
        let game = Game::from_parts(parts)?;
        self.open(id, game, 0)
    }

    fn open(&self, id: GameId, game: Game, version: u64) -> Result<Arc<Snapshot>, GameError> {
        let snapshot = Arc::new(Snapshot::capture(id.clone(), version, &game));
        let pending = self.auto_play && game.automated_turn_pending();
        let delay = game.config().automated_delay;
        let table = Table {
            forwarded: game.history().len(),
            sealed: game.ledger().completed().len(),
            game,
            version,
        };

        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        if games.contains_key(&id) {
            return Err(GameError::GameExists(id));
        }
        games.insert(id.clone(), Arc::new(Slot::new(table, snapshot.clone())));
        drop(games);
        info!(game = %id, "table opened");

        if pending {
            self.scheduler.schedule(id, version, delay, self.this.clone());
        }
        Ok(snapshot)
    }

    /// Everything needed to `resume` the table elsewhere.
    pub fn checkpoint(&self, id: &GameId) -> Result<GameParts, GameError> {
        Ok(self.slot(id)?.lock().game.checkpoint())
    }

    /// Latest full snapshot, every hand included. Never hand this to a
    /// seat or an observer; use `StateChannel::snapshot_for`.
    pub fn snapshot(&self, id: &GameId) -> Result<Arc<Snapshot>, GameError> {
        Ok(self.slot(id)?.published.borrow().clone())
    }

    /// Close a table. Pending automated turns are dropped and subscribers
    /// see their channel close.
    pub fn remove(&self, id: &GameId) -> bool {
        self.scheduler.cancel(id);
        let removed = self
            .games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some();
        if removed {
            info!(game = %id, "table closed");
        }
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an automated turn is waiting to fire for `id`.
    #[must_use]
    pub fn automated_turn_scheduled(&self, id: &GameId) -> bool {
        self.scheduler.is_pending(id)
    }

    fn slot(&self, id: &GameId) -> Result<Arc<Slot>, GameError> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownGame(id.clone()))
    }

    /// Fire an automated turn scheduled against `version`.
    pub(crate) fn play_scheduled(&self, id: &GameId, version: u64) {
        self.scheduler.fired(id, version);
        let Ok(slot) = self.slot(id) else {
            return;
        };
        let mut table = slot.lock();
        if table.version != version {
            warn!(game = %id, scheduled = version, current = table.version, "stale automated turn dropped");
            return;
        }
        if !table.game.automated_turn_pending() {
            return;
        }
        match table.game.apply(Action::AutomatedTurn) {
            Ok(transition) if transition.changed_state() => self.commit(id, &slot, &mut table, &transition),
            Ok(_) => warn!(game = %id, "automated turn rejected"),
            Err(err) => warn!(game = %id, %err, "automated turn failed"),
        }
    }

    fn commit(&self, id: &GameId, slot: &Slot, table: &mut Table, transition: &Transition) {
        table.version += 1;
        self.scheduler.cancel(id);

        if matches!(transition, Transition::Started | Transition::Reset) {
            table.forwarded = 0;
            table.sealed = 0;
        }
        self.forward(id, table);

        slot.publish(Snapshot::capture(id.clone(), table.version, &table.game));
        debug!(game = %id, version = table.version, ?transition, "transition committed");

        if self.auto_play && table.game.automated_turn_pending() {
            let delay = table.game.config().automated_delay;
            self.scheduler.schedule(id.clone(), table.version, delay, self.this.clone());
        }
    }

    fn forward(&self, id: &GameId, table: &mut Table) {
        let history = table.game.history();
        for entry in history.iter().skip(table.forwarded) {
            self.sink.append(id, entry);
        }
        table.forwarded = history.len();

        let rounds = table.game.ledger().completed();
        for round in rounds.iter().skip(table.sealed) {
            self.sink.seal_round(id, round);
        }
        table.sealed = rounds.len();
    }
}

impl StateChannel for SessionStore {
    fn snapshot_for(&self, game: &GameId, viewer: Option<&PlayerId>) -> Result<PublicSnapshot, ChannelError> {
        let slot = self.slot(game)?;
        let snapshot = slot.published.borrow();
        Ok(match viewer {
            Some(viewer) => snapshot.public_for(viewer),
            None => snapshot.public(),
        })
    }

    fn apply(&self, game: &GameId, action: Action) -> Result<Transition, ChannelError> {
        let slot = self.slot(game)?;
        let mut table = slot.lock();
        debug!(game = %game, actor = ?action.actor(), "applying action");
        let transition = table.game.apply(action)?;
        if transition.changed_state() {
            self.commit(game, &slot, &mut table, &transition);
        }
        Ok(transition)
    }

    fn subscribe(&self, game: &GameId) -> Result<watch::Receiver<Arc<PublicSnapshot>>, ChannelError> {
        Ok(self.slot(game)?.observed.subscribe())
    }
}
