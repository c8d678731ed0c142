//! # liars-dice
//!
//! Rules engine and round lifecycle for Liar's Dice, with a heuristic
//! computer opponent and an in-process session layer.
//!
//! ## Design Principles
//!
//! 1. **N-Player First**: Turn order, challenge resolution and win
//!    detection work for any roster size. Local two-seat play is just a
//!    preset `GameConfig`.
//!
//! 2. **One State Machine**: Humans, the automated policy and the sync
//!    channel all submit `Action`s to the same `Game`. Each transition
//!    validates before it writes.
//!
//! 3. **Fair Information**: The automated policy sees a `PlayerView`
//!    (own hand, dice counts, live bid), never other players' dice.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: History and round ledgers use `im-rs`
//!   so snapshots are cheap to publish.
//!
//! - **Deterministic Dice**: All rolls come from a seeded ChaCha8 stream.
//!
//! ## Modules
//!
//! - `core`: Dice, bids, players, state, actions, RNG, configuration
//! - `rules`: Challenge resolution and the `Game` lifecycle
//! - `ai`: Probability heuristic, bid generation, personalities
//! - `history`: History log and per-round ledger
//! - `session`: Multi-game store, snapshots, sinks, turn scheduling
//! - `error`: `GameError` and `ChannelError`

pub mod core;
pub mod rules;
pub mod ai;
pub mod history;
pub mod session;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    count_dice_value, is_valid_bid,
    Die, Hand, Bid,
    PlayerId, Personality, PlayerKind, Player, Seat,
    GameRng, GameRngState, GameConfig,
    Action, GameState, GameStatus, PlayerView, PublicPlayer,
};

pub use crate::rules::{
    resolve_challenge, Resolution,
    Game, GameParts, GameResult, Outcome, Rejection, Transition,
    ChallengeReport, AutomatedMove,
};

pub use crate::ai::{
    calculate_probability, generate_bid, should_doubt,
    Decision, HeuristicOpponent, OpponentPolicy, PersonalityProfile,
};

pub use crate::history::{HistoryEntry, HistoryKind, RoundLedger, RoundResult};

pub use crate::session::{
    GameId, SessionStore, StateChannel, Snapshot, PublicSnapshot,
    EventSink, MemorySink, NullSink, TurnScheduler,
};

pub use crate::error::{ChannelError, GameError};
