//! Rules: challenge resolution and the round/game lifecycle.
//!
//! - `resolver`: pure challenge arithmetic over revealed hands
//! - `engine`: the `Game` state machine every action goes through

pub mod engine;
pub mod resolver;

pub use engine::{AutomatedMove, ChallengeReport, Game, GameParts, GameResult, Outcome, Rejection, Transition};
pub use resolver::{resolve_challenge, Resolution};
