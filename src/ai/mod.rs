//! Automated opponent.
//!
//! - `policy`: probability estimate, doubt test, bid generation, and the
//!   `OpponentPolicy` trait the engine calls on an automated seat's turn
//! - `personality`: per-personality threshold scaling and bid escalation

pub mod personality;
pub mod policy;

pub use personality::PersonalityProfile;
pub use policy::{
    calculate_probability, generate_bid, opening_bid, raise, should_doubt, Decision, HeuristicOpponent,
    OpponentPolicy,
};
