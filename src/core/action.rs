//! Actions: every transition a table accepts.
//!
//! Humans and the automated policy both end up here; so does the sync
//! channel, which ships actions to whichever copy of the state is
//! authoritative and applies them there.

use serde::{Deserialize, Serialize};

use super::dice::Die;
use super::player::{PlayerId, Seat};

/// A requested state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Take a seat at a waiting table.
    Join(Seat),
    /// Deal dice and begin round 1.
    StartGame,
    /// Raise the live bid.
    Bid {
        actor: PlayerId,
        quantity: u32,
        value: Die,
    },
    /// Call the live bid a lie.
    Challenge { actor: PlayerId },
    /// Let the automated player in the current seat act.
    AutomatedTurn,
    /// Re-roll and reopen the round without a challenge.
    StartNewRound,
    /// Abandon the table and return to waiting.
    Leave,
    /// Drop a player the session layer has declared gone.
    RemovePlayer(PlayerId),
}

impl Action {
    /// Shorthand for a bid action.
    #[must_use]
    pub fn bid(actor: impl Into<PlayerId>, quantity: u32, value: Die) -> Self {
        Action::Bid {
            actor: actor.into(),
            quantity,
            value,
        }
    }

    /// Shorthand for a challenge action.
    #[must_use]
    pub fn challenge(actor: impl Into<PlayerId>) -> Self {
        Action::Challenge { actor: actor.into() }
    }

    /// The player acting, when the action names one.
    #[must_use]
    pub fn actor(&self) -> Option<&PlayerId> {
        match self {
            Action::Bid { actor, .. } | Action::Challenge { actor } => Some(actor),
            Action::Join(seat) => Some(&seat.id),
            _ => None,
        }
    }
}
