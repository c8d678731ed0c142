//! Player identification and seats.
//!
//! ## PlayerId
//!
//! Opaque string identifier. Local games use fixed ids (`"player"`, `"ai"`);
//! networked games use whatever identity the session layer hands out.
//!
//! ## PlayerKind
//!
//! Who sources a seat's actions: a human, or the automated policy with a
//! personality. The lifecycle engine does not care which.

use serde::{Deserialize, Serialize};

use super::dice::Hand;

/// Opaque player identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Temperament of an automated opponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    #[default]
    Default,
    Cautious,
    Aggressive,
    Analytical,
}

/// Who decides a seat's actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Automated(Personality),
}

impl PlayerKind {
    #[must_use]
    pub const fn is_automated(self) -> bool {
        matches!(self, PlayerKind::Automated(_))
    }

    /// Personality of an automated seat.
    #[must_use]
    pub const fn personality(self) -> Option<Personality> {
        match self {
            PlayerKind::Automated(p) => Some(p),
            PlayerKind::Human => None,
        }
    }
}

/// A seat request: who wants to sit down, before dice are dealt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
}

impl Seat {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            kind: PlayerKind::Human,
        }
    }

    pub fn automated(id: impl Into<String>, name: impl Into<String>, personality: Personality) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            kind: PlayerKind::Automated(personality),
        }
    }
}

/// A seated player and their private hand.
///
/// The hand only ever shrinks by one die per lost challenge. An empty hand
/// means the player is out; the entry itself stays in the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub dice: Hand,
    pub kind: PlayerKind,
}

impl Player {
    /// Seat a player with a dealt hand.
    #[must_use]
    pub fn from_seat(seat: Seat, dice: Hand) -> Self {
        Self {
            id: seat.id,
            name: seat.name,
            dice,
            kind: seat.kind,
        }
    }

    /// Number of dice still held.
    #[must_use]
    pub fn dice_count(&self) -> usize {
        self.dice.len()
    }

    /// Whether the player has lost every die.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.dice.is_empty()
    }

    #[must_use]
    pub fn is_automated(&self) -> bool {
        self.kind.is_automated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId::new("ai").to_string(), "ai");
        assert_eq!(PlayerId::from("player").as_str(), "player");
    }

    #[test]
    fn test_kind_personality() {
        assert_eq!(PlayerKind::Human.personality(), None);
        let kind = PlayerKind::Automated(Personality::Cautious);
        assert!(kind.is_automated());
        assert_eq!(kind.personality(), Some(Personality::Cautious));
    }

    #[test]
    fn test_player_from_seat() {
        let player = Player::from_seat(Seat::human("player", "You"), smallvec![2, 3]);
        assert_eq!(player.dice_count(), 2);
        assert!(!player.is_eliminated());
        assert!(!player.is_automated());
    }

    #[test]
    fn test_player_serialization() {
        let player = Player::from_seat(
            Seat::automated("ai", "Computer", Personality::Aggressive),
            smallvec![1, 6, 6],
        );
        let json = serde_json::to_string(&player).unwrap();
        let restored: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, restored);
    }
}
