//! Round and game lifecycle.
//!
//! `Game` owns one table: its `GameState`, the history log, the round ledger
//! and the dice RNG. Every mutation goes through the operations below, and
//! each one validates before it writes, so a call either lands completely
//! (state, history and ledger together) or leaves everything untouched.
//!
//! ## Status flow
//!
//! `Waiting` → `start_game` → `Playing` → (a hand empties) → `Finished`.
//! `leave_game` returns to `Waiting` from anywhere.
//!
//! ## Invalid input vs. structural errors
//!
//! Acting out of turn or bidding without raising is routine and comes back
//! as `Outcome::Rejected`, state unchanged. Calls that cannot make sense
//! (acting after the game finished, challenging with no bid on the table)
//! return `GameError`.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::resolver::{resolve_challenge, Resolution};
use crate::ai::{Decision, HeuristicOpponent, OpponentPolicy};
use crate::core::dice::reroll_in_place;
use crate::core::{
    check_range, is_valid_bid, now_millis, roll_hand, Action, Bid, Die, GameConfig, GameRng, GameRngState, GameState,
    GameStatus, Personality, Player, PlayerId, Seat,
};
use crate::error::GameError;
use crate::history::{
    dice_counts, ChallengeDetail, ChallengeSummary, HistoryEntry, HistoryKind, RoundBid, RoundLedger, RoundResult,
};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Finished with nobody left to declare.
    NoWinner,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: &PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if p == player)
    }
}

/// Why a routine action was turned down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    NotYourTurn { actor: PlayerId, expected: PlayerId },
    NotHigher { previous: Bid },
}

impl Rejection {
    /// Short message for the player who tried.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Rejection::NotYourTurn { .. } => "It's not your turn.".to_string(),
            Rejection::NotHigher { previous } => format!("Your bid must beat {previous}."),
        }
    }
}

/// Either the action landed, or it was rejected and nothing changed.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Rejected(r) => Some(r),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Rejected(r) => Outcome::Rejected(r),
        }
    }
}

/// Everything a resolved challenge changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeReport {
    pub challenger: PlayerId,
    pub bidder: PlayerId,
    pub bid: Bid,
    pub resolution: Resolution,
    pub loser: PlayerId,
    /// The loser just lost their last die.
    pub eliminated: bool,
    /// Set when the challenge ended the game.
    pub winner: Option<PlayerId>,
}

/// What an automated seat ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutomatedMove {
    Bid(Bid),
    Challenge(ChallengeReport),
}

/// Result of `Game::apply`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Joined(PlayerId),
    Started,
    BidPlaced(Bid),
    ChallengeResolved(ChallengeReport),
    RoundReseeded { round_number: u32 },
    Reset,
    PlayerRemoved { player: PlayerId, winner: Option<PlayerId> },
    Rejected(Rejection),
}

impl Transition {
    /// Whether the state moved.
    #[must_use]
    pub fn changed_state(&self) -> bool {
        !matches!(self, Transition::Rejected(_))
    }
}

impl From<Outcome<Bid>> for Transition {
    fn from(outcome: Outcome<Bid>) -> Self {
        match outcome {
            Outcome::Applied(bid) => Transition::BidPlaced(bid),
            Outcome::Rejected(r) => Transition::Rejected(r),
        }
    }
}

impl From<Outcome<ChallengeReport>> for Transition {
    fn from(outcome: Outcome<ChallengeReport>) -> Self {
        match outcome {
            Outcome::Applied(report) => Transition::ChallengeResolved(report),
            Outcome::Rejected(r) => Transition::Rejected(r),
        }
    }
}

/// A game taken apart, for persistence or for re-running transitions
/// against an authoritative copy. The dice stream is kept as its position,
/// so a resumed game rolls exactly what the original would have.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameParts {
    pub config: GameConfig,
    pub state: GameState,
    pub lobby: Vec<Seat>,
    pub history: Vector<HistoryEntry>,
    pub ledger: RoundLedger,
    pub rng: GameRngState,
}

impl GameParts {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// One table and everything it owns.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    /// Seats taken before the deal.
    lobby: Vec<Seat>,
    history: Vector<HistoryEntry>,
    ledger: RoundLedger,
    rng: GameRng,
    clock: fn() -> u64,
}

impl Game {
    /// Create a waiting table. Pre-configured seats are already taken.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }

    /// Create a waiting table rolling from `rng`.
    pub fn with_rng(config: GameConfig, rng: GameRng) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            lobby: config.seats.clone(),
            config,
            state: GameState::default(),
            history: Vector::new(),
            ledger: RoundLedger::new(),
            rng,
            clock: now_millis,
        })
    }

    /// Rebuild a game from its parts.
    pub fn from_parts(parts: GameParts) -> Result<Self, GameError> {
        parts.config.validate()?;
        Ok(Self {
            config: parts.config,
            state: parts.state,
            lobby: parts.lobby,
            history: parts.history,
            ledger: parts.ledger,
            rng: GameRng::from_state(&parts.rng),
            clock: now_millis,
        })
    }

    #[must_use]
    pub fn into_parts(self) -> GameParts {
        GameParts {
            config: self.config,
            state: self.state,
            lobby: self.lobby,
            history: self.history,
            ledger: self.ledger,
            rng: self.rng.state(),
        }
    }

    /// Parts of this game, leaving it in place.
    #[must_use]
    pub fn checkpoint(&self) -> GameParts {
        self.clone().into_parts()
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &Vector<HistoryEntry> {
        &self.history
    }

    #[must_use]
    pub fn ledger(&self) -> &RoundLedger {
        &self.ledger
    }

    /// Seats taken while waiting.
    #[must_use]
    pub fn lobby(&self) -> &[Seat] {
        &self.lobby
    }

    /// Outcome of a finished game.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.state.status != GameStatus::Finished {
            return None;
        }
        Some(match &self.state.winner_id {
            Some(winner) => GameResult::Winner(winner.clone()),
            None => GameResult::NoWinner,
        })
    }

    /// Whether the seat to act is automated and may act now.
    #[must_use]
    pub fn automated_turn_pending(&self) -> bool {
        self.state.is_playing() && self.state.current_player().is_some_and(Player::is_automated)
    }

    // === Transitions ===

    /// Dispatch any action.
    pub fn apply(&mut self, action: Action) -> Result<Transition, GameError> {
        match action {
            Action::Join(seat) => {
                let id = seat.id.clone();
                self.join(seat)?;
                Ok(Transition::Joined(id))
            }
            Action::StartGame => self.start_game().map(|()| Transition::Started),
            Action::Bid { actor, quantity, value } => self.make_bid(&actor, quantity, value).map(Transition::from),
            Action::Challenge { actor } => self.challenge(&actor).map(Transition::from),
            Action::AutomatedTurn => Ok(match self.play_automated_turn()? {
                Outcome::Applied(AutomatedMove::Bid(bid)) => Transition::BidPlaced(bid),
                Outcome::Applied(AutomatedMove::Challenge(report)) => Transition::ChallengeResolved(report),
                Outcome::Rejected(r) => Transition::Rejected(r),
            }),
            Action::StartNewRound => self
                .start_new_round()
                .map(|round_number| Transition::RoundReseeded { round_number }),
            Action::Leave => {
                self.leave_game();
                Ok(Transition::Reset)
            }
            Action::RemovePlayer(player) => {
                let winner = self.remove_player(&player)?;
                Ok(Transition::PlayerRemoved { player, winner })
            }
        }
    }

    /// Take a seat at a waiting table.
    pub fn join(&mut self, seat: Seat) -> Result<(), GameError> {
        self.ensure_waiting()?;
        if self.lobby.iter().any(|s| s.id == seat.id) {
            return Err(GameError::DuplicatePlayer(seat.id));
        }
        if self.lobby.len() >= self.config.max_players {
            return Err(GameError::RosterFull {
                capacity: self.config.max_players,
            });
        }
        debug!(player = %seat.id, "seat taken");
        self.lobby.push(seat);
        Ok(())
    }

    /// Deal dice to every seat and open round 1.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.ensure_waiting()?;
        if self.lobby.len() < self.config.min_players {
            return Err(GameError::NotEnoughPlayers {
                joined: self.lobby.len(),
                required: self.config.min_players,
            });
        }

        let dice = self.config.dice_per_player;
        let players = self
            .lobby
            .iter()
            .cloned()
            .map(|seat| Player::from_seat(seat, roll_hand(&mut self.rng, dice)))
            .collect();

        self.state = GameState {
            players,
            status: GameStatus::Playing,
            ..GameState::default()
        };
        self.history.clear();
        self.ledger.clear();
        self.open_round(0);

        info!(players = self.state.player_count(), dice, "game started");
        Ok(())
    }

    /// Place a bid for `actor`.
    pub fn make_bid(&mut self, actor: &PlayerId, quantity: u32, value: Die) -> Result<Outcome<Bid>, GameError> {
        self.ensure_playing()?;
        check_range(quantity, value)?;
        if let Some(rejection) = self.turn_check(actor) {
            return Ok(Outcome::Rejected(rejection));
        }

        let bid = Bid::new(quantity, value, actor.clone());
        if !is_valid_bid(&bid, self.state.current_bid.as_ref()) {
            // Not reachable with a None previous bid.
            let previous = self.state.current_bid.clone().unwrap_or_else(|| bid.clone());
            return Ok(Outcome::Rejected(Rejection::NotHigher { previous }));
        }

        let seat = self.state.current_player_index;
        let player_name = self.state.players[seat].name.clone();
        let now = (self.clock)();

        self.state.current_bid = Some(bid.clone());
        self.state.current_player_index = (seat + 1) % self.state.player_count();
        self.log(actor.clone(), player_name.clone(), HistoryKind::Bid(bid.clone()), now);
        self.ledger.record_bid(RoundBid {
            player_id: actor.clone(),
            player_name,
            bid: bid.clone(),
        });

        debug!(player = %actor, %bid, "bid placed");
        Ok(Outcome::Applied(bid))
    }

    /// Challenge the live bid on behalf of `actor`.
    pub fn challenge(&mut self, actor: &PlayerId) -> Result<Outcome<ChallengeReport>, GameError> {
        self.ensure_playing()?;
        let bid = self.state.current_bid.clone().ok_or(GameError::NoOutstandingBid)?;
        if let Some(rejection) = self.turn_check(actor) {
            return Ok(Outcome::Rejected(rejection));
        }
        let bidder = self
            .state
            .index_of(&bid.player_id)
            .ok_or_else(|| GameError::UnknownPlayer(bid.player_id.clone()))?;
        let challenger = self.state.current_player_index;

        Ok(Outcome::Applied(self.resolve(challenger, bidder, bid)))
    }

    /// Let the automated player in the current seat act using the built-in
    /// heuristic for its personality.
    pub fn play_automated_turn(&mut self) -> Result<Outcome<AutomatedMove>, GameError> {
        let personality = self.current_automated()?;
        let policy = HeuristicOpponent::new(personality, self.config.base_doubt_threshold);
        self.play_automated_turn_with(&policy)
    }

    /// Let the automated player in the current seat act using `policy`.
    ///
    /// The policy only sees the seat's `PlayerView`. A raise the rules
    /// refuse turns into a challenge.
    pub fn play_automated_turn_with(
        &mut self,
        policy: &dyn OpponentPolicy,
    ) -> Result<Outcome<AutomatedMove>, GameError> {
        self.current_automated()?;
        let seat = self.state.current_player_index;
        let actor = self.state.players[seat].id.clone();
        let Some(view) = self.state.view_for(seat) else {
            return Err(GameError::UnknownPlayer(actor));
        };

        match policy.decide(&view, &mut self.rng) {
            Decision::Raise(bid) => match self.make_bid(&actor, bid.quantity, bid.value)? {
                Outcome::Applied(bid) => Ok(Outcome::Applied(AutomatedMove::Bid(bid))),
                Outcome::Rejected(rejection) if self.state.current_bid.is_none() => Ok(Outcome::Rejected(rejection)),
                Outcome::Rejected(_) => {
                    debug!(player = %actor, "raise refused, challenging instead");
                    Ok(self.challenge(&actor)?.map(AutomatedMove::Challenge))
                }
            },
            Decision::Challenge => Ok(self.challenge(&actor)?.map(AutomatedMove::Challenge)),
        }
    }

    /// Re-roll every hand and reopen the round without a challenge.
    ///
    /// The seat that lost the last round opens. Returns the new round number.
    pub fn start_new_round(&mut self) -> Result<u32, GameError> {
        self.ensure_playing()?;
        self.ledger.discard_current();
        let opener = self.state.last_round_loser_index.min(self.state.player_count() - 1);
        self.reseed(opener);
        Ok(self.state.round_number)
    }

    /// Abandon the table: back to waiting with an empty roster.
    pub fn leave_game(&mut self) {
        self.state = GameState::default();
        self.lobby = self.config.seats.clone();
        self.history.clear();
        self.ledger.clear();
        info!("table reset");
    }

    /// Drop a player the session layer has declared gone.
    ///
    /// While waiting this frees their seat. During play the roster shrinks;
    /// with fewer than two players left the game finishes and the remaining
    /// player, if any, wins. Otherwise the round restarts without a bid.
    pub fn remove_player(&mut self, player: &PlayerId) -> Result<Option<PlayerId>, GameError> {
        match self.state.status {
            GameStatus::Waiting => {
                let index = self
                    .lobby
                    .iter()
                    .position(|s| &s.id == player)
                    .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
                self.lobby.remove(index);
                Ok(None)
            }
            GameStatus::Finished => Err(GameError::NotPlaying {
                status: GameStatus::Finished,
            }),
            GameStatus::Playing => {
                let index = self
                    .state
                    .index_of(player)
                    .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
                Ok(self.drop_seat(index))
            }
        }
    }

    // === Internals ===

    fn ensure_waiting(&self) -> Result<(), GameError> {
        match self.state.status {
            GameStatus::Waiting => Ok(()),
            status => Err(GameError::NotWaiting { status }),
        }
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.state.status {
            GameStatus::Playing => Ok(()),
            status => Err(GameError::NotPlaying { status }),
        }
    }

    /// `Some` if `actor` is not the seat to act.
    fn turn_check(&self, actor: &PlayerId) -> Option<Rejection> {
        let expected = &self.state.players[self.state.current_player_index].id;
        (expected != actor).then(|| Rejection::NotYourTurn {
            actor: actor.clone(),
            expected: expected.clone(),
        })
    }

    fn current_automated(&self) -> Result<Personality, GameError> {
        self.ensure_playing()?;
        let player = &self.state.players[self.state.current_player_index];
        player
            .kind
            .personality()
            .ok_or_else(|| GameError::NotAutomated(player.id.clone()))
    }

    fn resolve(&mut self, challenger: usize, bidder: usize, bid: Bid) -> ChallengeReport {
        let resolution = resolve_challenge(&bid, self.state.players.iter().map(|p| p.dice.as_slice()));
        let loser = resolution.loser(challenger, bidder);
        self.state.players[loser].dice.pop();

        let now = (self.clock)();
        let challenger_p = self.state.players[challenger].clone();
        let bidder_p = self.state.players[bidder].clone();
        let loser_p = self.state.players[loser].clone();

        self.log(
            challenger_p.id.clone(),
            challenger_p.name.clone(),
            HistoryKind::Challenge(ChallengeSummary {
                bidder_won: resolution.bidder_won,
                actual_count: resolution.actual_count,
                loser_id: loser_p.id.clone(),
                loser_name: loser_p.name.clone(),
            }),
            now,
        );
        self.ledger.seal(
            ChallengeDetail {
                challenger_id: challenger_p.id.clone(),
                challenger_name: challenger_p.name,
                bidder_id: bidder_p.id.clone(),
                bidder_name: bidder_p.name,
                bid: bid.clone(),
                actual_count: resolution.actual_count,
                bidder_won: resolution.bidder_won,
                loser_id: loser_p.id.clone(),
                loser_name: loser_p.name,
            },
            dice_counts(&self.state),
            now,
        );

        debug!(
            challenger = %challenger_p.id,
            %bid,
            actual = resolution.actual_count,
            loser = %loser_p.id,
            "challenge resolved"
        );

        let eliminated = loser_p.dice.is_empty();
        let winner = if eliminated {
            let winner = self.strongest_survivor();
            self.finish(winner.clone(), now);
            winner
        } else {
            self.state.last_round_loser_index = loser;
            self.reseed(loser);
            None
        };

        ChallengeReport {
            challenger: challenger_p.id,
            bidder: bidder_p.id,
            bid,
            resolution,
            loser: loser_p.id,
            eliminated,
            winner,
        }
    }

    /// Surviving player with the most dice; earliest seat on ties.
    fn strongest_survivor(&self) -> Option<PlayerId> {
        self.state
            .active_players()
            .fold(None::<&Player>, |best, p| match best {
                Some(b) if b.dice_count() >= p.dice_count() => Some(b),
                _ => Some(p),
            })
            .map(|p| p.id.clone())
    }

    /// Re-roll every hand, clear the bid and open the next round at `opener`.
    fn reseed(&mut self, opener: usize) {
        for player in &mut self.state.players {
            reroll_in_place(&mut self.rng, &mut player.dice);
        }
        self.state.current_bid = None;
        self.state.round_number += 1;
        self.state.current_player_index = opener;
        self.open_round(opener);
    }

    fn open_round(&mut self, opener: usize) {
        let now = (self.clock)();
        self.ledger.open(RoundResult::open(
            self.state.round_number,
            now,
            dice_counts(&self.state),
        ));
        let player = &self.state.players[opener];
        let (id, name) = (player.id.clone(), player.name.clone());
        self.log(id, name, HistoryKind::RoundStart, now);
    }

    fn finish(&mut self, winner: Option<PlayerId>, now: u64) {
        self.state.status = GameStatus::Finished;
        self.state.current_bid = None;
        self.state.winner_id = winner.clone();

        let (id, name) = winner
            .as_ref()
            .and_then(|w| self.state.player(w))
            .or_else(|| self.state.current_player())
            .map(|p| (p.id.clone(), p.name.clone()))
            .unwrap_or_else(|| (PlayerId::new(""), String::new()));
        self.log(id, name, HistoryKind::RoundEnd { winner: winner.clone() }, now);

        match &winner {
            Some(w) => info!(winner = %w, rounds = self.state.round_number, "game finished"),
            None => info!(rounds = self.state.round_number, "game finished without a winner"),
        }
    }

    fn drop_seat(&mut self, index: usize) -> Option<PlayerId> {
        let removed = self.state.players.remove(index);
        info!(player = %removed.id, "player removed from table");

        if self.state.players.is_empty() {
            self.leave_game();
            return None;
        }

        let fix = |i: usize, len: usize| {
            let shifted = if i > index { i - 1 } else { i };
            shifted % len
        };
        let len = self.state.player_count();
        self.state.current_player_index = fix(self.state.current_player_index, len);
        self.state.last_round_loser_index = fix(self.state.last_round_loser_index, len);

        let now = (self.clock)();
        if self.state.active_players().count() < 2 {
            let winner = self.state.active_players().next().map(|p| p.id.clone());
            self.ledger.discard_current();
            self.finish(winner.clone(), now);
            winner
        } else {
            self.ledger.discard_current();
            let opener = self.state.current_player_index;
            self.reseed(opener);
            None
        }
    }

    fn log(&mut self, player_id: PlayerId, player_name: String, kind: HistoryKind, timestamp_ms: u64) {
        self.history.push_back(HistoryEntry {
            seq: self.history.len() as u64,
            timestamp_ms,
            round_number: self.state.round_number,
            player_id,
            player_name,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WILD;
    use smallvec::SmallVec;

    fn fixed_clock() -> u64 {
        1_000
    }

    /// Local game with the given hands dealt.
    fn game_with_hands(hands: &[&[Die]]) -> Game {
        let mut game = Game::new(GameConfig::local()).unwrap().with_clock(fixed_clock);
        game.start_game().unwrap();
        let mut parts = game.into_parts();
        for (player, hand) in parts.state.players.iter_mut().zip(hands) {
            player.dice = SmallVec::from_slice(hand);
        }
        Game::from_parts(parts).unwrap().with_clock(fixed_clock)
    }

    fn human() -> PlayerId {
        PlayerId::new("player")
    }

    fn ai() -> PlayerId {
        PlayerId::new("ai")
    }

    #[test]
    fn test_start_game() {
        let mut game = Game::new(GameConfig::local()).unwrap();
        game.start_game().unwrap();

        let state = game.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.player_count(), 2);
        assert!(state.players.iter().all(|p| p.dice_count() == 5));
        assert!(state.players.iter().flat_map(|p| p.dice.iter()).all(|&d| (1..=6).contains(&d)));
        assert_eq!(state.round_number, 1);
        assert_eq!(state.current_player_index, 0);
        assert!(state.current_bid.is_none());

        assert_eq!(game.history().len(), 1);
        assert_eq!(game.history()[0].kind, HistoryKind::RoundStart);
        assert_eq!(game.ledger().current().map(|r| r.round_number), Some(1));
    }

    #[test]
    fn test_start_twice_is_structural_error() {
        let mut game = Game::new(GameConfig::local()).unwrap();
        game.start_game().unwrap();
        assert_eq!(
            game.start_game(),
            Err(GameError::NotWaiting {
                status: GameStatus::Playing
            })
        );
    }

    #[test]
    fn test_bid_advances_turn_and_logs() {
        let mut game = game_with_hands(&[&[2, 3, 4, 5, 6], &[2, 3, 4, 5, 6]]);
        let bid = game.make_bid(&human(), 2, 3).unwrap().applied().unwrap();

        assert_eq!(game.state().current_bid, Some(bid.clone()));
        assert_eq!(game.state().current_player_index, 1);
        assert_eq!(game.history().last().unwrap().kind, HistoryKind::Bid(bid.clone()));
        assert_eq!(game.ledger().current().unwrap().bids[0].bid, bid);
    }

    #[test]
    fn test_out_of_turn_bid_rejected() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        let before = game.state().clone();
        let outcome = game.make_bid(&ai(), 2, 3).unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::NotYourTurn {
                actor: ai(),
                expected: human()
            })
        );
        assert_eq!(game.state(), &before);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_non_raising_bid_rejected() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        game.make_bid(&human(), 2, 3).unwrap().applied().unwrap();
        game.make_bid(&ai(), 2, 4).unwrap().applied().unwrap();

        let before = game.state().clone();
        let outcome = game.make_bid(&human(), 2, 3).unwrap();
        assert!(matches!(outcome, Outcome::Rejected(Rejection::NotHigher { .. })));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_out_of_range_bid_is_error() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        assert_eq!(
            game.make_bid(&human(), 0, 3),
            Err(GameError::BidOutOfRange { quantity: 0, value: 3 })
        );
        assert!(game.make_bid(&human(), 2, 7).is_err());
    }

    #[test]
    fn test_human_may_open_on_ones() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        assert!(game.make_bid(&human(), 1, WILD).unwrap().is_applied());
    }

    #[test]
    fn test_challenge_without_bid() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        assert_eq!(game.challenge(&human()), Err(GameError::NoOutstandingBid));
    }

    #[test]
    fn test_failed_bid_costs_bidder() {
        // Human claims four 6s; only one 6 on the table.
        let mut game = game_with_hands(&[&[6, 2, 3, 2, 2], &[4, 5, 2, 3, 3]]);
        game.make_bid(&human(), 4, 6).unwrap().applied().unwrap();
        let report = game.challenge(&ai()).unwrap().applied().unwrap();

        assert_eq!(report.resolution.actual_count, 1);
        assert!(!report.resolution.bidder_won);
        assert_eq!(report.loser, human());
        assert!(!report.eliminated);

        let state = game.state();
        assert_eq!(state.players[0].dice_count(), 4);
        assert_eq!(state.players[1].dice_count(), 5);
        assert_eq!(state.round_number, 2);
        assert!(state.current_bid.is_none());
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.last_round_loser_index, 0);

        let sealed = &game.ledger().completed()[0];
        assert_eq!(sealed.round_number, 1);
        assert_eq!(sealed.end_time, Some(1_000));
        assert_eq!(sealed.player_dice_counts.get(&human()), Some(&4));
        assert_eq!(game.ledger().current().unwrap().round_number, 2);
    }

    #[test]
    fn test_held_bid_costs_challenger() {
        let mut game = game_with_hands(&[&[1, 5, 2, 2, 2], &[3, 1, 4, 4, 4]]);
        game.make_bid(&human(), 3, 5).unwrap().applied().unwrap();
        let report = game.challenge(&ai()).unwrap().applied().unwrap();

        assert!(report.resolution.bidder_won);
        assert_eq!(report.loser, ai());
        assert_eq!(game.state().players[1].dice_count(), 4);
        assert_eq!(game.state().current_player_index, 1);
    }

    #[test]
    fn test_last_die_ends_game() {
        let mut game = game_with_hands(&[&[3], &[2, 2, 2]]);
        game.make_bid(&human(), 3, 6).unwrap().applied().unwrap();
        let report = game.challenge(&ai()).unwrap().applied().unwrap();

        assert!(report.eliminated);
        assert_eq!(report.winner, Some(ai()));
        assert_eq!(game.state().status, GameStatus::Finished);
        assert_eq!(game.state().winner_id, Some(ai()));
        assert_eq!(game.result(), Some(GameResult::Winner(ai())));
        assert!(matches!(
            game.history().last().unwrap().kind,
            HistoryKind::RoundEnd { winner: Some(_) }
        ));

        assert_eq!(
            game.make_bid(&ai(), 5, 5),
            Err(GameError::NotPlaying {
                status: GameStatus::Finished
            })
        );
    }

    #[test]
    fn test_resume_from_bytes_rolls_the_same() {
        let mut game = game_with_hands(&[&[6, 2, 3, 2, 2], &[4, 5, 2, 3, 3]]);
        game.make_bid(&human(), 4, 6).unwrap().applied().unwrap();
        game.challenge(&ai()).unwrap().applied().unwrap();

        let bytes = game.checkpoint().to_bytes().unwrap();
        let parts = GameParts::from_bytes(&bytes).unwrap();
        assert_eq!(parts, game.checkpoint());
        let mut resumed = Game::from_parts(parts).unwrap().with_clock(fixed_clock);
        assert_eq!(resumed.state(), game.state());

        game.start_new_round().unwrap();
        resumed.start_new_round().unwrap();
        assert_eq!(resumed.state(), game.state());
        assert_eq!(resumed.history(), game.history());
        assert_eq!(resumed.ledger(), game.ledger());
    }

    #[test]
    fn test_start_new_round() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        game.make_bid(&human(), 2, 3).unwrap().applied().unwrap();
        let round = game.start_new_round().unwrap();

        assert_eq!(round, 2);
        assert!(game.state().current_bid.is_none());
        assert_eq!(game.state().current_player_index, 0);
        assert!(game.ledger().completed().is_empty());
        assert!(game.ledger().current().unwrap().bids.is_empty());
    }

    #[test]
    fn test_leave_game_resets() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        game.make_bid(&human(), 2, 3).unwrap().applied().unwrap();
        game.leave_game();

        assert_eq!(game.state(), &GameState::default());
        assert!(game.history().is_empty());
        assert_eq!(game.lobby().len(), 2);
        game.start_game().unwrap();
    }

    #[test]
    fn test_automated_turn_opens() {
        let mut game = game_with_hands(&[&[2; 5], &[5, 5, 3, 1, 1]]);
        game.make_bid(&human(), 1, 2).unwrap().applied().unwrap();
        assert!(game.automated_turn_pending());

        let action = game.play_automated_turn().unwrap().applied().unwrap();
        assert!(matches!(action, AutomatedMove::Bid(ref b) if b.quantity == 1 && b.value == 3));
        assert!(!game.automated_turn_pending());
    }

    #[test]
    fn test_automated_turn_on_human_seat() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        assert_eq!(game.play_automated_turn(), Err(GameError::NotAutomated(human())));
    }

    #[test]
    fn test_automated_doubt() {
        let config = GameConfig::local().with_personality(Personality::Default);
        let mut game = Game::new(config).unwrap();
        game.start_game().unwrap();
        let mut parts = game.into_parts();
        parts.state.players[0].dice = SmallVec::from_slice(&[2, 2, 2, 2, 2]);
        parts.state.players[1].dice = SmallVec::from_slice(&[2, 2, 3, 6, 5]);
        let mut game = Game::from_parts(parts).unwrap();

        game.make_bid(&human(), 10, 6).unwrap().applied().unwrap();
        let action = game.play_automated_turn().unwrap().applied().unwrap();
        let AutomatedMove::Challenge(report) = action else {
            panic!("expected a challenge");
        };
        assert_eq!(report.loser, human());
    }

    #[test]
    fn test_automated_reply_to_largest_bid() {
        // Threshold zero: the bot never doubts, so only the raise ceiling
        // can stop it.
        let config = GameConfig::local().with_doubt_threshold(0.0);
        let mut game = Game::new(config).unwrap();
        game.start_game().unwrap();

        game.make_bid(&human(), u32::MAX, 6).unwrap().applied().unwrap();
        let action = game.play_automated_turn().unwrap().applied().unwrap();
        let AutomatedMove::Challenge(report) = action else {
            panic!("expected a challenge");
        };
        assert_eq!(report.loser, human());
        assert_eq!(game.state().players[0].dice_count(), 4);
    }

    #[test]
    fn test_remove_player_ends_two_player_game() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        let winner = game.remove_player(&human()).unwrap();
        assert_eq!(winner, Some(ai()));
        assert_eq!(game.state().status, GameStatus::Finished);
        assert_eq!(game.state().player_count(), 1);
        assert_eq!(game.state().current_player_index, 0);
    }

    #[test]
    fn test_remove_unknown_player() {
        let mut game = game_with_hands(&[&[2; 5], &[3; 5]]);
        assert_eq!(
            game.remove_player(&PlayerId::new("ghost")),
            Err(GameError::UnknownPlayer(PlayerId::new("ghost")))
        );
    }

    #[test]
    fn test_apply_dispatch() {
        let mut game = Game::new(GameConfig::local()).unwrap();
        assert_eq!(game.apply(Action::StartGame), Ok(Transition::Started));
        let t = game.apply(Action::bid("player", 2, 2)).unwrap();
        assert!(matches!(t, Transition::BidPlaced(_)));
        let t = game.apply(Action::bid("player", 3, 2)).unwrap();
        assert!(!t.changed_state());
        assert_eq!(game.apply(Action::Leave), Ok(Transition::Reset));
    }

    #[test]
    fn test_rejection_messages() {
        let r = Rejection::NotHigher {
            previous: Bid::new(2, 3, human()),
        };
        assert_eq!(r.user_message(), "Your bid must beat 2 x 3.");
    }
}
