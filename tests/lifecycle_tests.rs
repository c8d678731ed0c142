//! Full-game lifecycle tests.
//!
//! These drive complete games through the public `Game` API and check the
//! conservation rules after every transition: each challenge removes exactly
//! one die, turn order stays on the roster, and the game ends with exactly
//! one winner.

use liars_dice::core::{Action, GameConfig, GameStatus, Personality, PlayerId, Seat};
use liars_dice::history::HistoryKind;
use liars_dice::rules::{AutomatedMove, Game, GameResult, Outcome, Rejection, Transition};
use liars_dice::GameError;

fn automated_table(personalities: &[Personality], seed: u64) -> GameConfig {
    let seats = personalities
        .iter()
        .enumerate()
        .map(|(i, &p)| Seat::automated(format!("bot{i}"), format!("Bot {i}"), p))
        .collect();
    GameConfig::local().with_seats(seats).with_seed(seed)
}

/// Play automated turns until the game ends, checking invariants as we go.
fn play_out(game: &mut Game) -> usize {
    let mut challenges = 0;
    for _ in 0..10_000 {
        if game.state().status == GameStatus::Finished {
            return challenges;
        }
        let before = game.state().total_dice();
        let outcome = game.play_automated_turn().unwrap();

        match outcome {
            Outcome::Applied(AutomatedMove::Bid(bid)) => {
                assert_eq!(game.state().total_dice(), before);
                assert_eq!(game.state().current_bid.as_ref(), Some(&bid));
            }
            Outcome::Applied(AutomatedMove::Challenge(report)) => {
                challenges += 1;
                assert_eq!(game.state().total_dice(), before - 1);
                assert!(game.state().current_bid.is_none());
                assert_eq!(report.eliminated, report.winner.is_some());
            }
            Outcome::Rejected(r) => panic!("automated move rejected: {r:?}"),
        }

        let state = game.state();
        if state.status == GameStatus::Playing {
            assert!(state.current_player_index < state.player_count());
            assert!(state.players.iter().all(|p| p.dice_count() > 0));
        }
    }
    panic!("game did not finish");
}

#[test]
fn test_two_bots_play_to_completion() {
    let mut game = Game::new(automated_table(&[Personality::Default, Personality::Default], 7)).unwrap();
    game.start_game().unwrap();
    let challenges = play_out(&mut game);

    let state = game.state();
    assert_eq!(state.status, GameStatus::Finished);
    // Loser ran out: five challenges lost by one side at minimum.
    assert!(challenges >= 5);
    let winner = state.winner_id.clone().unwrap();
    assert!(game.result().unwrap().is_winner(&winner));
    assert_eq!(state.players.iter().filter(|p| p.dice_count() == 0).count(), 1);
    assert_eq!(game.ledger().completed().len(), challenges);
}

#[test]
fn test_every_personality_finishes() {
    for (seed, personalities) in [
        (1, [Personality::Cautious, Personality::Aggressive]),
        (2, [Personality::Analytical, Personality::Default]),
        (3, [Personality::Aggressive, Personality::Aggressive]),
    ] {
        let mut game = Game::new(automated_table(&personalities, seed)).unwrap();
        game.start_game().unwrap();
        play_out(&mut game);
        assert!(matches!(game.result(), Some(GameResult::Winner(_))));
    }
}

#[test]
fn test_four_player_table() {
    let personalities = [
        Personality::Default,
        Personality::Cautious,
        Personality::Aggressive,
        Personality::Analytical,
    ];
    let mut game = Game::new(automated_table(&personalities, 99)).unwrap();
    game.start_game().unwrap();
    assert_eq!(game.state().total_dice(), 20);

    play_out(&mut game);

    // Game stops at the first elimination; the winner holds the most dice.
    let state = game.state();
    let winner = state.player(state.winner_id.as_ref().unwrap()).unwrap();
    assert!(state.players.iter().all(|p| p.dice_count() <= winner.dice_count()));
    let first_with_max = state
        .players
        .iter()
        .find(|p| p.dice_count() == winner.dice_count())
        .unwrap();
    assert_eq!(first_with_max.id, winner.id);
}

#[test]
fn test_same_seed_same_game() {
    let run = || {
        let mut game = Game::new(automated_table(&[Personality::Default, Personality::Aggressive], 5)).unwrap();
        game.start_game().unwrap();
        play_out(&mut game);
        (game.state().clone(), game.history().len())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_history_and_ledger_agree() {
    let mut game = Game::new(automated_table(&[Personality::Default, Personality::Cautious], 3)).unwrap();
    game.start_game().unwrap();
    play_out(&mut game);

    let history = game.history();
    let challenges = history
        .iter()
        .filter(|e| matches!(e.kind, HistoryKind::Challenge(_)))
        .count();
    let bids = history.iter().filter(|e| e.bid().is_some()).count();
    let ledger_bids: usize = game.ledger().completed().iter().map(|r| r.bids.len()).sum();

    assert_eq!(challenges, game.ledger().completed().len());
    assert_eq!(bids, ledger_bids);
    assert!(matches!(history.last().unwrap().kind, HistoryKind::RoundEnd { .. }));

    // Sequence numbers are dense and ordered.
    for (i, entry) in history.iter().enumerate() {
        assert_eq!(entry.seq, i as u64);
    }

    // Round numbers in the ledger count up from 1.
    for (i, round) in game.ledger().completed().iter().enumerate() {
        assert_eq!(round.round_number, i as u32 + 1);
        assert!(round.is_sealed());
        assert!(round.challenge.is_some());
    }
}

#[test]
fn test_local_human_flow() {
    let mut game = Game::new(GameConfig::local()).unwrap();
    let human = PlayerId::new("player");

    assert!(game.make_bid(&human, 1, 2).is_err());
    game.start_game().unwrap();

    let bid = game.make_bid(&human, 1, 2).unwrap().applied().unwrap();
    assert_eq!(bid.to_string(), "1 x 2");
    assert!(game.automated_turn_pending());

    // The human cannot act for the computer.
    let outcome = game.make_bid(&human, 3, 3).unwrap();
    assert!(matches!(outcome.rejection(), Some(Rejection::NotYourTurn { .. })));

    game.play_automated_turn().unwrap().applied().unwrap();
    assert_eq!(game.state().current_player_index, 0);
}

#[test]
fn test_finished_game_only_accepts_leave() {
    let mut game = Game::new(automated_table(&[Personality::Default, Personality::Default], 11)).unwrap();
    game.start_game().unwrap();
    play_out(&mut game);

    let finished = GameError::NotPlaying {
        status: GameStatus::Finished,
    };
    assert_eq!(game.apply(Action::StartNewRound), Err(finished.clone()));
    assert_eq!(game.apply(Action::challenge("bot0")), Err(finished.clone()));
    assert_eq!(game.apply(Action::AutomatedTurn), Err(finished));
    assert!(matches!(
        game.apply(Action::StartGame),
        Err(GameError::NotWaiting { .. })
    ));

    assert_eq!(game.apply(Action::Leave), Ok(Transition::Reset));
    assert_eq!(game.state().status, GameStatus::Waiting);
    assert_eq!(game.apply(Action::StartGame), Ok(Transition::Started));
}

#[test]
fn test_networked_roster() {
    let mut game = Game::new(GameConfig::networked()).unwrap();
    game.join(Seat::human("ann", "Ann")).unwrap();
    assert_eq!(
        game.join(Seat::human("ann", "Ann again")),
        Err(GameError::DuplicatePlayer(PlayerId::new("ann")))
    );
    game.join(Seat::human("bo", "Bo")).unwrap();
    assert_eq!(
        game.join(Seat::human("cy", "Cy")),
        Err(GameError::RosterFull { capacity: 2 })
    );

    game.remove_player(&PlayerId::new("bo")).unwrap();
    assert_eq!(game.lobby().len(), 1);
    assert!(matches!(game.start_game(), Err(GameError::NotEnoughPlayers { .. })));
}

#[test]
fn test_removing_player_mid_game_reseeds() {
    let config = automated_table(
        &[Personality::Default, Personality::Default, Personality::Default],
        21,
    );
    let mut game = Game::new(config).unwrap();
    game.start_game().unwrap();
    game.play_automated_turn().unwrap().applied().unwrap();
    let round = game.state().round_number;

    let winner = game.remove_player(&PlayerId::new("bot1")).unwrap();
    assert!(winner.is_none());

    let state = game.state();
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.player_count(), 2);
    assert!(state.current_bid.is_none());
    assert_eq!(state.round_number, round + 1);
    assert!(state.current_player_index < 2);

    play_out(&mut game);
}
