use time::OffsetDateTime;

use crate::domain::board::{initial_pieces, Piece, ROWS};
use crate::domain::dice::ScriptedDice;
use crate::domain::rules::{movable_pieces, track_cell};
use crate::domain::turn::{forfeit, notify, pass, roll, NotifyOutcome};
use crate::domain::{BoardSize, Color, GameSession, Step, TurnPhase};
use crate::errors::domain::DomainError;

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Size-5 game, alice (Red) on turn with no dice.
fn fresh() -> GameSession {
    GameSession::new(
        "g".into(),
        BoardSize::new(5).unwrap(),
        "alice".into(),
        "bob".into(),
    )
}

fn empty_board(s: &mut GameSession) {
    s.pieces = vec![None; ROWS * s.width()];
}

#[test]
fn roll_on_fresh_turn_reports_movable_home_row_pieces() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[2]);

    let out = roll(&mut s, "alice", &dice, now()).unwrap();

    assert_eq!(out.throw.value, 2);
    assert_eq!(out.movable, vec![3, 4]);
    assert!(!out.must_pass());
    assert_eq!(s.phase(), TurnPhase::AwaitingAction);
    assert_eq!(s.turn, "alice");
    let d = s.dice.unwrap();
    assert!(!d.used);
    assert_eq!(d.value, 2);
}

#[test]
fn roll_with_every_piece_stuck_signals_must_pass() {
    let mut s = fresh();
    empty_board(&mut s);
    // Red's only piece sits on the last cell of its track.
    let last = track_cell(ROWS * 5 - 1, 5, Color::Red);
    s.pieces[last] = Some(Piece::new(Color::Red));
    s.pieces[19] = Some(Piece::new(Color::Blue));
    let dice = ScriptedDice::values(&[3]);

    let out = roll(&mut s, "alice", &dice, now()).unwrap();

    assert!(out.movable.is_empty());
    assert!(out.must_pass());
    assert_eq!(s.turn, "alice", "roll never hands the turn over");
}

#[test]
fn roll_out_of_turn_is_rejected_without_change() {
    let mut s = fresh();
    let before = s.clone();
    let dice = ScriptedDice::values(&[1]);

    assert_eq!(roll(&mut s, "bob", &dice, now()), Err(DomainError::NotYourTurn));
    assert_eq!(s, before);
}

#[test]
fn roll_by_stranger_is_not_a_participant() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[1]);
    assert_eq!(
        roll(&mut s, "carol", &dice, now()),
        Err(DomainError::NotAParticipant)
    );
}

#[test]
fn roll_on_finished_game_is_rejected_before_turn_check() {
    let mut s = fresh();
    s.winner = Some(Color::Blue);
    let dice = ScriptedDice::values(&[1]);
    assert_eq!(
        roll(&mut s, "bob", &dice, now()),
        Err(DomainError::GameAlreadyFinished)
    );
}

#[test]
fn second_roll_with_unused_legal_dice_must_use_first() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[1, 2]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    let before = s.clone();

    assert_eq!(
        roll(&mut s, "alice", &dice, now()),
        Err(DomainError::DiceMustBeUsedFirst)
    );
    assert_eq!(s, before);
}

#[test]
fn reroll_allowed_when_stuck_and_throw_grants_replay() {
    let mut s = fresh();
    empty_board(&mut s);
    let last = track_cell(ROWS * 5 - 1, 5, Color::Red);
    s.pieces[last] = Some(Piece::new(Color::Red));
    s.pieces[19] = Some(Piece::new(Color::Blue));
    // 1 grants a replay, 2 does not.
    let dice = ScriptedDice::values(&[1, 2, 3]);

    let first = roll(&mut s, "alice", &dice, now()).unwrap();
    assert!(first.throw.keep_playing && first.must_pass());

    let second = roll(&mut s, "alice", &dice, now()).unwrap();
    assert_eq!(second.throw.value, 2);
    assert!(!second.throw.keep_playing);

    assert_eq!(roll(&mut s, "alice", &dice, now()), Err(DomainError::TurnOver));
}

#[test]
fn select_then_move_consumes_dice_and_passes_turn() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[2]);
    roll(&mut s, "alice", &dice, now()).unwrap();

    let selected = notify(&mut s, "alice", 4, now()).unwrap();
    assert_eq!(
        selected,
        NotifyOutcome::Selected {
            selected: 4,
            valid_moves: vec![8]
        }
    );
    assert_eq!(s.step, Step::To);

    let moved = notify(&mut s, "alice", 8, now()).unwrap();
    let NotifyOutcome::Moved(m) = moved else {
        panic!("expected a move, got {moved:?}");
    };
    assert_eq!((m.from, m.to), (4, 8));
    assert!(m.turn_passed);
    assert_eq!(m.captured, None);
    assert_eq!(s.turn, "bob");
    assert!(s.dice.is_none());
    assert_eq!(s.pieces[8], Some(Piece::new(Color::Red)));
    assert!(s.pieces[4].is_none());
    assert_eq!(s.step, Step::From);
}

#[test]
fn move_with_replay_keeps_turn_and_allows_reroll() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[1, 3]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    notify(&mut s, "alice", 4, now()).unwrap();
    notify(&mut s, "alice", 9, now()).unwrap();

    assert_eq!(s.turn, "alice");
    let d = s.dice.unwrap();
    assert!(d.used && d.keep_playing);
    assert_eq!(s.phase(), TurnPhase::AwaitingRoll);
    assert_eq!(notify(&mut s, "alice", 9, now()), Err(DomainError::DiceAlreadyUsed));
    assert_eq!(pass(&mut s, "alice", now()), Err(DomainError::MustRollAgain));

    let again = roll(&mut s, "alice", &dice, now()).unwrap();
    assert_eq!(again.throw.value, 3);
}

#[test]
fn clicking_selected_piece_deselects() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[3]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    notify(&mut s, "alice", 2, now()).unwrap();
    assert_eq!(notify(&mut s, "alice", 2, now()), Ok(NotifyOutcome::Deselected));
    assert_eq!(s.step, Step::From);
    assert_eq!(s.selected, None);
}

#[test]
fn clicking_another_movable_piece_reselects() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[3]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    notify(&mut s, "alice", 2, now()).unwrap();
    let out = notify(&mut s, "alice", 3, now()).unwrap();
    assert!(matches!(out, NotifyOutcome::Selected { selected: 3, .. }));
    assert_eq!(s.selected, Some(3));
}

#[test]
fn illegal_selection_and_destination_are_rejected() {
    let mut s = fresh();
    let dice = ScriptedDice::values(&[1]);
    roll(&mut s, "alice", &dice, now()).unwrap();

    // Piece 0 is blocked by its neighbour, 10 is empty, 15 is Blue.
    for cell in [0, 10, 15] {
        assert_eq!(
            notify(&mut s, "alice", cell, now()),
            Err(DomainError::InvalidSelection)
        );
    }
    assert_eq!(notify(&mut s, "alice", 20, now()), Err(DomainError::InvalidCell));

    notify(&mut s, "alice", 4, now()).unwrap();
    let before = s.clone();
    assert_eq!(notify(&mut s, "alice", 12, now()), Err(DomainError::InvalidMove));
    assert_eq!(s, before);
}

#[test]
fn notify_before_rolling_is_rejected() {
    let mut s = fresh();
    assert_eq!(notify(&mut s, "alice", 4, now()), Err(DomainError::DiceNotRolled));
}

#[test]
fn capturing_the_last_piece_wins() {
    let mut s = fresh();
    empty_board(&mut s);
    s.pieces[0] = Some(Piece::new(Color::Red));
    s.pieces[2] = Some(Piece::new(Color::Blue));
    let dice = ScriptedDice::values(&[2]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    notify(&mut s, "alice", 0, now()).unwrap();

    let NotifyOutcome::Moved(m) = notify(&mut s, "alice", 2, now()).unwrap() else {
        panic!("expected a move");
    };
    assert_eq!(m.captured, Some(Piece::new(Color::Blue)));
    assert_eq!(m.winner, Some(Color::Red));
    assert!(!m.turn_passed);
    assert_eq!(s.phase(), TurnPhase::GameOver);
    assert_eq!(
        roll(&mut s, "alice", &dice, now()),
        Err(DomainError::GameAlreadyFinished)
    );
}

#[test]
fn pass_requires_a_throw_and_no_legal_move() {
    let mut s = fresh();
    assert_eq!(pass(&mut s, "alice", now()), Err(DomainError::DiceNotRolled));

    let dice = ScriptedDice::values(&[2]);
    roll(&mut s, "alice", &dice, now()).unwrap();
    assert_eq!(pass(&mut s, "alice", now()), Err(DomainError::DiceMustBeUsedFirst));
    assert_eq!(pass(&mut s, "bob", now()), Err(DomainError::NotYourTurn));
}

#[test]
fn pass_hands_turn_over_when_stuck() {
    let mut s = fresh();
    empty_board(&mut s);
    let last = track_cell(ROWS * 5 - 1, 5, Color::Red);
    s.pieces[last] = Some(Piece::new(Color::Red));
    s.pieces[19] = Some(Piece::new(Color::Blue));
    let dice = ScriptedDice::values(&[3]);
    roll(&mut s, "alice", &dice, now()).unwrap();

    assert_eq!(pass(&mut s, "alice", now()), Ok("bob".to_string()));
    assert_eq!(s.turn, "bob");
    assert_eq!(s.phase(), TurnPhase::AwaitingRoll);
}

#[test]
fn forfeit_gives_the_win_to_the_opponent() {
    let mut s = fresh();
    assert_eq!(forfeit(&mut s, "bob", now()), Ok(Color::Red));
    assert_eq!(s.winner, Some(Color::Red));
    assert_eq!(
        forfeit(&mut s, "alice", now()),
        Err(DomainError::GameAlreadyFinished)
    );
    assert_eq!(forfeit(&mut s, "carol", now()), Err(DomainError::NotAParticipant));
}

#[test]
fn blue_opening_mirrors_red() {
    let pieces = initial_pieces(BoardSize::new(5).unwrap());
    for value in 1..=4u8 {
        let red = movable_pieces(&pieces, Color::Red, value, 5);
        let blue: Vec<usize> = movable_pieces(&pieces, Color::Blue, value, 5)
            .into_iter()
            .map(|idx| 19 - idx)
            .rev()
            .collect();
        assert_eq!(red, blue, "value {value}");
    }
}
