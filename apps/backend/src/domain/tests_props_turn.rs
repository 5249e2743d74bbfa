/// Property-based tests for the turn state machine
use proptest::prelude::*;
use time::OffsetDateTime;

use crate::domain::dice::StickDice;
use crate::domain::rules::movable_pieces;
use crate::domain::turn::{check_roll, notify, pass, roll};
use crate::domain::{test_gens, test_prelude, Color, GameSession};

fn actor() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("alice"), Just("bob"), Just("carol")]
}

fn maybe_finished() -> impl Strategy<Value = GameSession> {
    (test_gens::session(), proptest::option::weighted(0.1, test_gens::color())).prop_map(
        |(mut s, winner)| {
            s.winner = winner;
            s
        },
    )
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: rejected actions leave the session identical.
    #[test]
    fn prop_rejection_mutates_nothing(
        session in maybe_finished(),
        nick in actor(),
        cell in 0usize..64,
        seed in any::<u64>(),
    ) {
        let dice = StickDice::new(Some(seed));
        let now = OffsetDateTime::now_utc();

        let mut s = session.clone();
        if roll(&mut s, nick, &dice, now).is_err() {
            prop_assert_eq!(&s, &session);
        }

        let mut s = session.clone();
        if notify(&mut s, nick, cell, now).is_err() {
            prop_assert_eq!(&s, &session);
        }

        let mut s = session.clone();
        if pass(&mut s, nick, now).is_err() {
            prop_assert_eq!(&s, &session);
        }
    }

    /// Property: a successful roll leaves a fresh unused throw, keeps the
    /// turn, and reports exactly the pieces that can move.
    #[test]
    fn prop_roll_success_shape(
        session in maybe_finished(),
        nick in actor(),
        seed in any::<u64>(),
    ) {
        let dice = StickDice::new(Some(seed));
        let mut s = session.clone();
        if let Ok(outcome) = roll(&mut s, nick, &dice, OffsetDateTime::now_utc()) {
            let current = s.dice.expect("dice present after roll");
            prop_assert!(!current.used);
            prop_assert_eq!(current.value, outcome.throw.value);
            prop_assert!((1..=4).contains(&current.value));
            prop_assert_eq!(&s.turn, &session.turn);
            prop_assert_eq!(&s.pieces, &session.pieces);
            prop_assert_eq!(s.winner, session.winner);

            let color = s.color_of(nick).expect("roller is seated");
            let expected = movable_pieces(&s.pieces, color, current.value, s.width());
            prop_assert_eq!(&outcome.movable, &expected);
            prop_assert_eq!(outcome.must_pass(), expected.is_empty());
        }
    }

    /// Property: rolling twice against a rejecting state yields the same
    /// reason both times.
    #[test]
    fn prop_rejection_is_idempotent(
        session in maybe_finished(),
        nick in actor(),
        seed in any::<u64>(),
    ) {
        let dice = StickDice::new(Some(seed));
        let mut s = session.clone();
        if let Err(first) = roll(&mut s, nick, &dice, OffsetDateTime::now_utc()) {
            let second = roll(&mut s, nick, &dice, OffsetDateTime::now_utc())
                .expect_err("state unchanged, still rejected");
            prop_assert_eq!(first, second);
        }
    }

    /// Property: right after a roll, a second roll is only possible when no
    /// move exists and the throw granted another one.
    #[test]
    fn prop_dice_exclusivity(
        session in test_gens::session(),
        seed in any::<u64>(),
    ) {
        let dice = StickDice::new(Some(seed));
        let mut s = session;
        s.dice = None;
        let nick = s.turn.clone();
        let outcome = roll(&mut s, &nick, &dice, OffsetDateTime::now_utc())
            .expect("fresh turn accepts a roll");
        let again = check_roll(&s, &nick);
        let allowed = outcome.movable.is_empty() && outcome.throw.keep_playing;
        prop_assert_eq!(again.is_ok(), allowed);
        let color: Color = s.color_of(&nick).expect("seated");
        prop_assert_eq!(again.ok(), allowed.then_some(color));
    }
}
