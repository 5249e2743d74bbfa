// Proptest generators for domain types.
// Layouts are generated slot by slot, so any mix of empty, Red and Blue cells
// is reachable; sessions are built on top of a generated layout.

use proptest::prelude::*;

use crate::domain::board::{BoardSize, Color, Piece, Pieces, ROWS};
use crate::domain::dice::{sticks_for_value, StickTable};
use crate::domain::session::{Dice, GameSession, Step};

pub fn board_size() -> impl Strategy<Value = BoardSize> {
    prop::sample::select(BoardSize::ALLOWED.to_vec())
        .prop_map(|w| BoardSize::new(w).expect("allowed width"))
}

pub fn color() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::Red), Just(Color::Blue)]
}

pub fn dice_value() -> impl Strategy<Value = u8> {
    1u8..=4
}

pub fn slot() -> impl Strategy<Value = Option<Piece>> {
    prop_oneof![
        2 => Just(None),
        1 => Just(Some(Piece::new(Color::Red))),
        1 => Just(Some(Piece::new(Color::Blue))),
    ]
}

pub fn pieces_for(size: BoardSize) -> impl Strategy<Value = Pieces> {
    prop::collection::vec(slot(), ROWS * size.width())
}

/// A size together with a layout of matching length.
pub fn board() -> impl Strategy<Value = (BoardSize, Pieces)> {
    board_size().prop_flat_map(|size| (Just(size), pieces_for(size)))
}

/// Optional dice in play: value plus the `used` flag.
pub fn dice() -> impl Strategy<Value = Option<Dice>> {
    proptest::option::of((dice_value(), any::<bool>(), any::<bool>())).prop_map(|opt| {
        opt.map(|(value, used, keep)| {
            let throw = StickTable::canonical().resolve(sticks_for_value(value));
            Dice {
                stick_values: throw.stick_values,
                value,
                used,
                keep_playing: keep,
            }
        })
    })
}

/// An unfinished session between "alice" (Red) and "bob" (Blue) with an
/// arbitrary layout, dice and turn.
pub fn session() -> impl Strategy<Value = GameSession> {
    (board(), dice(), any::<bool>()).prop_map(|((size, pieces), dice, alice_on_turn)| {
        let mut s = GameSession::new("g".into(), size, "alice".into(), "bob".into());
        s.pieces = pieces;
        s.dice = dice;
        s.turn = if alice_on_turn { "alice" } else { "bob" }.to_string();
        s.step = Step::From;
        s
    })
}
