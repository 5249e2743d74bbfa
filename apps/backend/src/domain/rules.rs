//! Movement rules.
//!
//! Every color walks a fixed serpentine track that visits all `4 * width`
//! cells exactly once. Red starts at row 0 column 0 and snakes down the board
//! (row 0 left to right, row 1 right to left, row 2 left to right, row 3 right
//! to left). Blue walks the same path rotated by 180 degrees.
//!
//! A piece advances exactly the dice value along its track. Pieces in between
//! are jumped over. Landing on an own piece is blocked, landing on an opposing
//! piece captures it, and running past the end of the track is not a move.

use crate::domain::board::{count_color, Color, Piece, ROWS};

/// Smallest and largest throw value accepted by the validator.
pub const MIN_DICE: u8 = 1;
pub const MAX_DICE: u8 = 4;

/// Position of `index` along `color`'s track, `0..4*width`.
pub fn track_position(index: usize, width: usize, color: Color) -> usize {
    let cells = ROWS * width;
    let red_index = match color {
        Color::Red => index,
        Color::Blue => cells - 1 - index,
    };
    let (row, column) = (red_index / width, red_index % width);
    let offset = if row % 2 == 0 { column } else { width - 1 - column };
    row * width + offset
}

/// Cell index at `position` along `color`'s track.
pub fn track_cell(position: usize, width: usize, color: Color) -> usize {
    let cells = ROWS * width;
    let (row, offset) = (position / width, position % width);
    let column = if row % 2 == 0 { offset } else { width - 1 - offset };
    let red_index = row * width + column;
    match color {
        Color::Red => red_index,
        Color::Blue => cells - 1 - red_index,
    }
}

/// The whole track for `color`, in walking order.
pub fn track(width: usize, color: Color) -> Vec<usize> {
    (0..ROWS * width)
        .map(|pos| track_cell(pos, width, color))
        .collect()
}

/// Legal destinations for the piece at `piece_index`.
///
/// Returns an empty list for any input that does not describe a movable
/// piece: an empty or foreign slot, an out-of-range index or dice value, or a
/// layout whose length does not match `size`.
pub fn valid_moves(
    pieces: &[Option<Piece>],
    piece_index: usize,
    dice_value: u8,
    size: usize,
    color: Color,
) -> Vec<usize> {
    let cells = ROWS * size;
    if size == 0 || pieces.len() != cells || piece_index >= cells {
        return Vec::new();
    }
    if !(MIN_DICE..=MAX_DICE).contains(&dice_value) {
        return Vec::new();
    }
    match pieces[piece_index] {
        Some(p) if p.color == color => {}
        _ => return Vec::new(),
    }

    let target = track_position(piece_index, size, color) + dice_value as usize;
    if target >= cells {
        return Vec::new();
    }
    let destination = track_cell(target, size, color);
    match pieces[destination] {
        Some(p) if p.color == color => Vec::new(),
        _ => vec![destination],
    }
}

/// True iff at least one piece of `color` has a legal destination.
pub fn has_valid_moves(pieces: &[Option<Piece>], color: Color, dice_value: u8, size: usize) -> bool {
    (0..pieces.len()).any(|idx| !valid_moves(pieces, idx, dice_value, size, color).is_empty())
}

/// Indices of `color`'s pieces that can move, ascending.
pub fn movable_pieces(
    pieces: &[Option<Piece>],
    color: Color,
    dice_value: u8,
    size: usize,
) -> Vec<usize> {
    (0..pieces.len())
        .filter(|&idx| !valid_moves(pieces, idx, dice_value, size, color).is_empty())
        .collect()
}

/// Moves the piece at `from` to `to`, returning any captured piece.
///
/// Callers validate the move first; this only rewrites the layout.
pub fn apply_move(pieces: &mut [Option<Piece>], from: usize, to: usize) -> Option<Piece> {
    let moving = pieces[from].take();
    std::mem::replace(&mut pieces[to], moving)
}

/// Winning color once one side has no pieces left.
pub fn winner(pieces: &[Option<Piece>]) -> Option<Color> {
    let red = count_color(pieces, Color::Red);
    let blue = count_color(pieces, Color::Blue);
    match (red, blue) {
        (0, 0) => None,
        (_, 0) => Some(Color::Red),
        (0, _) => Some(Color::Blue),
        _ => None,
    }
}
