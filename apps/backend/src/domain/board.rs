//! Board geometry: colors, pieces, sizes and cell indexing.
//!
//! The board always has four rows. A cell index encodes `row * size + column`.

use serde::{Deserialize, Serialize};

/// Number of rows on every board.
pub const ROWS: usize = 4;

/// Piece color. Red starts on row 0, Blue on row 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }
}

/// A single piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
}

impl Piece {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Full piece layout, `ROWS * size` slots.
pub type Pieces = Vec<Option<Piece>>;

/// Allowed board widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSize(u8);

impl BoardSize {
    pub const ALLOWED: [u8; 6] = [5, 7, 9, 11, 13, 15];

    /// Returns `None` for widths outside [`BoardSize::ALLOWED`].
    pub fn new(width: u8) -> Option<Self> {
        Self::ALLOWED.contains(&width).then_some(Self(width))
    }

    #[inline]
    pub fn width(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn cells(self) -> usize {
        ROWS * self.width()
    }
}

impl Serialize for BoardSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for BoardSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let width = u8::deserialize(deserializer)?;
        BoardSize::new(width)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid board size {width}")))
    }
}

#[inline]
pub fn cell_index(row: usize, column: usize, width: usize) -> usize {
    row * width + column
}

/// `(row, column)` for a cell index.
#[inline]
pub fn coords(index: usize, width: usize) -> (usize, usize) {
    (index / width, index % width)
}

/// Starting layout: Red fills row 0, Blue fills row 3, rows 1 and 2 empty.
pub fn initial_pieces(size: BoardSize) -> Pieces {
    let width = size.width();
    let mut pieces = vec![None; size.cells()];
    for column in 0..width {
        pieces[cell_index(0, column, width)] = Some(Piece::new(Color::Red));
        pieces[cell_index(ROWS - 1, column, width)] = Some(Piece::new(Color::Blue));
    }
    pieces
}

pub fn count_color(pieces: &[Option<Piece>], color: Color) -> usize {
    pieces
        .iter()
        .filter(|slot| matches!(slot, Some(p) if p.color == color))
        .count()
}
