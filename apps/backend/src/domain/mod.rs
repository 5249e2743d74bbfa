//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod dice;
pub mod rules;
pub mod session;
pub mod turn;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_turn;
#[cfg(test)]
mod tests_turn;

// Re-exports for ergonomics
pub use board::{BoardSize, Color, Piece, Pieces};
pub use dice::{DiceEngine, DiceThrow, ScriptedDice, StickDice, StickTable};
pub use rules::{has_valid_moves, movable_pieces, valid_moves};
pub use session::{Dice, GameSession, Nick, SessionId, Step, TurnPhase};
