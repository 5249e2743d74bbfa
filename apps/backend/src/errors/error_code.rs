//! Error codes for the Tâb game server API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in logs and in the `x-error-code` response header.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Missing or invalid request fields
    RequestMalformed,
    /// Board width outside the allowed set
    InvalidBoardSize,

    // Authentication
    /// Unknown nick or wrong password
    Unauthenticated,

    // Session lookup
    /// Referenced game does not exist
    SessionNotFound,
    /// Acting nick is not a player of the game
    NotAParticipant,

    // Turn state machine
    /// Game has a recorded winner
    GameAlreadyFinished,
    /// Another player is on turn
    NotYourTurn,
    /// Current throw still has a legal move
    DiceMustBeUsedFirst,
    /// No legal move and no extra throw
    TurnOver,
    /// No throw in play
    DiceNotRolled,
    /// Current throw already consumed by a move
    DiceAlreadyUsed,
    /// Extra throw owed before the turn can pass
    MustRollAgain,
    /// Cell index outside the board
    InvalidCell,
    /// Selected cell does not hold a movable own piece
    InvalidSelection,
    /// Destination is not legal for the selected piece
    InvalidMove,

    // System
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestMalformed => "REQUEST_MALFORMED",
            Self::InvalidBoardSize => "INVALID_BOARD_SIZE",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::GameAlreadyFinished => "GAME_ALREADY_FINISHED",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::DiceMustBeUsedFirst => "DICE_MUST_BE_USED_FIRST",
            Self::TurnOver => "TURN_OVER",
            Self::DiceNotRolled => "DICE_NOT_ROLLED",
            Self::DiceAlreadyUsed => "DICE_ALREADY_USED",
            Self::MustRollAgain => "MUST_ROLL_AGAIN",
            Self::InvalidCell => "INVALID_CELL",
            Self::InvalidSelection => "INVALID_SELECTION",
            Self::InvalidMove => "INVALID_MOVE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
