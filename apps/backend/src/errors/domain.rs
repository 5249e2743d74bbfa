//! Domain-level error type used across the turn controller and services.
//!
//! This error type is HTTP-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//!
//! Every variant is a rejected action: nothing in the session was written
//! before it was produced.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or ill-typed request fields.
    RequestMalformed(String),
    /// Unknown nick or wrong password.
    Unauthenticated,
    SessionNotFound,
    NotAParticipant,
    GameAlreadyFinished,
    NotYourTurn,
    /// A legal move exists for the current throw and it has not been used.
    DiceMustBeUsedFirst,
    /// No legal move and no extra throw earned.
    TurnOver,
    DiceNotRolled,
    DiceAlreadyUsed,
    /// The current throw grants another throw, so the turn cannot be passed.
    MustRollAgain,
    InvalidCell,
    InvalidSelection,
    InvalidMove,
    InvalidBoardSize(u64),
}

impl DomainError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::RequestMalformed(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::RequestMalformed(_) => ErrorCode::RequestMalformed,
            DomainError::Unauthenticated => ErrorCode::Unauthenticated,
            DomainError::SessionNotFound => ErrorCode::SessionNotFound,
            DomainError::NotAParticipant => ErrorCode::NotAParticipant,
            DomainError::GameAlreadyFinished => ErrorCode::GameAlreadyFinished,
            DomainError::NotYourTurn => ErrorCode::NotYourTurn,
            DomainError::DiceMustBeUsedFirst => ErrorCode::DiceMustBeUsedFirst,
            DomainError::TurnOver => ErrorCode::TurnOver,
            DomainError::DiceNotRolled => ErrorCode::DiceNotRolled,
            DomainError::DiceAlreadyUsed => ErrorCode::DiceAlreadyUsed,
            DomainError::MustRollAgain => ErrorCode::MustRollAgain,
            DomainError::InvalidCell => ErrorCode::InvalidCell,
            DomainError::InvalidSelection => ErrorCode::InvalidSelection,
            DomainError::InvalidMove => ErrorCode::InvalidMove,
            DomainError::InvalidBoardSize(_) => ErrorCode::InvalidBoardSize,
        }
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::RequestMalformed(d) => write!(f, "{d}"),
            DomainError::Unauthenticated => write!(f, "Invalid credentials"),
            DomainError::SessionNotFound => write!(f, "Invalid game reference"),
            DomainError::NotAParticipant => write!(f, "Player not in this game"),
            DomainError::GameAlreadyFinished => write!(f, "Game already finished"),
            DomainError::NotYourTurn => write!(f, "Not your turn to play"),
            DomainError::DiceMustBeUsedFirst => {
                write!(f, "You must use the dice before rolling again")
            }
            DomainError::TurnOver => write!(f, "Not your turn anymore"),
            DomainError::DiceNotRolled => write!(f, "You must roll the dice first"),
            DomainError::DiceAlreadyUsed => write!(f, "Dice already used"),
            DomainError::MustRollAgain => write!(f, "You must roll the dice again"),
            DomainError::InvalidCell => write!(f, "Invalid cell"),
            DomainError::InvalidSelection => write!(f, "You cannot move that piece"),
            DomainError::InvalidMove => write!(f, "Invalid move"),
            DomainError::InvalidBoardSize(w) => write!(f, "Invalid size '{w}'"),
        }
    }
}

impl Error for DomainError {}
