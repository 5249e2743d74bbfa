//! Turn state machine.
//!
//! Pure transitions over a [`GameSession`]. Each action runs every check
//! first and only then writes, so a rejected action leaves the session
//! untouched. The checks run in a fixed order and the first failure is the
//! reported reason.
//!
//! ```text
//! AwaitingRoll --roll--> AwaitingAction --move (no replay)--> AwaitingRoll (opponent)
//!                             |  \--move (replay)--> AwaitingRoll (same player)
//!                             \--pass--> AwaitingRoll (opponent)
//! any --capture of last piece / forfeit--> GameOver
//! ```

use time::OffsetDateTime;
use tracing::debug;

use crate::domain::board::{Color, Piece};
use crate::domain::dice::{DiceEngine, DiceThrow};
use crate::domain::rules::{apply_move, has_valid_moves, movable_pieces, valid_moves, winner};
use crate::domain::session::{Dice, GameSession, Nick, Step};
use crate::errors::domain::DomainError;

/// Membership, not-finished and turn ownership, in that order.
/// Returns the actor's color.
pub fn check_actor(session: &GameSession, nick: &str) -> Result<Color, DomainError> {
    let color = session
        .color_of(nick)
        .ok_or(DomainError::NotAParticipant)?;
    if session.is_finished() {
        return Err(DomainError::GameAlreadyFinished);
    }
    if session.turn != nick {
        return Err(DomainError::NotYourTurn);
    }
    Ok(color)
}

/// Whether `nick` may throw now. Does not mutate.
pub fn check_roll(session: &GameSession, nick: &str) -> Result<Color, DomainError> {
    let color = check_actor(session, nick)?;
    if let Some(dice) = &session.dice {
        let can_move = has_valid_moves(&session.pieces, color, dice.value, session.width());
        if can_move && !dice.used {
            return Err(DomainError::DiceMustBeUsedFirst);
        }
        if !dice.keep_playing {
            return Err(DomainError::TurnOver);
        }
    }
    Ok(color)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub throw: DiceThrow,
    pub movable: Vec<usize>,
}

impl RollOutcome {
    pub fn must_pass(&self) -> bool {
        self.movable.is_empty()
    }
}

/// Throw the sticks for `nick`. The turn never changes here, even when
/// nothing can move; the player passes explicitly.
pub fn roll(
    session: &mut GameSession,
    nick: &str,
    dice: &dyn DiceEngine,
    now: OffsetDateTime,
) -> Result<RollOutcome, DomainError> {
    let color = check_roll(session, nick)?;

    let throw = dice.throw();
    session.dice = Some(Dice::fresh(throw));
    session.reset_selection();
    session.touch(now);

    let movable = movable_pieces(&session.pieces, color, throw.value, session.width());
    debug!(
        game = %session.id,
        nick,
        value = throw.value,
        keep_playing = throw.keep_playing,
        movable = movable.len(),
        "Dice thrown"
    );
    Ok(RollOutcome { throw, movable })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// A piece was (re)selected.
    Selected {
        selected: usize,
        valid_moves: Vec<usize>,
    },
    /// The selected piece was clicked again.
    Deselected,
    Moved(MoveOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: usize,
    pub to: usize,
    pub captured: Option<Piece>,
    pub winner: Option<Color>,
    /// True when the turn went to the opponent.
    pub turn_passed: bool,
}

/// Select a piece or move the selected one to `cell`.
pub fn notify(
    session: &mut GameSession,
    nick: &str,
    cell: usize,
    now: OffsetDateTime,
) -> Result<NotifyOutcome, DomainError> {
    let color = check_actor(session, nick)?;
    let dice = session.dice.ok_or(DomainError::DiceNotRolled)?;
    if dice.used {
        return Err(DomainError::DiceAlreadyUsed);
    }
    if cell >= session.pieces.len() {
        return Err(DomainError::InvalidCell);
    }
    let next = opponent(session, nick)?;

    let width = session.width();
    let moves_from_cell = valid_moves(&session.pieces, cell, dice.value, width, color);

    let outcome = match (session.step, session.selected) {
        (Step::To, Some(selected)) if cell == selected => {
            session.reset_selection();
            NotifyOutcome::Deselected
        }
        (Step::To, Some(selected)) if session.valid_moves.contains(&cell) => {
            let captured = apply_move(&mut session.pieces, selected, cell);
            session.reset_selection();
            finish_move(session, nick, next, dice, selected, cell, captured)
        }
        _ if !moves_from_cell.is_empty() => {
            session.step = Step::To;
            session.selected = Some(cell);
            session.valid_moves = moves_from_cell.clone();
            NotifyOutcome::Selected {
                selected: cell,
                valid_moves: moves_from_cell,
            }
        }
        (Step::To, _) => return Err(DomainError::InvalidMove),
        (Step::From, _) => return Err(DomainError::InvalidSelection),
    };

    session.touch(now);
    Ok(outcome)
}

fn finish_move(
    session: &mut GameSession,
    nick: &str,
    next: Nick,
    dice: Dice,
    from: usize,
    to: usize,
    captured: Option<Piece>,
) -> NotifyOutcome {
    let winner = winner(&session.pieces);
    session.winner = winner;

    let turn_passed = winner.is_none() && !dice.keep_playing;
    if turn_passed {
        session.turn = next;
        session.dice = None;
    } else {
        session.dice = Some(Dice { used: true, ..dice });
    }

    debug!(game = %session.id, nick, from, to, captured = captured.is_some(), "Piece moved");
    NotifyOutcome::Moved(MoveOutcome {
        from,
        to,
        captured,
        winner,
        turn_passed,
    })
}

/// Give the turn to the opponent when no move can be made with the current
/// throw and no extra throw is owed. Returns the nick now on turn.
pub fn pass(
    session: &mut GameSession,
    nick: &str,
    now: OffsetDateTime,
) -> Result<Nick, DomainError> {
    let color = check_actor(session, nick)?;
    let dice = session.dice.ok_or(DomainError::DiceNotRolled)?;
    if !dice.used && has_valid_moves(&session.pieces, color, dice.value, session.width()) {
        return Err(DomainError::DiceMustBeUsedFirst);
    }
    if dice.keep_playing {
        return Err(DomainError::MustRollAgain);
    }
    let next = opponent(session, nick)?;

    session.turn = next.clone();
    session.dice = None;
    session.reset_selection();
    session.touch(now);
    debug!(game = %session.id, nick, next = %next, "Turn passed");
    Ok(next)
}

/// `nick` gives up; the opponent's color wins. Turn ownership is not
/// required.
pub fn forfeit(
    session: &mut GameSession,
    nick: &str,
    now: OffsetDateTime,
) -> Result<Color, DomainError> {
    let color = session
        .color_of(nick)
        .ok_or(DomainError::NotAParticipant)?;
    if session.is_finished() {
        return Err(DomainError::GameAlreadyFinished);
    }
    let winner = color.opponent();
    session.winner = Some(winner);
    session.reset_selection();
    session.touch(now);
    debug!(game = %session.id, nick, "Player forfeited");
    Ok(winner)
}

fn opponent(session: &GameSession, nick: &str) -> Result<Nick, DomainError> {
    // Sessions always hold two players; a lone player is treated as not seated.
    session
        .opponent_of(nick)
        .cloned()
        .ok_or(DomainError::NotAParticipant)
}
