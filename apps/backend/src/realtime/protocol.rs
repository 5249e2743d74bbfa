//! Wire shape of the updates pushed to session subscribers.
//!
//! One flat object with optional members, camelCase on the wire. Each action
//! fills only the members it changed; absent members are not serialized.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{movable_pieces, Color, Dice, DiceThrow, GameSession, Nick, Piece, Pieces, Step};

/// Dice as shown to clients. `used` is server-side bookkeeping and stays
/// private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceView {
    pub stick_values: [bool; 4],
    pub value: u8,
    pub keep_playing: bool,
}

impl From<DiceThrow> for DiceView {
    fn from(t: DiceThrow) -> Self {
        Self {
            stick_values: t.stick_values,
            value: t.value,
            keep_playing: t.keep_playing,
        }
    }
}

impl From<Dice> for DiceView {
    fn from(d: Dice) -> Self {
        Self {
            stick_values: d.stick_values,
            value: d.value,
            keep_playing: d.keep_playing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<BTreeMap<Nick, Color>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<Nick>,
    /// `Some(None)` is sent as `null` to tell clients the dice was cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<Option<DiceView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<Nick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Pieces>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_pass: Option<Nick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
    /// `Some(None)` clears a previous selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Option<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_moves: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Nick>,
}

impl UpdatePayload {
    /// Full state of a match: the first message after pairing, and the first
    /// frame of every update stream. Throw, selection and winner are included
    /// when present so a reconnecting client can rebuild its view.
    pub fn game_start(session: &GameSession) -> Self {
        let mut payload = Self {
            game: Some(session.id.clone()),
            size: Some(session.size.width() as u8),
            players: Some(session.players.clone()),
            initial: Some(session.initial.clone()),
            turn: Some(session.turn.clone()),
            pieces: Some(session.pieces.clone()),
            step: Some(session.step),
            winner: Self::finished(session).winner,
            ..Self::default()
        };

        if let Some(dice) = session.dice {
            payload.dice = Some(Some(DiceView::from(dice)));
            if !dice.used && !session.is_finished() {
                if let Some(color) = session.color_of(&session.turn) {
                    let movable =
                        movable_pieces(&session.pieces, color, dice.value, session.width());
                    if movable.is_empty() {
                        payload.must_pass = Some(session.turn.clone());
                    }
                    payload.movable = Some(movable);
                }
            }
        }

        if session.selected.is_some() {
            payload.selected = Some(session.selected);
            payload.valid_moves = Some(session.valid_moves.clone());
        }

        payload
    }

    /// Winner's nick, resolved from the winning color.
    pub fn finished(session: &GameSession) -> Self {
        Self {
            winner: session
                .winner
                .and_then(|color| session.nick_of(color).cloned()),
            ..Self::default()
        }
    }
}
