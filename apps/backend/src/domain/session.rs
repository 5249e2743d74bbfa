use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::board::{initial_pieces, BoardSize, Color, Pieces};
use crate::domain::dice::DiceThrow;

pub type SessionId = String;
pub type Nick = String;

/// Selection phase, drives the client UI only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Choosing which piece to move.
    From,
    /// Choosing where the selected piece goes.
    To,
}

/// The throw currently in play for `turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dice {
    pub stick_values: [bool; 4],
    pub value: u8,
    pub used: bool,
    pub keep_playing: bool,
}

impl Dice {
    pub fn fresh(throw: DiceThrow) -> Self {
        Self {
            stick_values: throw.stick_values,
            value: throw.value,
            used: false,
            keep_playing: throw.keep_playing,
        }
    }
}

/// Coarse turn phase derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingAction,
    GameOver,
}

/// Authoritative state of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: SessionId,
    pub size: BoardSize,
    pub players: BTreeMap<Nick, Color>,
    pub pieces: Pieces,
    pub turn: Nick,
    pub initial: Nick,
    pub dice: Option<Dice>,
    pub step: Step,
    pub selected: Option<usize>,
    pub valid_moves: Vec<usize>,
    pub winner: Option<Color>,
    pub last_activity: OffsetDateTime,
}

impl GameSession {
    /// New match on the starting layout. `first` plays Red and moves first.
    pub fn new(id: SessionId, size: BoardSize, first: Nick, second: Nick) -> Self {
        let mut players = BTreeMap::new();
        players.insert(first.clone(), Color::Red);
        players.insert(second, Color::Blue);
        Self {
            id,
            size,
            players,
            pieces: initial_pieces(size),
            turn: first.clone(),
            initial: first,
            dice: None,
            step: Step::From,
            selected: None,
            valid_moves: Vec::new(),
            winner: None,
            last_activity: OffsetDateTime::now_utc(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width()
    }

    pub fn color_of(&self, nick: &str) -> Option<Color> {
        self.players.get(nick).copied()
    }

    /// The other participant.
    pub fn opponent_of(&self, nick: &str) -> Option<&Nick> {
        self.players.keys().find(|other| other.as_str() != nick)
    }

    pub fn nick_of(&self, color: Color) -> Option<&Nick> {
        self.players
            .iter()
            .find_map(|(nick, c)| (*c == color).then_some(nick))
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn phase(&self) -> TurnPhase {
        match (&self.winner, &self.dice) {
            (Some(_), _) => TurnPhase::GameOver,
            (None, None) => TurnPhase::AwaitingRoll,
            // A spent replay throw only allows rolling again.
            (None, Some(d)) if d.used => TurnPhase::AwaitingRoll,
            (None, Some(_)) => TurnPhase::AwaitingAction,
        }
    }

    pub(crate) fn reset_selection(&mut self) {
        self.step = Step::From;
        self.selected = None;
        self.valid_moves.clear();
    }

    pub(crate) fn touch(&mut self, now: OffsetDateTime) {
        self.last_activity = now;
    }
}
