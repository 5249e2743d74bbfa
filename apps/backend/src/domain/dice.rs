//! Four-stick dice.
//!
//! Each stick has a flat (marked) face and a round face. The number of flat
//! faces showing is looked up in a [`StickTable`] to get the move value and
//! whether the thrower keeps playing.

use parking_lot::Mutex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

pub const STICKS: usize = 4;

/// Value and replay flag for one flat-face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickOutcome {
    pub value: u8,
    pub keep_playing: bool,
}

/// Flat-face count (0..=4) to outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickTable {
    outcomes: [StickOutcome; STICKS + 1],
}

impl StickTable {
    /// Canonical table: no flat face counts as 4, the single "tâb" and the
    /// all-flat throw also grant another throw.
    pub const fn canonical() -> Self {
        Self {
            outcomes: [
                StickOutcome { value: 4, keep_playing: true },
                StickOutcome { value: 1, keep_playing: true },
                StickOutcome { value: 2, keep_playing: false },
                StickOutcome { value: 3, keep_playing: false },
                StickOutcome { value: 4, keep_playing: true },
            ],
        }
    }

    #[inline]
    pub fn outcome(&self, flat_faces: usize) -> StickOutcome {
        self.outcomes[flat_faces.min(STICKS)]
    }

    /// Resolve a full stick pattern (`true` = flat face up).
    pub fn resolve(&self, stick_values: [bool; STICKS]) -> DiceThrow {
        let flat = stick_values.iter().filter(|&&up| up).count();
        let StickOutcome { value, keep_playing } = self.outcome(flat);
        DiceThrow {
            stick_values,
            value,
            keep_playing,
        }
    }
}

impl Default for StickTable {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Result of one throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceThrow {
    pub stick_values: [bool; STICKS],
    pub value: u8,
    pub keep_playing: bool,
}

/// Source of dice throws used by the turn controller.
pub trait DiceEngine: Send + Sync {
    fn throw(&self) -> DiceThrow;
}

/// Fair stick dice backed by a seedable RNG.
pub struct StickDice {
    table: StickTable,
    rng: Mutex<StdRng>,
}

impl StickDice {
    /// `Some(seed)` gives a reproducible sequence, `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_table(StickTable::canonical(), seed)
    }

    pub fn with_table(table: StickTable, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            table,
            rng: Mutex::new(rng),
        }
    }

    pub fn table(&self) -> &StickTable {
        &self.table
    }
}

impl DiceEngine for StickDice {
    fn throw(&self) -> DiceThrow {
        let mut rng = self.rng.lock();
        let mut sticks = [false; STICKS];
        for stick in sticks.iter_mut() {
            *stick = rng.random_bool(0.5);
        }
        self.table.resolve(sticks)
    }
}

/// Replays a fixed list of stick patterns, cycling when exhausted.
#[derive(Debug)]
pub struct ScriptedDice {
    table: StickTable,
    script: Vec<[bool; STICKS]>,
    cursor: Mutex<usize>,
}

impl ScriptedDice {
    pub fn new(script: Vec<[bool; STICKS]>) -> Self {
        Self {
            table: StickTable::canonical(),
            script,
            cursor: Mutex::new(0),
        }
    }

    /// Builds a script that yields the given dice values in order.
    pub fn values(values: &[u8]) -> Self {
        Self::new(values.iter().map(|&v| sticks_for_value(v)).collect())
    }
}

impl DiceEngine for ScriptedDice {
    fn throw(&self) -> DiceThrow {
        let mut cursor = self.cursor.lock();
        let sticks = if self.script.is_empty() {
            [true, false, false, false]
        } else {
            self.script[*cursor % self.script.len()]
        };
        *cursor += 1;
        self.table.resolve(sticks)
    }
}

/// A stick pattern that produces `value` under the canonical table.
/// Value 4 uses the all-flat pattern; out-of-range values fall back to 1.
pub fn sticks_for_value(value: u8) -> [bool; STICKS] {
    match value {
        2 => [true, true, false, false],
        3 => [true, true, true, false],
        4 => [true, true, true, true],
        _ => [true, false, false, false],
    }
}
