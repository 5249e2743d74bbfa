//! Turn controller: runs player actions against the session store.
//!
//! Every action follows the same path: lock the session, run the pure
//! transition from [`crate::domain::turn`], build the update while still
//! holding the lock, release it, then publish. A rejected action publishes
//! nothing.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::domain::turn::{self, MoveOutcome, NotifyOutcome, RollOutcome};
use crate::domain::{DiceEngine, GameSession, Step};
use crate::errors::domain::DomainError;
use crate::realtime::{BroadcastGateway, DiceView, UpdatePayload};
use crate::services::matchmaking::Matchmaking;
use crate::services::session_store::SessionStore;

pub struct TurnController {
    store: Arc<SessionStore>,
    dice: Arc<dyn DiceEngine>,
    gateway: Arc<dyn BroadcastGateway>,
    matchmaking: Arc<Matchmaking>,
}

impl TurnController {
    pub fn new(
        store: Arc<SessionStore>,
        dice: Arc<dyn DiceEngine>,
        gateway: Arc<dyn BroadcastGateway>,
        matchmaking: Arc<Matchmaking>,
    ) -> Self {
        Self {
            store,
            dice,
            gateway,
            matchmaking,
        }
    }

    /// Lock, mutate, unlock, publish.
    fn run_mutation<F>(&self, game: &str, mutation: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut GameSession, OffsetDateTime) -> Result<UpdatePayload, DomainError>,
    {
        let now = OffsetDateTime::now_utc();
        let payload = self
            .store
            .with_session_mut(game, |session| mutation(session, now))?;
        self.gateway.publish(game, &payload);
        Ok(())
    }

    pub fn roll(&self, nick: &str, game: &str) -> Result<(), DomainError> {
        self.run_mutation(game, |session, now| {
            let outcome = turn::roll(session, nick, self.dice.as_ref(), now)?;
            Ok(roll_update(session, nick, outcome))
        })
    }

    pub fn notify(&self, nick: &str, game: &str, cell: usize) -> Result<(), DomainError> {
        self.run_mutation(game, |session, now| {
            let outcome = turn::notify(session, nick, cell, now)?;
            Ok(notify_update(session, outcome))
        })
    }

    pub fn pass(&self, nick: &str, game: &str) -> Result<(), DomainError> {
        self.run_mutation(game, |session, now| {
            let next = turn::pass(session, nick, now)?;
            Ok(UpdatePayload {
                turn: Some(next),
                pieces: Some(session.pieces.clone()),
                dice: Some(None),
                step: Some(Step::From),
                selected: Some(None),
                ..UpdatePayload::default()
            })
        })
    }

    /// Leave the queue, or forfeit a running game.
    pub fn leave(&self, nick: &str, game: &str) -> Result<(), DomainError> {
        if self.matchmaking.cancel(nick, game) {
            return Ok(());
        }
        self.run_mutation(game, |session, now| {
            turn::forfeit(session, nick, now)?;
            info!(game = %session.id, nick, "Game forfeited");
            Ok(UpdatePayload::finished(session))
        })
    }

    /// Drops sessions idle for longer than `idle`. An unfinished game is lost
    /// by the player who was expected to act. Returns how many were removed.
    pub fn reap_idle(&self, idle: Duration) -> usize {
        let reaped = self.store.reap_idle(OffsetDateTime::now_utc(), idle);
        for mut session in reaped.iter().cloned() {
            if !session.is_finished() {
                session.winner = session.color_of(&session.turn).map(|c| c.opponent());
                info!(game = %session.id, nick = %session.turn, "Game timed out");
                self.gateway
                    .publish(&session.id, &UpdatePayload::finished(&session));
            }
            self.gateway.close(&session.id);
        }
        reaped.len()
    }
}

fn roll_update(session: &GameSession, nick: &str, outcome: RollOutcome) -> UpdatePayload {
    let must_pass = outcome.must_pass().then(|| nick.to_string());
    UpdatePayload {
        dice: Some(Some(DiceView::from(outcome.throw))),
        turn: Some(session.turn.clone()),
        movable: Some(outcome.movable),
        pieces: Some(session.pieces.clone()),
        must_pass,
        ..UpdatePayload::default()
    }
}

fn notify_update(session: &GameSession, outcome: NotifyOutcome) -> UpdatePayload {
    let base = UpdatePayload {
        turn: Some(session.turn.clone()),
        pieces: Some(session.pieces.clone()),
        step: Some(session.step),
        ..UpdatePayload::default()
    };
    match outcome {
        NotifyOutcome::Selected {
            selected,
            valid_moves,
        } => UpdatePayload {
            selected: Some(Some(selected)),
            valid_moves: Some(valid_moves),
            ..base
        },
        NotifyOutcome::Deselected => UpdatePayload {
            selected: Some(None),
            valid_moves: Some(Vec::new()),
            ..base
        },
        NotifyOutcome::Moved(MoveOutcome {
            captured,
            turn_passed,
            ..
        }) => {
            let dice = if turn_passed {
                None
            } else {
                session.dice.map(DiceView::from)
            };
            UpdatePayload {
                selected: Some(None),
                dice: Some(dice),
                captured,
                winner: UpdatePayload::finished(session).winner,
                ..base
            }
        }
    }
}
