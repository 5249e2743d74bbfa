//! Pairing of players waiting for a game of the same board size.
//!
//! At most one player waits per size. The waiter is handed the id the game
//! will have, so it can subscribe to updates before an opponent shows up.
//! When the second player arrives the session is created under that id, the
//! waiter plays Red and moves first.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::domain::{BoardSize, GameSession, Nick, SessionId};
use crate::errors::domain::DomainError;
use crate::realtime::{BroadcastGateway, UpdatePayload};
use crate::services::session_store::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Waiter {
    nick: Nick,
    game: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Queued; no opponent yet.
    Waiting(SessionId),
    /// Paired; the session now exists.
    Started(SessionId),
}

impl JoinOutcome {
    pub fn game(&self) -> &SessionId {
        match self {
            JoinOutcome::Waiting(id) | JoinOutcome::Started(id) => id,
        }
    }
}

pub struct Matchmaking {
    waiting: Mutex<HashMap<BoardSize, Waiter>>,
    store: Arc<SessionStore>,
    gateway: Arc<dyn BroadcastGateway>,
}

impl Matchmaking {
    pub fn new(store: Arc<SessionStore>, gateway: Arc<dyn BroadcastGateway>) -> Self {
        Self {
            waiting: Mutex::new(HashMap::new()),
            store,
            gateway,
        }
    }

    /// Queue `nick` for a game of `size`, or pair it with the player already
    /// waiting. Joining again while waiting for the same size returns the
    /// pending id; waiting for another size moves the entry and closes the
    /// old pending id's update channel.
    pub fn join(&self, nick: &str, size: BoardSize) -> JoinOutcome {
        let mut abandoned = Vec::new();
        let (game, paired) = {
            let mut waiting = self.waiting.lock();

            if let Some(current) = waiting.get(&size) {
                if current.nick == nick {
                    return JoinOutcome::Waiting(current.game.clone());
                }
            }
            waiting.retain(|_, w| {
                let keep = w.nick != nick;
                if !keep {
                    abandoned.push(w.game.clone());
                }
                keep
            });

            match waiting.remove(&size) {
                None => {
                    let game = Uuid::new_v4().to_string();
                    waiting.insert(
                        size,
                        Waiter {
                            nick: nick.to_string(),
                            game: game.clone(),
                        },
                    );
                    info!(game = %game, nick, size = size.width(), "Player waiting for opponent");
                    (game, None)
                }
                Some(waiter) => {
                    let session =
                        GameSession::new(waiter.game, size, waiter.nick, nick.to_string());
                    (session.id.clone(), Some(session))
                }
            }
        };

        for old in &abandoned {
            self.gateway.close(old);
        }
        let Some(session) = paired else {
            return JoinOutcome::Waiting(game);
        };

        let start = UpdatePayload::game_start(&session);
        self.store.insert(session);
        info!(game = %game, nick, "Game started");
        self.gateway.publish(&game, &start);
        JoinOutcome::Started(game)
    }

    /// Drops `nick`'s queue entry for `game` and closes its update channel.
    /// Returns whether one existed.
    pub fn cancel(&self, nick: &str, game: &str) -> bool {
        let removed = {
            let mut waiting = self.waiting.lock();
            let before = waiting.len();
            waiting.retain(|_, w| !(w.nick == nick && w.game == game));
            waiting.len() != before
        };
        if removed {
            info!(game, nick, "Player left the queue");
            self.gateway.close(game);
        }
        removed
    }

    pub fn is_waiting(&self, nick: &str, game: &str) -> bool {
        self.waiting
            .lock()
            .values()
            .any(|w| w.nick == nick && w.game == game)
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.lock().len()
    }

    /// Fails unless `size` is one of the allowed widths.
    pub fn board_size(width: u64) -> Result<BoardSize, DomainError> {
        u8::try_from(width)
            .ok()
            .and_then(BoardSize::new)
            .ok_or(DomainError::InvalidBoardSize(width))
    }
}
