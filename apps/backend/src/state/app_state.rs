use std::sync::Arc;

use crate::auth::Blake3Passwords;
use crate::config::ServerConfig;
use crate::domain::{DiceEngine, StickDice};
use crate::realtime::SessionHub;
use crate::services::{Matchmaking, SessionStore, TurnController, UserService};

/// Shared resources handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<SessionStore>,
    pub hub: Arc<SessionHub>,
    pub users: Arc<UserService>,
    pub matchmaking: Arc<Matchmaking>,
    pub turns: Arc<TurnController>,
}

impl AppState {
    /// Wires services with fair stick dice, seeded from `config.dice_seed`.
    pub fn new(config: ServerConfig) -> Self {
        let dice = Arc::new(StickDice::new(config.dice_seed));
        Self::with_dice(config, dice)
    }

    /// Same wiring with a caller-chosen dice source.
    pub fn with_dice(config: ServerConfig, dice: Arc<dyn DiceEngine>) -> Self {
        let store = Arc::new(SessionStore::new());
        let hub = Arc::new(SessionHub::new());
        let users = Arc::new(UserService::new(Arc::new(Blake3Passwords::new(
            &config.password_pepper,
        ))));
        let matchmaking = Arc::new(Matchmaking::new(store.clone(), hub.clone()));
        let turns = Arc::new(TurnController::new(
            store.clone(),
            dice,
            hub.clone(),
            matchmaking.clone(),
        ));
        Self {
            config,
            store,
            hub,
            users,
            matchmaking,
            turns,
        }
    }
}
