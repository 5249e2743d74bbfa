//! Registered players and credential checks.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::auth::{AuthService, PasswordHash};
use crate::domain::Nick;
use crate::errors::domain::DomainError;

pub struct UserService {
    users: DashMap<Nick, PasswordHash>,
    auth: Arc<dyn AuthService>,
    /// Compared against when the nick is unknown, so both failure paths do
    /// the same hashing work.
    decoy: PasswordHash,
}

impl UserService {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        let decoy = auth.hash("decoy");
        Self {
            users: DashMap::new(),
            auth,
            decoy,
        }
    }

    /// Creates the account on first use; afterwards the password must match.
    /// Expects a normalized nick.
    pub fn register(&self, nick: &str, password: &str) -> Result<(), DomainError> {
        match self.users.entry(nick.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(self.auth.hash(password));
                info!(nick, "Player registered");
                Ok(())
            }
            Entry::Occupied(existing) => {
                if self.auth.verify(password, existing.get()) {
                    debug!(nick, "Player re-registered");
                    Ok(())
                } else {
                    Err(DomainError::Unauthenticated)
                }
            }
        }
    }

    pub fn authenticate(&self, nick: &str, password: &str) -> Result<(), DomainError> {
        let verified = match self.users.get(nick) {
            Some(stored) => self.auth.verify(password, stored.value()),
            None => {
                let _ = self.auth.verify(password, &self.decoy);
                false
            }
        };
        if verified {
            Ok(())
        } else {
            debug!(nick, "Authentication failed");
            Err(DomainError::Unauthenticated)
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
