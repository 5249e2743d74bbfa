//! Fan-out of session updates.
//!
//! Every session with at least one listener owns a `tokio::sync::broadcast`
//! channel. Payloads are serialized once and shared by all receivers.

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::SessionId;
use crate::realtime::protocol::UpdatePayload;

/// Buffered updates per session before a slow listener starts lagging.
pub const CHANNEL_CAPACITY: usize = 64;

/// Delivers post-action updates to the participants of a session.
///
/// Publishing is fire-and-forget: no listener is not an error, and a failed
/// delivery never undoes the action that produced the payload.
pub trait BroadcastGateway: Send + Sync {
    /// Returns the number of listeners the payload was handed to.
    fn publish(&self, session_id: &str, payload: &UpdatePayload) -> usize;

    /// Ends delivery for a session that no longer exists.
    fn close(&self, session_id: &str);
}

#[derive(Default)]
pub struct SessionHub {
    channels: DashMap<SessionId, broadcast::Sender<Bytes>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Listen to `session_id`, creating its channel on first use.
    pub fn subscribe(&self, session_id: &str) -> broadcast::Receiver<Bytes> {
        self.channels
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, session_id: &str) -> usize {
        self.channels
            .get(session_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl BroadcastGateway for SessionHub {
    fn publish(&self, session_id: &str, payload: &UpdatePayload) -> usize {
        let Some(tx) = self.channels.get(session_id) else {
            return 0;
        };
        let encoded = match serde_json::to_vec(payload) {
            Ok(json) => Bytes::from(json),
            Err(err) => {
                warn!(game = %session_id, error = %err, "Failed to serialize update");
                return 0;
            }
        };
        // A send error only means nobody is listening right now.
        tx.send(encoded).unwrap_or(0)
    }

    /// Drops the channel. Listeners see the stream end once buffered
    /// updates are drained.
    fn close(&self, session_id: &str) {
        if self.channels.remove(session_id).is_some() {
            debug!(game = %session_id, "Update channel closed");
        }
    }
}
