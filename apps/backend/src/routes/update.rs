//! `GET /update`: server-sent event stream of a session's updates.
//!
//! The first event is the current board (when the game has started); each
//! later event is one published [`UpdatePayload`]. A subscriber that falls
//! too far behind skips the updates it missed.

use std::convert::Infallible;

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{web, HttpResponse};
use bytes::{BufMut, Bytes, BytesMut};
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::realtime::{BroadcastGateway, SessionHub, UpdatePayload};
use crate::state::AppState;
use crate::validation::normalize_nick;

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub nick: Option<String>,
    pub game: Option<String>,
}

/// Wraps a JSON payload as one SSE event.
pub fn sse_frame(json: &[u8]) -> Bytes {
    let mut frame = BytesMut::with_capacity(json.len() + 8);
    frame.put_slice(b"data: ");
    frame.put_slice(json);
    frame.put_slice(b"\n\n");
    frame.freeze()
}

/// Subscribes to `game` and only then reads its current state. An update
/// published in between is delivered on the stream rather than lost.
fn attach<T>(
    hub: &SessionHub,
    game: &str,
    current: impl FnOnce() -> T,
) -> (broadcast::Receiver<Bytes>, T) {
    let rx = hub.subscribe(game);
    (rx, current())
}

async fn update(
    query: web::Query<UpdateQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let nick = normalize_nick(query.nick.as_deref().unwrap_or_default())?;
    let game = query
        .game
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| DomainError::malformed("game is undefined"))?;

    let seated = state
        .store
        .get(&game)
        .map(|shared| shared.lock().color_of(&nick).is_some());
    match seated {
        Some(true) => {}
        Some(false) => return Err(DomainError::NotAParticipant.into()),
        None if state.matchmaking.is_waiting(&nick, &game) => {}
        None => return Err(DomainError::SessionNotFound.into()),
    }

    let (rx, session) = attach(&state.hub, &game, || state.store.snapshot(&game));
    let first = match session {
        Some(session) => Some(UpdatePayload::game_start(&session)),
        None if state.matchmaking.is_waiting(&nick, &game) => None,
        None => {
            // Reaped or left the queue since the check above.
            state.hub.close(&game);
            return Err(DomainError::SessionNotFound.into());
        }
    };
    debug!(game = %game, nick = %nick, "Update stream opened");

    let initial = first
        .map(|payload| serde_json::to_vec(&payload))
        .transpose()
        .map_err(|e| AppError::internal(format!("Failed to serialize update: {e}")))?
        .map(|json| sse_frame(&json));

    let updates = BroadcastStream::new(rx).filter_map(move |item| match item {
        Ok(json) => Some(Ok::<Bytes, Infallible>(sse_frame(&json))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(game = %game, skipped, "Update stream lagging");
            None
        }
    });
    let stream = tokio_stream::iter(initial.map(Ok::<Bytes, Infallible>)).chain(updates);

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(CacheControl(vec![CacheDirective::NoCache]))
        .streaming(stream))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/update", web::get().to(update));
}
