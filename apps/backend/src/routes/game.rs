//! Player action routes.
//!
//! Every handler runs the same pipeline: structural validation (in the
//! extractor), nick normalization, credential check, then one call into the
//! services. Successful actions answer `{}`; state changes reach clients
//! through `/update`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::Nick;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::Matchmaking;
use crate::state::AppState;
use crate::validation::{check_password, normalize_nick, Field, Validate};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nick: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    const FIELDS: &'static [Field] = &[Field::text("nick"), Field::text("password")];
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub nick: String,
    pub password: String,
    pub size: u64,
}

impl Validate for JoinRequest {
    const FIELDS: &'static [Field] = &[
        Field::text("nick"),
        Field::text("password"),
        Field::index("size"),
    ];
}

/// Body of `/leave`, `/roll` and `/pass`.
#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub nick: String,
    pub password: String,
    pub game: String,
}

impl Validate for GameRequest {
    const FIELDS: &'static [Field] = &[
        Field::text("nick"),
        Field::text("password"),
        Field::text("game"),
    ];
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub nick: String,
    pub password: String,
    pub game: String,
    pub cell: usize,
}

impl Validate for NotifyRequest {
    const FIELDS: &'static [Field] = &[
        Field::text("nick"),
        Field::text("password"),
        Field::text("game"),
        Field::index("cell"),
    ];
}

fn empty_ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({}))
}

/// Normalized nick of an authenticated player.
fn authenticate(state: &AppState, nick: &str, password: &str) -> Result<Nick, AppError> {
    let nick = normalize_nick(nick)?;
    check_password(password)?;
    state.users.authenticate(&nick, password)?;
    Ok(nick)
}

/// POST /register
async fn register(
    body: ValidatedJson<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = normalize_nick(&body.nick)?;
    check_password(&body.password)?;
    state.users.register(&nick, &body.password)?;
    Ok(empty_ok())
}

/// POST /join
async fn join(
    body: ValidatedJson<JoinRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = authenticate(&state, &body.nick, &body.password)?;
    let size = Matchmaking::board_size(body.size)?;
    let outcome = state.matchmaking.join(&nick, size);
    Ok(HttpResponse::Ok().json(json!({ "game": outcome.game() })))
}

/// POST /leave
async fn leave(
    body: ValidatedJson<GameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = authenticate(&state, &body.nick, &body.password)?;
    state.turns.leave(&nick, &body.game)?;
    Ok(empty_ok())
}

/// POST /roll
async fn roll(
    body: ValidatedJson<GameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = authenticate(&state, &body.nick, &body.password)?;
    state.turns.roll(&nick, &body.game)?;
    Ok(empty_ok())
}

/// POST /pass
async fn pass(
    body: ValidatedJson<GameRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = authenticate(&state, &body.nick, &body.password)?;
    state.turns.pass(&nick, &body.game)?;
    Ok(empty_ok())
}

/// POST /notify
async fn notify(
    body: ValidatedJson<NotifyRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let nick = authenticate(&state, &body.nick, &body.password)?;
    state.turns.notify(&nick, &body.game, body.cell)?;
    Ok(empty_ok())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/join", web::post().to(join))
        .route("/leave", web::post().to(leave))
        .route("/roll", web::post().to(roll))
        .route("/pass", web::post().to(pass))
        .route("/notify", web::post().to(notify));
}
