#![allow(dead_code, unused_macros)]

// tests/common/mod.rs
use std::sync::Arc;

use actix_web::test::TestRequest;
use serde_json::{json, Value};
use tab_backend::domain::{BoardSize, ScriptedDice};
use tab_backend::services::JoinOutcome;
use tab_backend::{AppState, ServerConfig};
use tab_test_support::unique_helpers::unique_nick;

pub mod proptest_prelude;

pub const PASSWORD: &str = "pw";

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    tab_test_support::logging::init();
}

/// Builds the full app around `state`, with the same middleware and routes
/// as the server. Test files pull it in with `#[macro_use] mod common;`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(tab_backend::RequestTrace)
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(tab_backend::routes::configure),
        )
        .await
    };
}

/// App state whose dice yield `values` in order, cycling.
pub fn state_with_dice(values: &[u8]) -> AppState {
    AppState::with_dice(ServerConfig::default(), Arc::new(ScriptedDice::values(values)))
}

/// Registers two fresh players and pairs them on a board of `width`.
/// Returns `(game, red, blue)`; red is on turn.
pub fn seed_game(state: &AppState, width: u8) -> (String, String, String) {
    let red = unique_nick("red");
    let blue = unique_nick("blue");
    state.users.register(&red, PASSWORD).expect("register red");
    state.users.register(&blue, PASSWORD).expect("register blue");

    let size = BoardSize::new(width).expect("allowed width");
    let pending = state.matchmaking.join(&red, size);
    let started = state.matchmaking.join(&blue, size);
    assert!(matches!(started, JoinOutcome::Started(_)));
    assert_eq!(pending.game(), started.game());
    (started.game().clone(), red, blue)
}

pub fn body(nick: &str, game: &str) -> Value {
    json!({ "nick": nick, "password": PASSWORD, "game": game })
}

pub fn post(uri: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(uri).set_json(body)
}
