use actix_web::web;

pub mod game;
pub mod health;
pub mod update;

/// Registers every route. `main.rs` and the route tests share this, so the
/// tests exercise the same paths the server exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(game::configure_routes)
        .configure(update::configure_routes);
}
