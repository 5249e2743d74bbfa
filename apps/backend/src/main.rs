use actix_web::{web, App, HttpServer};
use tab_backend::config::ServerConfig;
use tab_backend::middleware::request_trace::RequestTrace;
use tab_backend::routes;
use tab_backend::state::AppState;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let app_state = AppState::new(config);

    spawn_reaper(app_state.clone());

    info!(host = %host, port, "Starting Tâb backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

/// Periodically drops sessions nobody has acted on for the idle timeout.
fn spawn_reaper(state: AppState) {
    let idle = state.config.idle_timeout();
    let every = state.config.reaper_interval();
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let reaped = state.turns.reap_idle(idle);
            if reaped > 0 {
                info!(reaped, "Idle sessions reaped");
            }
        }
    });
}
