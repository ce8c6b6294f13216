use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

use app::AppState;
use model::Config;

/// Paper text can be large
const JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize services");
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
        }
    };

    tracing::info!("Starting Resyft assistant server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
            .app_data(state.chat.clone())
            .app_data(state.extraction.clone())
            .app_data(state.classes.clone())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
