// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use quizdesk::backend::HttpBackend;
use quizdesk::config::Config;
use quizdesk::routes;
use quizdesk::session::{FileSessionStore, SessionManager};
use quizdesk::state::{AppState, LatestSlot};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "quizdesk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let backend = HttpBackend::new(
        &config.backend_url,
        Duration::from_secs(config.backend_timeout_secs),
    )
    .expect("Failed to build backend HTTP client");
    tracing::info!("Using backend at {}", config.backend_url);

    // Restore the previous session, if any
    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let session = SessionManager::init(store).expect("Failed to restore session");

    let state = AppState {
        backend: Arc::new(backend),
        session: Arc::new(session),
        config: config.clone(),
        dashboard: Arc::new(LatestSlot::default()),
    };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");

    axum::serve(listener, app).await.expect("Server error");
}
