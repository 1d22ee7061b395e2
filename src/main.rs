// src/main.rs

use dotenvy::dotenv;
use planbook::config::Config;
use planbook::routes;
use planbook::state::AppState;
use planbook::store::MemoryStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
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

    // Storage collaborator: in-memory, optionally seeded from a JSON file
    let store = MemoryStore::shared();

    if let Some(path) = &config.seed_file {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => match store.load_seed(&json).await {
                Ok((topics, questions)) => {
                    tracing::info!("Seeded {} topics and {} questions from {}", topics, questions, path);
                }
                Err(e) => tracing::error!("Failed to parse seed file {}: {:?}", path, e),
            },
            Err(e) => tracing::error!("Failed to read seed file {}: {:?}", path, e),
        }
    }

    // Create AppState
    let state = AppState {
        store,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
