//! Host library for the quiz generator.
//!
//! Links the pure `quiz-core` state machine to durable SQLite storage, the
//! environment configuration and an asynchronous content source. A
//! presentation layer drives everything through [`commands`].

pub mod commands;
pub mod config;
pub mod db;
pub mod source;
pub mod state;

pub use config::AppConfig;
pub use db::{DbError, SqliteStore};
pub use source::{ContentSource, GeneratedBatch, SourceError};
pub use state::AppState;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Load configuration, open the review store and build the shared state.
pub fn bootstrap() -> anyhow::Result<AppState> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    open_state(&config)
}

/// Build the shared state for an explicit configuration.
pub fn open_state(config: &AppConfig) -> anyhow::Result<AppState> {
    tracing::info!(path = %config.db_path.display(), "opening review store");
    let store = SqliteStore::open(&config.db_path)?;
    let state = AppState::new(store, config.settings.clone());

    tracing::info!(
        question_count = state.settings.question_count,
        question_type = state.settings.question_type.as_str(),
        policy = state.settings.interval_policy.as_str(),
        "quiz host ready"
    );
    Ok(state)
}
