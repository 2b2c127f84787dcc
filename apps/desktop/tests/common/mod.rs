//! Common test utilities and fixtures for host integration tests.
//!
//! Every context runs against its own in-memory SQLite store, so tests are
//! independent and need no environment setup.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use quiz_core::{QuizSettings, ReviewRecord, SessionState};
use quizgen_desktop::{AppState, SqliteStore};

/// Test context holding a fresh application state.
pub struct TestContext {
    pub state: Arc<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(QuizSettings::default())
    }

    pub fn with_settings(settings: QuizSettings) -> Self {
        let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
        Self {
            state: Arc::new(AppState::new(store, settings)),
        }
    }

    /// Context whose generation calls give up after `timeout`.
    pub fn with_generation_timeout(timeout: Duration) -> Self {
        let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
        let state = AppState::new(store, QuizSettings::default()).with_generation_timeout(timeout);
        Self {
            state: Arc::new(state),
        }
    }

    /// Yield until a content source call is in flight.
    pub async fn wait_for_source_call(&self) {
        while !self.state.source_busy() {
            tokio::task::yield_now().await;
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.state.session.lock().unwrap().state()
    }

    /// Snapshot of every persisted review record.
    pub fn review_records(&self) -> Vec<ReviewRecord> {
        self.state
            .scheduler
            .lock()
            .unwrap()
            .records()
            .values()
            .cloned()
            .collect()
    }
}
