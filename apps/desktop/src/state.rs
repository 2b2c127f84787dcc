//! Application state.

use crate::commands::generation::GENERATION_TIMEOUT;
use crate::db::SqliteStore;
use quiz_core::{QuizSession, QuizSettings, Scheduler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Shared application state.
///
/// Lock order is always `session` before `scheduler`.
pub struct AppState {
    pub session: Mutex<QuizSession>,
    pub scheduler: Mutex<Scheduler<SqliteStore>>,
    pub settings: QuizSettings,
    generation_timeout: Duration,
    source_busy: AtomicBool,
}

impl AppState {
    pub fn new(store: SqliteStore, settings: QuizSettings) -> Self {
        let scheduler = Scheduler::with_settings(store, &settings);
        Self {
            session: Mutex::new(QuizSession::new()),
            scheduler: Mutex::new(scheduler),
            settings,
            generation_timeout: GENERATION_TIMEOUT,
            source_busy: AtomicBool::new(false),
        }
    }

    /// Override the bound on a single generation call.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }

    /// True while a topic scan or generation call is awaiting the source.
    pub fn source_busy(&self) -> bool {
        self.source_busy.load(Ordering::Acquire)
    }

    /// Claim the content source. Returns None if a call is already in flight.
    pub(crate) fn claim_source(&self) -> Option<SourceGuard<'_>> {
        self.source_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SourceGuard {
                flag: &self.source_busy,
            })
    }
}

/// Releases the content source when dropped.
pub(crate) struct SourceGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SourceGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
