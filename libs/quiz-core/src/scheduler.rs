//! Spaced repetition scheduler.
//!
//! Tracks only questions that have been missed at least once. The whole review
//! map is stored as one JSON document under a single key in a
//! [`KeyValueStore`], and rewritten after every graded answer.

use crate::algorithm::IntervalPolicy;
use crate::content_id::ContentId;
use crate::error::StoreError;
use crate::types::{Question, QuizSettings, ReviewRecord};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Persisted review map, keyed by content identity.
pub type ReviewMap = BTreeMap<ContentId, ReviewRecord>;

type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable string key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Read-modify-write of one key.
    ///
    /// Backends shared between processes should override this to run the
    /// read and the write atomically.
    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> StoreResult<String>,
    ) -> StoreResult<()> {
        let current = self.get(key)?;
        let next = f(current)?;
        self.set(key, &next)
    }
}

/// In-memory store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self
            .inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> StoreResult<String>,
    ) -> StoreResult<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let next = f(map.get(key).cloned())?;
        map.insert(key.to_string(), next);
        Ok(())
    }
}

/// What a graded answer did to the review map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Correct on a question with no record; nothing stored.
    Untracked,
    /// Incorrect; the record is due immediately.
    Lapsed,
    /// Correct on a tracked question; pushed into the future.
    Advanced {
        interval_days: u32,
        due_at: DateTime<Utc>,
    },
}

/// Spaced repetition scheduler over an injected store.
pub struct Scheduler<S: KeyValueStore> {
    store: S,
    policy: Box<dyn IntervalPolicy>,
    storage_key: String,
    records: ReviewMap,
}

impl<S: KeyValueStore> Scheduler<S> {
    /// Open a scheduler, loading whatever review map the store holds.
    pub fn open(store: S, policy: Box<dyn IntervalPolicy>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let records = load_map(&store, &storage_key);
        tracing::debug!(
            records = records.len(),
            policy = policy.name(),
            "opened review scheduler"
        );
        Self {
            store,
            policy,
            storage_key,
            records,
        }
    }

    pub fn with_settings(store: S, settings: &QuizSettings) -> Self {
        Self::open(
            store,
            settings.interval_policy.build(),
            settings.storage_key.clone(),
        )
    }

    /// Apply a graded answer and persist the updated map.
    pub fn record_result(
        &mut self,
        question: &Question,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> StoreResult<ScheduleOutcome> {
        let content_id = question.content_id();
        let policy = &*self.policy;
        let mut outcome = ScheduleOutcome::Untracked;
        let mut latest: Option<ReviewMap> = None;

        self.store.update(&self.storage_key, &mut |raw: Option<String>| -> StoreResult<String> {
            let mut map = parse_map(raw.as_deref());
            outcome = apply(&mut map, policy, question, &content_id, is_correct, now);
            let json = serde_json::to_string(&map)?;
            latest = Some(map);
            Ok(json)
        })?;

        if let Some(map) = latest {
            self.records = map;
        }
        tracing::debug!(
            content_id = %content_id,
            is_correct,
            outcome = ?outcome,
            "updated review schedule"
        );
        Ok(outcome)
    }

    /// Reload the map from the store, picking up writes from other handles.
    pub fn refresh(&mut self) {
        self.records = load_map(&self.store, &self.storage_key);
    }

    /// Records due at `now`, earliest first.
    pub fn due_records(&self, now: DateTime<Utc>) -> Vec<&ReviewRecord> {
        let mut due: Vec<&ReviewRecord> = self.records.values().filter(|r| r.is_due(now)).collect();
        due.sort_by_key(|r| r.due_at);
        due
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.records.values().filter(|r| r.is_due(now)).count()
    }

    /// Build a shuffled review batch from the due snapshots, with fresh ids.
    pub fn build_review_batch<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .due_records(now)
            .into_iter()
            .map(|r| r.question.clone())
            .collect();
        questions.shuffle(rng);
        for (idx, question) in questions.iter_mut().enumerate() {
            question.id = idx as u32 + 1;
        }
        questions
    }

    pub fn get(&self, content_id: &ContentId) -> Option<&ReviewRecord> {
        self.records.get(content_id)
    }

    pub fn records(&self) -> &ReviewMap {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Drop every record.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.store.set(&self.storage_key, "{}")?;
        self.records.clear();
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn apply(
    map: &mut ReviewMap,
    policy: &dyn IntervalPolicy,
    question: &Question,
    content_id: &ContentId,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ScheduleOutcome {
    if !is_correct {
        map.insert(
            content_id.clone(),
            ReviewRecord {
                content_id: content_id.clone(),
                question: question.clone(),
                interval_days: 0,
                success_streak: 0,
                due_at: now,
            },
        );
        return ScheduleOutcome::Lapsed;
    }

    match map.get_mut(content_id) {
        None => ScheduleOutcome::Untracked,
        Some(record) => {
            record.success_streak += 1;
            record.interval_days = policy.next_interval(record.interval_days);
            record.due_at = now + Duration::days(i64::from(record.interval_days));
            record.question = question.clone();
            ScheduleOutcome::Advanced {
                interval_days: record.interval_days,
                due_at: record.due_at,
            }
        }
    }
}

fn load_map<S: KeyValueStore>(store: &S, key: &str) -> ReviewMap {
    match store.get(key) {
        Ok(raw) => parse_map(raw.as_deref()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read review store, starting empty");
            ReviewMap::new()
        }
    }
}

fn parse_map(raw: Option<&str>) -> ReviewMap {
    let Some(raw) = raw else {
        return ReviewMap::new();
    };
    match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "review store payload is corrupt, starting empty");
            ReviewMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::doubling::Doubling;
    use crate::algorithm::ladder::Ladder;
    use crate::types::DEFAULT_STORAGE_KEY;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn scheduler(store: MemoryStore) -> Scheduler<MemoryStore> {
        Scheduler::open(store, Box::new(Ladder::default()), DEFAULT_STORAGE_KEY)
    }

    fn question(prompt: &str) -> Question {
        Question::boolean(1, prompt, true, "")
    }

    #[test]
    fn correct_on_first_sight_creates_nothing() {
        let mut s = scheduler(MemoryStore::new());
        let outcome = s.record_result(&question("A"), true, now()).unwrap();
        assert_eq!(outcome, ScheduleOutcome::Untracked);
        assert!(s.is_empty());
    }

    #[test]
    fn failure_creates_immediately_due_record() {
        let mut s = scheduler(MemoryStore::new());
        let q = question("A");
        assert_eq!(s.record_result(&q, false, now()).unwrap(), ScheduleOutcome::Lapsed);

        let record = s.get(&q.content_id()).unwrap();
        assert_eq!(record.interval_days, 0);
        assert_eq!(record.success_streak, 0);
        assert!(record.due_at <= now());
        assert_eq!(s.due_count(now()), 1);
    }

    #[test]
    fn success_climbs_ladder_then_failure_resets() {
        let mut s = scheduler(MemoryStore::new());
        let q = question("A");
        s.record_result(&q, false, now()).unwrap();

        let outcome = s.record_result(&q, true, now()).unwrap();
        assert_eq!(
            outcome,
            ScheduleOutcome::Advanced {
                interval_days: 1,
                due_at: now() + Duration::days(1),
            }
        );
        assert_eq!(s.due_count(now()), 0);

        s.record_result(&q, true, now()).unwrap();
        let record = s.get(&q.content_id()).unwrap();
        assert_eq!(record.interval_days, 3);
        assert_eq!(record.success_streak, 2);

        s.record_result(&q, false, now()).unwrap();
        let record = s.get(&q.content_id()).unwrap();
        assert_eq!(record.interval_days, 0);
        assert_eq!(record.success_streak, 0);
        assert_eq!(record.due_at, now());
    }

    #[test]
    fn doubling_policy_is_pluggable() {
        let mut s = Scheduler::open(MemoryStore::new(), Box::new(Doubling::default()), "k");
        let q = question("A");
        s.record_result(&q, false, now()).unwrap();
        s.record_result(&q, true, now()).unwrap();
        s.record_result(&q, true, now()).unwrap();
        assert_eq!(s.get(&q.content_id()).unwrap().interval_days, 2);
        assert_eq!(s.policy_name(), "doubling");
    }

    #[test]
    fn map_survives_reopen() {
        let store = MemoryStore::new();
        let mut s = scheduler(store.clone());
        s.record_result(&question("A"), false, now()).unwrap();
        drop(s);

        let reopened = scheduler(store);
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get(&ContentId::of("A")).is_some());
    }

    #[test]
    fn corrupt_payload_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let mut s = scheduler(store.clone());
        assert!(s.is_empty());
        assert_eq!(s.due_count(now()), 0);

        s.record_result(&question("A"), false, now()).unwrap();
        assert_eq!(scheduler(store).len(), 1);
    }

    #[test]
    fn writes_from_two_handles_are_not_lost() {
        let store = MemoryStore::new();
        let mut first = scheduler(store.clone());
        let mut second = scheduler(store.clone());

        first.record_result(&question("A"), false, now()).unwrap();
        second.record_result(&question("B"), false, now()).unwrap();

        assert_eq!(second.len(), 2);
        first.refresh();
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn due_set_grows_with_clock() {
        let mut s = scheduler(MemoryStore::new());
        let a = question("A");
        let b = question("B");
        s.record_result(&a, false, now()).unwrap();
        s.record_result(&b, false, now()).unwrap();
        s.record_result(&b, true, now()).unwrap();

        let mut previous = 0;
        for days in 0..5 {
            let count = s.due_count(now() + Duration::days(days));
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(s.due_count(now()), 1);
        assert_eq!(s.due_count(now() + Duration::days(1)), 2);
    }

    #[test]
    fn review_batch_reassigns_ids() {
        let mut s = scheduler(MemoryStore::new());
        for prompt in ["A", "B", "C"] {
            let mut q = question(prompt);
            q.id = 40;
            s.record_result(&q, false, now()).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(7);
        let batch = s.build_review_batch(now(), &mut rng);

        let ids: Vec<u32> = batch.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let mut prompts: Vec<&str> = batch.iter().map(|q| q.prompt.as_str()).collect();
        prompts.sort();
        assert_eq!(prompts, vec!["A", "B", "C"]);
    }

    #[test]
    fn review_batch_empty_when_nothing_due() {
        let s = scheduler(MemoryStore::new());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(s.build_review_batch(now(), &mut rng).is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemoryStore::new();
        let mut s = scheduler(store.clone());
        s.record_result(&question("A"), false, now()).unwrap();
        s.clear().unwrap();
        assert!(s.is_empty());
        assert!(scheduler(store).is_empty());
    }
}
