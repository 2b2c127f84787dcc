//! Content sources and raw generator payloads for tests.

#![allow(dead_code)]

use std::sync::Mutex;

use quiz_core::GenerationRequest;
use quizgen_desktop::{ContentSource, GeneratedBatch, SourceError};
use serde_json::{json, Value};
use tokio::sync::Notify;

/// Source returning a canned batch and remembering the last request.
pub struct FakeSource {
    batch: GeneratedBatch,
    topics: Vec<String>,
    pub last_request: Mutex<Option<GenerationRequest>>,
}

impl FakeSource {
    pub fn new(questions: Vec<Value>) -> Self {
        Self::with_concepts(questions, Vec::new())
    }

    pub fn with_concepts(questions: Vec<Value>, concepts: Vec<Value>) -> Self {
        Self {
            batch: GeneratedBatch { questions, concepts },
            topics: Vec::new(),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl ContentSource for FakeSource {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedBatch, SourceError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.batch.clone())
    }

    async fn scan_topics(&self, _source_text: &str) -> Result<Vec<String>, SourceError> {
        Ok(self.topics.clone())
    }
}

/// Source whose every call fails.
pub struct FailingSource(pub &'static str);

impl ContentSource for FailingSource {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedBatch, SourceError> {
        Err(SourceError::Provider(self.0.to_string()))
    }

    async fn scan_topics(&self, _source_text: &str) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Extraction(self.0.to_string()))
    }
}

/// Source that holds every call open until released.
pub struct GatedSource {
    pub release: Notify,
    pub release_scan: Notify,
    batch: GeneratedBatch,
    topics: Vec<String>,
}

impl GatedSource {
    pub fn new(questions: Vec<Value>) -> Self {
        Self {
            release: Notify::new(),
            release_scan: Notify::new(),
            batch: GeneratedBatch {
                questions,
                concepts: Vec::new(),
            },
            topics: vec!["Ownership".to_string(), "Traits".to_string()],
        }
    }
}

impl ContentSource for GatedSource {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedBatch, SourceError> {
        self.release.notified().await;
        Ok(self.batch.clone())
    }

    async fn scan_topics(&self, _source_text: &str) -> Result<Vec<String>, SourceError> {
        self.release_scan.notified().await;
        Ok(self.topics.clone())
    }
}

/// Source whose calls never complete.
pub struct StalledSource;

impl ContentSource for StalledSource {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedBatch, SourceError> {
        std::future::pending().await
    }

    async fn scan_topics(&self, _source_text: &str) -> Result<Vec<String>, SourceError> {
        std::future::pending().await
    }
}

/// Three boolean questions: A is true, B is false, C is true.
pub fn three_booleans() -> Vec<Value> {
    vec![
        json!({"type": "BOOLEAN", "question": "A", "correctAnswer": true, "explanation": "A holds."}),
        json!({"type": "BOOLEAN", "question": "B", "correctAnswer": false, "explanation": "B does not."}),
        json!({"type": "BOOLEAN", "question": "C", "correctAnswer": true, "explanation": "C holds."}),
    ]
}

pub fn ordering_steps() -> Vec<Value> {
    vec![json!({
        "type": "ORDERING",
        "question": "Order the steps",
        "options": ["Step2", "Step1", "Step3"],
        "correctOrder": ["Step1", "Step2", "Step3"],
        "explanation": "Numeric order."
    })]
}

/// Loosely shaped records as a hosted model might return them.
pub fn messy_batch() -> Vec<Value> {
    vec![
        json!({"questionType": "True/False", "prompt": "Rust has a GC", "answer": "False"}),
        json!({"kind": "mcq", "text": "Capital of France?", "choices": ["Paris", "Rome"], "correctAnswerString": "Paris"}),
        json!({"type": "ranking", "question": "Sort", "options": ["b", "a"]}),
    ]
}

pub fn concepts() -> Vec<Value> {
    vec![json!({"concept": "Ownership", "summary": "Each value has one owner."})]
}
