//! Content source: the collaborator that turns material into raw questions.
//!
//! Implementations wrap text extraction and the hosted model call. Their
//! records are untrusted and go through the normalizer before reaching the
//! session.

use quiz_core::GenerationRequest;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Raw output of one generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedBatch {
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
    #[serde(default)]
    pub concepts: Vec<serde_json::Value>,
}

/// Content source errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{0}")]
    Provider(String),

    #[error("Could not read source material: {0}")]
    Extraction(String),
}

/// Asynchronous generator of quiz content.
pub trait ContentSource: Send + Sync {
    /// Produce a batch of raw question records for the request.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<GeneratedBatch, SourceError>> + Send;

    /// List candidate topics found in the material.
    fn scan_topics(
        &self,
        source_text: &str,
    ) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;
}
