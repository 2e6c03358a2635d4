//! Study Buddy Common - AI study assistant core
//!
//! Acquires completions from an ordered list of candidate models, extracts the
//! JSON payload from free-form model output, and keeps a small activity log of
//! explained topics and quiz results.

pub mod activity_log;
pub mod config;
pub mod error;
pub mod extract;
pub mod kv_store;
pub mod llm_client;
pub mod models;
pub mod prompts;
pub mod quiz;
pub mod stats;
pub mod study;

pub use activity_log::{ActivityKind, ActivityLog, HistoryEntry, QuizScoreEntry};
pub use config::{LlmConfig, StorageConfig, StudyConfig};
pub use error::StudyError;
pub use extract::{extract_as, extract_structured};
pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
pub use llm_client::{
    CandidateFailure, CandidateOutcome, CompletionTransport, FakeTransport, HttpTransport,
    ResponseAcquirer,
};
pub use prompts::{Difficulty, SummaryMode};
pub use quiz::{QuizOutcome, QuizSession};
pub use stats::DashboardStats;
pub use study::{Explanation, StudyAssistant};
