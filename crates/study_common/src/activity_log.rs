//! Activity log: recent study actions and quiz results.
//!
//! Both lists live as JSON arrays under fixed keys, newest first, and are
//! read and written whole. A missing or corrupt value reads as an empty list
//! and write failures are logged, never returned: the log must not break the
//! action that produced the entry. Array elements that do not decode are
//! skipped on typed reads but carried through appends untouched.
//! Read-modify-write is not atomic; two writers racing on one store can drop
//! an entry.

use crate::config::{StorageConfig, DEFAULT_HISTORY_LIMIT};
use crate::kv_store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::warn;

pub const HISTORY_KEY: &str = "study_buddy_history";
pub const QUIZ_SCORES_KEY: &str = "study_buddy_quiz_scores";

/// Kind of study action recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    TopicExplained,
    Summary,
    QuizGeneration,
    Flashcards,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::TopicExplained => "Topic Explained",
            ActivityKind::Summary => "Summary",
            ActivityKind::QuizGeneration => "Quiz Generation",
            ActivityKind::Flashcards => "Flashcards",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded study action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Epoch milliseconds, strictly increasing within the list
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub topic: String,
    pub date: DateTime<Utc>,
}

/// A completed quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizScoreEntry {
    pub id: i64,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub date: DateTime<Utc>,
}

impl QuizScoreEntry {
    /// Score as a fraction of total; 0 for an empty quiz
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 / self.total as f64
        }
    }
}

/// Why a stored list could not be read. Logged, then treated as empty.
#[derive(Debug, Error)]
enum StorageReadError {
    #[error("value under {key} is not a valid JSON list: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("skipping entry {index} under {key}: {source}")]
    Entry {
        key: &'static str,
        index: usize,
        source: serde_json::Error,
    },
}

/// Bounded, newest-first activity log over a key-value store
pub struct ActivityLog<S: KeyValueStore> {
    store: S,
    history_limit: usize,
    quiz_score_limit: Option<usize>,
}

impl<S: KeyValueStore> ActivityLog<S> {
    /// Log with the default retention: 50 history entries and 50 quiz scores
    pub fn new(store: S) -> Self {
        Self::with_limits(store, DEFAULT_HISTORY_LIMIT, Some(DEFAULT_HISTORY_LIMIT))
    }

    /// `quiz_score_limit = None` keeps every quiz score
    pub fn with_limits(store: S, history_limit: usize, quiz_score_limit: Option<usize>) -> Self {
        Self {
            store,
            history_limit,
            quiz_score_limit,
        }
    }

    pub fn from_config(store: S, config: &StorageConfig) -> Self {
        Self::with_limits(store, config.history_limit, config.quiz_score_cap())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a study action at the head of the history
    pub fn add_to_history(&self, kind: ActivityKind, topic: &str) -> HistoryEntry {
        let raw = self.read_raw(HISTORY_KEY);

        let entry = HistoryEntry {
            id: next_id(newest_id(&raw)),
            activity_type: kind.label().to_string(),
            topic: topic.to_string(),
            date: Utc::now(),
        };

        self.prepend(HISTORY_KEY, raw, &entry, Some(self.history_limit));
        entry
    }

    /// Record a finished quiz at the head of the score list
    pub fn save_quiz_result(&self, topic: &str, score: u32, total: u32) -> QuizScoreEntry {
        let raw = self.read_raw(QUIZ_SCORES_KEY);

        let entry = QuizScoreEntry {
            id: next_id(newest_id(&raw)),
            topic: topic.to_string(),
            score,
            total,
            date: Utc::now(),
        };

        self.prepend(QUIZ_SCORES_KEY, raw, &entry, self.quiz_score_limit);
        entry
    }

    /// History, newest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.read_list(HISTORY_KEY)
    }

    /// Quiz scores, newest first
    pub fn quiz_scores(&self) -> Vec<QuizScoreEntry> {
        self.read_list(QUIZ_SCORES_KEY)
    }

    /// Empty both lists
    pub fn clear(&self) {
        for key in [HISTORY_KEY, QUIZ_SCORES_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear {}: {}", key, e);
            }
        }
    }

    /// Stored array as untyped elements; empty when missing or corrupt
    fn read_raw(&self, key: &'static str) -> Vec<Value> {
        let raw = match self.store.get(key) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Vec::new(),
        };

        match serde_json::from_str(&raw).map_err(|source| StorageReadError::Corrupt { key, source }) {
            Ok(list) => list,
            Err(e) => {
                warn!("{}; treating as empty", e);
                Vec::new()
            }
        }
    }

    fn read_list<T: DeserializeOwned>(&self, key: &'static str) -> Vec<T> {
        self.read_raw(key)
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(source) => {
                    warn!("{}", StorageReadError::Entry { key, index, source });
                    None
                }
            })
            .collect()
    }

    fn prepend<T: Serialize>(
        &self,
        key: &str,
        mut list: Vec<Value>,
        entry: &T,
        limit: Option<usize>,
    ) {
        let value = match serde_json::to_value(entry) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode {}: {}", key, e);
                return;
            }
        };

        list.insert(0, value);
        if let Some(limit) = limit {
            list.truncate(limit);
        }
        self.write_list(key, &list);
    }

    fn write_list(&self, key: &str, list: &[Value]) {
        let encoded = match serde_json::to_string(list) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(key, &encoded) {
            warn!("Failed to save {}: {}", key, e);
        }
    }
}

/// Id of the head element, if it carries one
fn newest_id(list: &[Value]) -> Option<i64> {
    list.first()?.get("id")?.as_i64()
}

/// Current epoch milliseconds, bumped past the newest existing id
fn next_id(newest: Option<i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match newest {
        Some(id) if id >= now => id + 1,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_store::MemoryStore;

    #[test]
    fn test_activity_labels() {
        assert_eq!(ActivityKind::QuizGeneration.label(), "Quiz Generation");
        assert_eq!(ActivityKind::TopicExplained.to_string(), "Topic Explained");
    }

    #[test]
    fn test_ids_strictly_increase() {
        let log = ActivityLog::new(MemoryStore::new());
        let a = log.add_to_history(ActivityKind::Summary, "a");
        let b = log.add_to_history(ActivityKind::Summary, "b");
        let c = log.add_to_history(ActivityKind::Summary, "c");
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_next_id_bumps_future_ids() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        assert_eq!(next_id(Some(far_future)), far_future + 1);
        assert!(next_id(None) > 0);
    }

    #[test]
    fn test_history_serializes_type_field() {
        let log = ActivityLog::new(MemoryStore::new());
        log.add_to_history(ActivityKind::QuizGeneration, "Photosynthesis");

        let raw = log.store().get(HISTORY_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["type"], "Quiz Generation");
        assert_eq!(value[0]["topic"], "Photosynthesis");
    }

    #[test]
    fn test_blank_value_reads_empty() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "  ").unwrap();
        let log = ActivityLog::new(store);
        assert!(log.history().is_empty());
    }

    #[test]
    fn test_undecodable_entries_survive_append() {
        let store = MemoryStore::new();
        store
            .set(
                HISTORY_KEY,
                r#"[{"id":2,"type":"Summary","topic":"A","date":"2024-06-10T06:13:20Z"},{"id":1,"type":"Summary","topic":"B"}]"#,
            )
            .unwrap();
        let log = ActivityLog::new(store);

        let history = log.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].topic, "A");

        let added = log.add_to_history(ActivityKind::Summary, "C");
        assert!(added.id > 2);

        let raw = log.store().get(HISTORY_KEY).unwrap();
        let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
        let topics: Vec<&str> = stored.iter().filter_map(|v| v["topic"].as_str()).collect();
        assert_eq!(topics, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_undecodable_scores_survive_append() {
        let store = MemoryStore::new();
        store
            .set(QUIZ_SCORES_KEY, r#"[{"id":"x","topic":"Old","score":"3"}]"#)
            .unwrap();
        let log = ActivityLog::new(store);

        assert!(log.quiz_scores().is_empty());
        log.save_quiz_result("New", 4, 5);

        let raw = log.store().get(QUIZ_SCORES_KEY).unwrap();
        let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1]["topic"], "Old");
        assert_eq!(log.quiz_scores().len(), 1);
    }

    #[test]
    fn test_ratio_handles_zero_total() {
        let entry = QuizScoreEntry {
            id: 1,
            topic: "t".into(),
            score: 0,
            total: 0,
            date: Utc::now(),
        };
        assert_eq!(entry.ratio(), 0.0);
    }
}
