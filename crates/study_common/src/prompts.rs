//! Prompt templates for the study operations.
//!
//! Each template spells out the exact JSON shape expected back. The shapes
//! match the typed views in `models`.

use crate::error::StudyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest content (in characters) sent for summarization
pub const SUMMARY_CONTENT_LIMIT: usize = 5000;

/// How deep an explanation goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Simple analogies and basics
    Easy,
    /// Detailed and academic
    #[default]
    Medium,
    /// In-depth and technical
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "very-easy" | "basic" => Ok(Difficulty::Easy),
            "medium" | "college" => Ok(Difficulty::Medium),
            "hard" | "technical" => Ok(Difficulty::Hard),
            other => Err(StudyError::InvalidInput(format!(
                "Invalid difficulty: '{}'. Valid values: easy, medium, hard",
                other
            ))),
        }
    }
}

/// What a summary is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Revision,
    Exam,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Revision => "revision",
            SummaryMode::Exam => "exam",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revision" => Ok(SummaryMode::Revision),
            "exam" => Ok(SummaryMode::Exam),
            other => Err(StudyError::InvalidInput(format!(
                "Invalid summary mode: '{}'. Valid values: revision, exam",
                other
            ))),
        }
    }
}

pub fn explain_prompt(topic: &str, difficulty: Difficulty) -> String {
    format!(
        r#"Explain "{}" for {} level. Return ONLY valid JSON:
{{
  "summary": "detailed explanation",
  "keyPoints": ["point 1", "point 2", "point 3"],
  "analogy": "helpful analogy",
  "example": "real example"
}}"#,
        topic, difficulty
    )
}

pub fn summarize_prompt(content: &str, mode: SummaryMode) -> String {
    format!(
        r#"Summarize for {}: "{}"
Return ONLY valid JSON:
{{
  "summary": ["point 1", "point 2"],
  "keyDefinitions": [{{"term": "T", "definition": "D"}}],
  "formulas": ["formula if any"],
  "examTips": ["tip if any"]
}}"#,
        mode,
        truncate_chars(content, SUMMARY_CONTENT_LIMIT)
    )
}

pub fn quiz_prompt(topic: &str) -> String {
    format!(
        r#"Create 5-question quiz on "{}". Return ONLY valid JSON array:
[
  {{
    "id": 1,
    "question": "Q text",
    "options": ["A", "B", "C", "D"],
    "correctAnswer": 0,
    "explanation": "why correct"
  }}
]"#,
        topic
    )
}

pub fn flashcards_prompt(topic: &str) -> String {
    format!(
        r#"Create 6 flashcards for "{}". Return ONLY valid JSON array:
[
  {{"id": 1, "front": "question", "back": "answer"}}
]"#,
        topic
    )
}

/// Leading `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
