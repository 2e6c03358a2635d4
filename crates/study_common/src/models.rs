//! Typed views over structured results.
//!
//! The study operations return raw JSON values; no schema is enforced while
//! extracting. These types let a front end read those values, and any shape
//! mismatch surfaces here as `StudyError::Json`.

use crate::error::StudyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplanationContent {
    pub summary: String,
    pub key_points: Vec<String>,
    pub analogy: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyDefinition {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryContent {
    pub summary: Vec<String>,
    pub key_definitions: Vec<KeyDefinition>,
    pub formulas: Vec<String>,
    pub exam_tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flashcard {
    pub id: u32,
    pub front: String,
    pub back: String,
}

/// Deserialize a structured result into one of the views above
pub fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, StudyError> {
    Ok(T::deserialize(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explanation_view() {
        let content: ExplanationContent = from_value(&json!({
            "summary": "Plants make sugar",
            "keyPoints": ["light", "water"],
            "analogy": "a kitchen",
        }))
        .unwrap();
        assert_eq!(content.key_points.len(), 2);
        assert_eq!(content.example, "");
    }

    #[test]
    fn test_summary_view() {
        let content: SummaryContent = from_value(&json!({
            "summary": ["one"],
            "keyDefinitions": [{"term": "T", "definition": "D"}],
            "examTips": ["read twice"]
        }))
        .unwrap();
        assert_eq!(content.key_definitions[0].term, "T");
        assert!(content.formulas.is_empty());
    }

    #[test]
    fn test_quiz_view() {
        let questions: Vec<QuizQuestion> = from_value(&json!([{
            "id": 1,
            "question": "2+2?",
            "options": ["3", "4"],
            "correctAnswer": 1,
            "explanation": "arithmetic"
        }]))
        .unwrap();
        assert_eq!(questions[0].correct_answer, 1);
    }

    #[test]
    fn test_shape_mismatch_is_json_error() {
        let err = from_value::<Vec<Flashcard>>(&json!({"front": "not a list"})).unwrap_err();
        assert!(matches!(err, StudyError::Json(_)));
    }
}
