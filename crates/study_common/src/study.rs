//! Caller-facing study operations.
//!
//! Each operation builds a prompt, acquires a completion through the model
//! fallback chain and extracts the JSON payload from it.

use crate::error::StudyError;
use crate::extract::extract_structured;
use crate::llm_client::{CompletionTransport, ResponseAcquirer};
use crate::prompts::{self, Difficulty, SummaryMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explanation result with the request echoed back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub topic: String,
    pub difficulty: Difficulty,
    pub content: Value,
}

pub struct StudyAssistant<T: CompletionTransport> {
    acquirer: ResponseAcquirer<T>,
}

impl<T: CompletionTransport> StudyAssistant<T> {
    pub fn new(acquirer: ResponseAcquirer<T>) -> Self {
        Self { acquirer }
    }

    pub fn acquirer(&self) -> &ResponseAcquirer<T> {
        &self.acquirer
    }

    pub async fn explain(&self, topic: &str, difficulty: Difficulty) -> Result<Explanation, StudyError> {
        let topic = require_text("topic", topic)?;
        let content = self.ask(&prompts::explain_prompt(topic, difficulty)).await?;

        Ok(Explanation {
            topic: topic.to_string(),
            difficulty,
            content,
        })
    }

    pub async fn summarize(&self, content: &str, mode: SummaryMode) -> Result<Value, StudyError> {
        let content = require_text("content", content)?;
        self.ask(&prompts::summarize_prompt(content, mode)).await
    }

    pub async fn generate_quiz(&self, topic: &str) -> Result<Value, StudyError> {
        let topic = require_text("topic", topic)?;
        self.ask(&prompts::quiz_prompt(topic)).await
    }

    pub async fn generate_flashcards(&self, topic: &str) -> Result<Value, StudyError> {
        let topic = require_text("topic", topic)?;
        self.ask(&prompts::flashcards_prompt(topic)).await
    }

    async fn ask(&self, prompt: &str) -> Result<Value, StudyError> {
        let text = self.acquirer.acquire_completion(prompt).await?;
        extract_structured(&text)
    }
}

fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, StudyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StudyError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}
