//! LLM Client - ordered model fallback against one completion endpoint
//!
//! Each candidate model gets exactly one request, strictly in list order.
//! A transport error, a non-success status or a reply without text is a
//! `CandidateOutcome::Failed` and moves on to the next model; the first
//! non-empty completion is returned as-is. Only when every candidate has
//! failed does the caller see an error.

use crate::config::LlmConfig;
use crate::error::StudyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// System instruction sent with every prompt
pub const SYSTEM_INSTRUCTION: &str =
    "You represent a helpful study assistant. ALWAYS return purely valid JSON.";

/// Longest error body kept from a failed HTTP response
const ERROR_BODY_CHARS: usize = 300;

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String, // "system", "user", "assistant"
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Why one candidate produced no completion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("unreadable response body: {0}")]
    InvalidBody(String),

    #[error("no content received")]
    EmptyContent,
}

/// Result of asking one candidate model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Completed(String),
    Failed(CandidateFailure),
}

/// One completion attempt against one model
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> CandidateOutcome;
}

/// reqwest-backed transport for an OpenAI-compatible endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    /// Build the transport; a missing or blank credential is a configuration error
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, StudyError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                StudyError::Configuration(
                    "access token missing; set it in the config file or the token environment variable"
                        .to_string(),
                )
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            StudyError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Build from config, resolving the credential from it
    pub fn from_config(config: &LlmConfig) -> Result<Self, StudyError> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            return Err(StudyError::Configuration(format!(
                "access token missing; set llm.api_key or the {} environment variable",
                config.api_key_env
            )));
        }

        Self::new(
            config.endpoint.clone(),
            api_key,
            config.timeout_secs.map(Duration::from_secs),
        )
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> CandidateOutcome {
        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return CandidateOutcome::Failed(CandidateFailure::Transport(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return CandidateOutcome::Failed(CandidateFailure::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => match parsed.first_content() {
                Some(text) => CandidateOutcome::Completed(text),
                None => CandidateOutcome::Failed(CandidateFailure::EmptyContent),
            },
            Err(e) => CandidateOutcome::Failed(CandidateFailure::InvalidBody(e.to_string())),
        }
    }
}

/// Scripted transport for tests: records every model asked, replays outcomes in order
pub struct FakeTransport {
    outcomes: Mutex<Vec<CandidateOutcome>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeTransport {
    /// Replay `outcomes` one per request; the last one repeats
    pub fn new(outcomes: Vec<CandidateOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request succeeds with the same text
    pub fn always(text: &str) -> Self {
        Self::new(vec![CandidateOutcome::Completed(text.to_string())])
    }

    /// Every request fails with the same reason
    pub fn always_failing(failure: CandidateFailure) -> Self {
        Self::new(vec![CandidateOutcome::Failed(failure)])
    }

    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    /// Models requested so far, in order
    pub fn requested_models(&self) -> Vec<String> {
        self.recorded()
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.recorded().clone()
    }

    // A panicking test thread must not hide what was recorded
    fn recorded(&self) -> MutexGuard<'_, Vec<ChatRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CompletionTransport for FakeTransport {
    async fn complete(&self, request: &ChatRequest) -> CandidateOutcome {
        self.recorded().push(request.clone());

        let mut outcomes = self.outcomes.lock().unwrap_or_else(|e| e.into_inner());
        if outcomes.is_empty() {
            return CandidateOutcome::Failed(CandidateFailure::Transport(
                "no scripted response".to_string(),
            ));
        }
        if outcomes.len() == 1 {
            outcomes[0].clone()
        } else {
            outcomes.remove(0)
        }
    }
}

/// Ordered model fallback over a completion transport
pub struct ResponseAcquirer<T: CompletionTransport> {
    transport: T,
    models: Vec<String>,
    temperature: f64,
    max_tokens: u32,
}

impl ResponseAcquirer<HttpTransport> {
    /// Real acquirer; fails immediately when the credential is missing
    pub fn from_config(config: &LlmConfig) -> Result<Self, StudyError> {
        let transport = HttpTransport::from_config(config)?;
        Self::new(transport, config)
    }
}

impl<T: CompletionTransport> ResponseAcquirer<T> {
    pub fn new(transport: T, config: &LlmConfig) -> Result<Self, StudyError> {
        let models: Vec<String> = config
            .models
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if models.is_empty() {
            return Err(StudyError::Configuration(
                "no model candidates configured".to_string(),
            ));
        }

        Ok(Self {
            transport,
            models,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request body for one candidate
    pub fn build_request(&self, model: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(prompt)],
            model: model.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Text of the first candidate that answers
    pub async fn acquire_completion(&self, prompt: &str) -> Result<String, StudyError> {
        let mut failures: Vec<(String, String)> = Vec::new();

        for model in &self.models {
            info!(model = %model, "Trying model");

            let request = self.build_request(model, prompt);
            match self.transport.complete(&request).await {
                CandidateOutcome::Completed(text) if text.trim().is_empty() => {
                    warn!(model = %model, "Model failed: {}", CandidateFailure::EmptyContent);
                    failures.push((model.clone(), CandidateFailure::EmptyContent.to_string()));
                }
                CandidateOutcome::Completed(text) => {
                    info!(model = %model, chars = text.len(), "Model responded");
                    return Ok(text);
                }
                CandidateOutcome::Failed(failure) => {
                    warn!(model = %model, "Model failed: {}", failure);
                    failures.push((model.clone(), failure.to_string()));
                }
            }
        }

        let last_failure = failures
            .last()
            .map(|(model, reason)| format!("{}: {}", model, reason))
            .unwrap_or_default();

        Err(StudyError::ProvidersExhausted {
            attempts: failures.len(),
            last_failure,
            failures,
        })
    }
}
