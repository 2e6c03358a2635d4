//! Error types for Study Buddy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "All {attempts} model candidates failed to respond. Please check your network or access token. Last failure: {last_failure}"
    )]
    ProvidersExhausted {
        attempts: usize,
        last_failure: String,
        failures: Vec<(String, String)>,
    },

    #[error("Invalid response format from AI ({reason}): {excerpt}")]
    MalformedResponse { reason: String, excerpt: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudyError {
    pub fn code(&self) -> i32 {
        match self {
            StudyError::Configuration(_) => -32000,
            StudyError::InvalidInput(_) => -32602,
            StudyError::ProvidersExhausted { .. } => -32001,
            StudyError::MalformedResponse { .. } => -32002,
            StudyError::Io(_) => -32006,
            StudyError::Json(_) => -32700,
        }
    }

    /// Process exit status a front end should use for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StudyError::Configuration(_) => 78,
            StudyError::InvalidInput(_) => 64,
            StudyError::ProvidersExhausted { .. } => 70,
            StudyError::MalformedResponse { .. } => 65,
            StudyError::Io(_) | StudyError::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_names_failure_class() {
        let err = StudyError::ProvidersExhausted {
            attempts: 3,
            last_failure: "HTTP 401".to_string(),
            failures: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("All 3 model candidates"));
        assert!(msg.contains("network or access token"));
        assert_eq!(err.exit_code(), 70);
    }

    #[test]
    fn test_codes_are_distinct() {
        let a = StudyError::Configuration("x".into()).code();
        let b = StudyError::MalformedResponse {
            reason: "r".into(),
            excerpt: "e".into(),
        }
        .code();
        assert_ne!(a, b);
    }
}
