//! Tests for ordered model fallback.

use study_common::config::LlmConfig;
use study_common::llm_client::{CandidateFailure, CandidateOutcome, FakeTransport, ResponseAcquirer};
use study_common::StudyError;

fn config(models: &[&str]) -> LlmConfig {
    LlmConfig {
        models: models.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    }
}

fn failed(failure: CandidateFailure) -> CandidateOutcome {
    CandidateOutcome::Failed(failure)
}

#[tokio::test]
async fn test_fallback_stops_at_first_success() {
    let transport = FakeTransport::new(vec![
        failed(CandidateFailure::Transport("connection refused".into())),
        failed(CandidateFailure::HttpStatus {
            status: 500,
            body: "boom".into(),
        }),
        CandidateOutcome::Completed("{\"winner\": 3}".into()),
        CandidateOutcome::Completed("{\"winner\": 4}".into()),
    ]);
    let acquirer = ResponseAcquirer::new(transport, &config(&["m1", "m2", "m3", "m4", "m5"])).unwrap();

    let text = acquirer.acquire_completion("prompt").await.unwrap();

    assert_eq!(text, "{\"winner\": 3}");
    assert_eq!(acquirer.transport().call_count(), 3);
    assert_eq!(acquirer.transport().requested_models(), vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn test_empty_content_advances_to_next_candidate() {
    let transport = FakeTransport::new(vec![
        failed(CandidateFailure::EmptyContent),
        CandidateOutcome::Completed("   ".into()),
        CandidateOutcome::Completed("[1]".into()),
    ]);
    let acquirer = ResponseAcquirer::new(transport, &config(&["a", "b", "c"])).unwrap();

    assert_eq!(acquirer.acquire_completion("p").await.unwrap(), "[1]");
    assert_eq!(acquirer.transport().requested_models(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_total_exhaustion_tries_every_candidate_once() {
    let transport = FakeTransport::always_failing(CandidateFailure::HttpStatus {
        status: 401,
        body: "bad credentials".into(),
    });
    let acquirer = ResponseAcquirer::new(transport, &config(&["gpt-4o", "gpt-4o-mini", "phi"])).unwrap();

    let err = acquirer.acquire_completion("p").await.unwrap_err();

    assert_eq!(acquirer.transport().call_count(), 3);
    assert_eq!(
        acquirer.transport().requested_models(),
        vec!["gpt-4o", "gpt-4o-mini", "phi"]
    );
    match err {
        StudyError::ProvidersExhausted { attempts, failures, .. } => {
            assert_eq!(attempts, 3);
            assert_eq!(failures.len(), 3);
        }
        other => panic!("Expected ProvidersExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_every_request_carries_prompt_and_sampling() {
    let transport = FakeTransport::new(vec![
        failed(CandidateFailure::InvalidBody("eof".into())),
        CandidateOutcome::Completed("{}".into()),
    ]);
    let mut cfg = config(&["x", "y"]);
    cfg.max_tokens = 256;
    let acquirer = ResponseAcquirer::new(transport, &cfg).unwrap();

    acquirer.acquire_completion("Explain tides").await.unwrap();

    for request in acquirer.transport().requests() {
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "Explain tides");
        assert_eq!(request.max_tokens, 256);
    }
}

#[test]
fn test_missing_token_fails_before_any_call() {
    let cfg = LlmConfig {
        api_key: None,
        api_key_env: "STUDY_BUDDY_ACQUISITION_TEST_UNSET".to_string(),
        ..Default::default()
    };
    match ResponseAcquirer::from_config(&cfg) {
        Err(StudyError::Configuration(msg)) => assert!(msg.contains("access token missing")),
        Err(other) => panic!("Expected Configuration, got {:?}", other),
        Ok(_) => panic!("Expected Configuration error"),
    }
}
