mod test_utils;

use fabula_error::{GenerationErrorKind, RetryErrorKind};
use fabula_retry::{ResilientCaller, RetryPolicy};
use serde_json::json;
use std::time::Duration;
use test_utils::{MockGenerator, MockResponse};
use tokio::time::Instant;

fn policy(max_attempts: u32, initial_ms: u64) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(initial_ms))
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_twice_then_success() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http(429),
        MockResponse::http(429),
        MockResponse::Success("A wind from the south.".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), policy(5, 1000));

    let start = Instant::now();
    let text = caller.execute("Describe the desert wind.").await?;

    assert_eq!(text, "A wind from the south.");
    assert_eq!(mock.call_count(), 3);
    assert_eq!(
        mock.gaps(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_after_max_attempts() {
    let mock = MockGenerator::new_error(MockResponse::http(429));
    let caller = ResilientCaller::new(mock.clone(), policy(3, 1000));

    let err = caller.execute("Name the exiled prince.").await.unwrap_err();

    assert!(err.is_exhausted());
    match &err.kind {
        RetryErrorKind::Exhausted { attempts, last } => {
            assert_eq!(*attempts, 3);
            assert_eq!(last.status_code(), Some(429));
        }
        other => panic!("expected exhaustion, got {other}"),
    }
    assert_eq!(mock.call_count(), 3);
    // No sleep after the final attempt.
    assert_eq!(
        mock.gaps(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_text_is_retried() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::Success(String::new()),
        MockResponse::Body(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
        MockResponse::Body(json!({
            "candidates": [{ "content": { "parts": [{ "text": "The oracle spoke." }] } }]
        })),
    ]);
    let caller = ResilientCaller::new(mock.clone(), policy(5, 100));

    let text = caller.execute("What did the oracle say?").await?;

    assert_eq!(text, "The oracle spoke.");
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_empty_text_exhaustion_reports_empty_response() {
    let mock = MockGenerator::new_error(MockResponse::Success("  \n ".to_string()));
    let caller = ResilientCaller::new(mock.clone(), policy(2, 100));

    let err = caller.execute("Say nothing.").await.unwrap_err();

    assert_eq!(
        err.last_error().map(|e| e.kind.clone()),
        Some(GenerationErrorKind::EmptyResponse)
    );
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_server_hint_lengthens_delay() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http_with_hint(429, Duration::from_secs(17)),
        MockResponse::Success("ok".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), policy(5, 1000));

    caller.execute("prompt").await?;

    assert_eq!(mock.gaps(), vec![Duration::from_secs(17)]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_short_server_hint_does_not_shorten_backoff() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http(503),
        MockResponse::http_with_hint(503, Duration::from_millis(10)),
        MockResponse::Success("ok".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), policy(5, 1000));

    caller.execute("prompt").await?;

    assert_eq!(
        mock.gaps(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_are_retried() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::Error(GenerationErrorKind::Transport("connection reset".to_string())),
        MockResponse::Error(GenerationErrorKind::InvalidResponse("truncated".to_string())),
        MockResponse::Success("ok".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), policy(3, 10));

    assert_eq!(caller.execute("prompt").await?, "ok");
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_retries_client_errors() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http(400),
        MockResponse::Success("ok".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), RetryPolicy::default());

    assert_eq!(caller.execute("prompt").await?, "ok");
    assert_eq!(mock.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_strict_policy_fails_fast_on_fatal_status() {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http(401),
        MockResponse::Success("never reached".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), RetryPolicy::strict());

    let start = Instant::now();
    let err = caller.execute("prompt").await.unwrap_err();

    assert!(matches!(err.kind, RetryErrorKind::Permanent(_)));
    assert!(!err.is_exhausted());
    assert_eq!(mock.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_strict_policy_still_retries_rate_limits() -> anyhow::Result<()> {
    let mock = MockGenerator::new_sequence(vec![
        MockResponse::http(429),
        MockResponse::Success("ok".to_string()),
    ]);
    let caller = ResilientCaller::new(mock.clone(), RetryPolicy::strict());

    assert_eq!(caller.execute("prompt").await?, "ok");
    assert_eq!(mock.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_blank_prompt_is_rejected_without_calls() {
    let mock = MockGenerator::new_error(MockResponse::Success("unused".to_string()));
    let caller = ResilientCaller::new(mock.clone(), RetryPolicy::default());

    let err = caller.execute("   ").await.unwrap_err();

    assert_eq!(err.kind, RetryErrorKind::EmptyPrompt);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_attempts_still_calls_once() {
    let mock = MockGenerator::new_error(MockResponse::http(500));
    let caller = ResilientCaller::new(mock.clone(), RetryPolicy::default());

    let err = caller
        .execute_with("prompt", 0, Duration::from_millis(1))
        .await
        .unwrap_err();

    assert!(err.is_exhausted());
    assert_eq!(mock.call_count(), 1);
}
