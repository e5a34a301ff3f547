//! Resilient wrapper around a single generation call.

use crate::{RetryPolicy, backoff_delay, effective_delay};
use fabula_core::GenerateRequest;
use fabula_error::{GenerationError, GenerationErrorKind, RetryError, RetryErrorKind};
use fabula_interface::TextGenerator;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Executes prompts against a [`TextGenerator`] with retry and backoff.
///
/// Each call is independent: attempt counters and delays live only for the
/// duration of [`execute`](Self::execute). A response without extractable
/// text is retried exactly like a transport fault.
#[derive(Debug, Clone)]
pub struct ResilientCaller<G: TextGenerator> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> ResilientCaller<G> {
    /// Wrap a generator with the given policy.
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a prompt using the configured policy.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](Self::execute_with).
    pub async fn execute(&self, prompt: &str) -> Result<String, RetryError> {
        self.execute_with(prompt, self.policy.max_attempts, self.policy.initial_delay)
            .await
    }

    /// Execute a prompt with an explicit attempt budget and initial delay.
    ///
    /// Makes at most `max_attempts` remote calls (at least one). Between
    /// failed attempts it sleeps `initial_delay * 2^k`, or the service's
    /// suggested delay when that is longer. No sleep follows the final
    /// attempt.
    ///
    /// # Errors
    ///
    /// - [`RetryErrorKind::EmptyPrompt`] if `prompt` is blank; nothing is sent.
    /// - [`RetryErrorKind::Permanent`] if the policy marks the status fatal.
    /// - [`RetryErrorKind::Exhausted`] carrying the last failure once the
    ///   budget is spent.
    #[instrument(
        skip(self, prompt),
        fields(
            provider = self.generator.provider_name(),
            model = self.generator.model_name(),
            prompt_length = prompt.len(),
        )
    )]
    pub async fn execute_with(
        &self,
        prompt: &str,
        max_attempts: u32,
        initial_delay: Duration,
    ) -> Result<String, RetryError> {
        if prompt.trim().is_empty() {
            return Err(RetryError::new(RetryErrorKind::EmptyPrompt));
        }

        let max_attempts = max_attempts.max(1);
        let request = GenerateRequest::new(prompt);
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.generator.generate(&request).await {
                Ok(response) => match response.text() {
                    Some(text) => {
                        if attempt > 0 {
                            info!(attempt = attempt + 1, "Generation succeeded after retry");
                        }
                        debug!(length = text.len(), "Generation succeeded");
                        return Ok(text);
                    }
                    None => GenerationError::new(GenerationErrorKind::EmptyResponse),
                },
                Err(e) => e,
            };

            if !failure.is_retryable(&self.policy.fatal_statuses) {
                error!(error = %failure, "Permanent generation error, failing immediately");
                return Err(RetryError::new(RetryErrorKind::Permanent(failure)));
            }

            attempt += 1;
            if attempt >= max_attempts {
                error!(
                    attempts = attempt,
                    error = %failure,
                    "Generation failed after all retry attempts"
                );
                return Err(RetryError::new(RetryErrorKind::Exhausted {
                    attempts: attempt,
                    last: failure,
                }));
            }

            let delay = effective_delay(
                backoff_delay(initial_delay, attempt - 1),
                failure.retry_after(),
            );
            warn!(
                attempt,
                max_attempts,
                delay_ms = millis_for_log(delay),
                error = %failure,
                "Generation failed, will retry"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Whole milliseconds for log fields, saturating for the capped backoff.
fn millis_for_log(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
