mod prompt;

use crate::config::TriageConfig;
use crate::errors::TriageError;
use crate::model::{CaseSubmission, ClassificationResult};
use crate::parse::parse_classification;
use crate::providers::llm::{LlmClient, LlmResponse};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Adapter around the external legal-reasoning service. Exactly one outbound
/// call per submission in the common path; timeouts and rate limits are
/// retried with exponential backoff, everything else surfaces immediately.
/// Outbound concurrency is bounded by a shared semaphore so a slow call
/// never stalls unrelated submissions beyond the configured quota.
#[derive(Clone)]
pub struct Classifier {
    client: Arc<dyn LlmClient>,
    limiter: Arc<Semaphore>,
    max_attempts: u32,
    backoff_base: Duration,
    request_timeout: Duration,
    neutral_confidence: f64,
}

impl Classifier {
    pub fn new(client: Arc<dyn LlmClient>, config: &TriageConfig) -> Self {
        Self {
            client,
            limiter: Arc::new(Semaphore::new(config.max_concurrent_calls)),
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            neutral_confidence: config.neutral_confidence,
        }
    }

    pub async fn classify(
        &self,
        submission: &CaseSubmission,
    ) -> Result<ClassificationResult, TriageError> {
        let user_prompt = prompt::build_prompt(submission);
        let resp = self.call_with_retry(&user_prompt).await?;
        debug!(
            case_id = %submission.case_id,
            provider = resp.provider.as_str(),
            "classification response received"
        );
        parse_classification(&resp.text, self.neutral_confidence)
    }

    async fn call_with_retry(&self, user_prompt: &str) -> Result<LlmResponse, TriageError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| TriageError::unavailable("classifier limiter closed"))?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let fut = self.client.complete(user_prompt, Some(prompt::SYSTEM_PROMPT));
            let result = match timeout(self.request_timeout, fut).await {
                Ok(r) => r,
                Err(_) => Err(TriageError::timeout(format!(
                    "request exceeded {}s deadline",
                    self.request_timeout.as_secs()
                ))),
            };

            match result {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_base * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "classification call failed, backing off"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    return Err(if e.is_retryable() {
                        e.mark_retries_exhausted()
                    } else {
                        e
                    });
                }
            }
        }
    }
}
