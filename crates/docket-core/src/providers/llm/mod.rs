pub mod fake;
pub mod openai;

use crate::errors::TriageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use fake::FakeClient;
pub use openai::OpenAiClient;

/// Raw response from the external legal-reasoning service. The text is
/// best-effort and occasionally malformed; parsing happens downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Seam for the external classification service. Implementations hold no
/// mutable state across calls, so repeated calls with the same content are
/// safe to retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, system: Option<&str>)
        -> Result<LlmResponse, TriageError>;

    fn provider_name(&self) -> &'static str;
}
