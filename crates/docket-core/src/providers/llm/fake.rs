use super::{LlmClient, LlmResponse};
use crate::errors::TriageError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type ScriptedCall = Result<String, TriageError>;

/// Scriptable stand-in for the external service. Each call pops the next
/// scripted outcome; once the script is empty the fixed response (default
/// "{}") is returned forever.
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
    script: Mutex<VecDeque<ScriptedCall>>,
    calls: AtomicUsize,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fixed_response: None,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Queue an outcome for the next call; later calls fall through to the
    /// fixed response.
    pub fn push_ok(self, response: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(response.into()));
        self
    }

    pub fn push_err(self, err: TriageError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        _prompt: &str,
        _system: Option<&str>,
    ) -> Result<LlmResponse, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next.map(|text| LlmResponse {
                text,
                provider: "fake".to_string(),
                model: self.model.clone(),
            });
        }
        let text = self.fixed_response.clone().unwrap_or_else(|| "{}".to_string());
        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
