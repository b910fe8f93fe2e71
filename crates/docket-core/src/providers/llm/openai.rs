use super::{LlmClient, LlmResponse};
use crate::errors::TriageError;
use async_trait::async_trait;
use serde_json::json;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClient {
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            temperature: 0.1,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<LlmResponse, TriageError> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({ "role": "system", "content": sys }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &detail));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TriageError::malformed_response(format!("invalid JSON body: {}", e)))?;

        let text = payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TriageError::malformed_response("response missing message content"))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: self.provider_name().to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

fn map_transport_error(e: reqwest::Error) -> TriageError {
    if e.is_timeout() {
        TriageError::timeout(format!("request timed out: {}", e))
    } else {
        TriageError::unavailable(format!("transport failure: {}", e))
    }
}

fn map_status_error(status: reqwest::StatusCode, detail: &str) -> TriageError {
    match status.as_u16() {
        429 => TriageError::rate_limited(format!("HTTP 429: {}", detail)),
        408 | 504 => TriageError::timeout(format!("HTTP {}: {}", status.as_u16(), detail)),
        500..=599 => TriageError::unavailable(format!("HTTP {}: {}", status.as_u16(), detail)),
        _ => TriageError::unavailable(format!("HTTP {}: {}", status.as_u16(), detail)),
    }
}
