//! LLM client: OpenAI-compatible chat completions over HTTP.
//!
//! Used by: topic estimation, `!ask`/`!chat`, welcome messages (Groq) and
//! thread summaries (Perplexity).
//! No retry: a failed call is reported once and the caller decides the fallback.
//! Timeout: per endpoint, enforced by the HTTP client for the whole call.

use std::time::Duration;

use serde::Deserialize;

use crate::config::LlmEndpoint;
use crate::provider::{ChatTurn, CompletionClient};
use crate::{BotError, BotResult};

/// Request shape differs slightly per vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Perplexity,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Perplexity => "perplexity",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionClient {
    kind: ProviderKind,
    endpoint: LlmEndpoint,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(kind: ProviderKind, endpoint: LlmEndpoint, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint,
            api_key: api_key.into(),
        }
    }

    pub fn groq(endpoint: LlmEndpoint, api_key: impl Into<String>) -> Self {
        Self::new(ProviderKind::Groq, endpoint, api_key)
    }

    pub fn perplexity(endpoint: LlmEndpoint, api_key: impl Into<String>) -> Self {
        Self::new(ProviderKind::Perplexity, endpoint, api_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    fn request_body(&self, turns: &[ChatTurn]) -> serde_json::Value {
        match self.kind {
            ProviderKind::Groq => serde_json::json!({
                "model": self.endpoint.model,
                "messages": turns,
                "temperature": 1,
                "max_completion_tokens": 8192,
                "top_p": 1,
                "reasoning_effort": "medium",
                "stream": false,
                "stop": null,
            }),
            ProviderKind::Perplexity => serde_json::json!({
                "model": self.endpoint.model,
                "messages": turns,
                "max_tokens": 4096,
                "temperature": 0.2,
                "top_p": 0.9,
                "return_citations": false,
                "search_domain_filter": ["perplexity.ai"],
                "return_images": false,
                "return_related_questions": false,
                "search_recency_filter": "month",
                "top_k": 0,
                "stream": false,
                "presence_penalty": 0,
                "frequency_penalty": 1,
            }),
        }
    }
}

fn first_choice_content(response: CompletionResponse) -> BotResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BotError::Provider("Completion response has no choices[0].message.content".into()))
}

impl CompletionClient for ChatCompletionClient {
    fn id(&self) -> &str {
        self.kind.as_str()
    }

    fn complete(&self, turns: &[ChatTurn]) -> BotResult<String> {
        tracing::info!(
            provider = self.kind.as_str(),
            model = %self.endpoint.model,
            turns = turns.len(),
            "LLM call starting"
        );

        let body = self.request_body(turns);
        let mut response = ureq::post(&self.endpoint.url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .config()
            .timeout_global(Some(self.timeout()))
            .build()
            .send_json(&body)
            .map_err(|e| BotError::Provider(format!("{} request failed: {}", self.kind.as_str(), e)))?;

        let parsed: CompletionResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| BotError::Provider(format!("{} response malformed: {}", self.kind.as_str(), e)))?;

        let content = first_choice_content(parsed)?;
        tracing::debug!(provider = self.kind.as_str(), len = content.len(), "LLM call complete");
        Ok(content)
    }
}
