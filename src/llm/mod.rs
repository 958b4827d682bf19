//! Language model collaborator client.
//!
//! The reasoning loop and the query-generation step both talk to an
//! OpenRouter-compatible chat-completions endpoint. The client is behind
//! the [`LlmClient`] trait so tests can substitute a deterministic stub.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::AgentError;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// A client for the external generative-text collaborator.
///
/// `complete` takes a system instruction and a user prompt and returns the
/// model's text reply. Errors mean the collaborator itself was unreachable
/// or returned garbage, which is fatal to the current request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Production client for an OpenRouter-compatible endpoint.
///
/// A semaphore caps the number of simultaneous outstanding calls so a burst
/// of requests cannot overwhelm the collaborator; the per-call timeout is
/// enforced by the underlying HTTP client.
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    permits: Arc<Semaphore>,
}

impl OpenRouterClient {
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
        max_concurrency: usize,
    ) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AgentError::Upstream("client shutting down".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(OPENROUTER_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Upstream("model call timed out".to_string())
                } else {
                    AgentError::Upstream(format!("model call failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Upstream(format!(
                "model endpoint returned {}: {}",
                status,
                truncate(&body, 300)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Upstream(format!("malformed model response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AgentError::Upstream("model returned no content".to_string()))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut idx = max;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    &s[..idx]
}
