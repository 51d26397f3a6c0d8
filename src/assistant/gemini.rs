//! Gemini `generateContent` client.

use super::{ChatMessage, ChatRole, CompletionService};
use crate::config::AssistantConfig;
use crate::error::CompletionError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn wire_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

fn build_request<'a>(
    system_instruction: &'a str,
    history: &'a [ChatMessage],
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction,
            }],
        },
        contents: history
            .iter()
            .map(|m| Content {
                role: Some(wire_role(m.role)),
                parts: vec![Part { text: &m.text }],
            })
            .collect(),
    }
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, CompletionError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(CompletionError::EmptyResponse)
    } else {
        Ok(text)
    }
}

pub struct GeminiClient {
    client: Client,
    config: AssistantConfig,
}

impl GeminiClient {
    pub fn new(config: AssistantConfig) -> Result<Self, CompletionError> {
        if config.api_key.trim().is_empty() {
            return Err(CompletionError::NotConfigured);
        }
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Linear backoff; saturates instead of overflowing.
    fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(
            self.config
                .retry_delay_ms
                .saturating_mul(u64::from(attempt) + 1),
        )
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(self.retry_delay(attempt)).await;
    }

    /// Execute a request with retry logic for transient errors.
    /// Does NOT retry on auth errors (401/403) or rate limiting (429).
    async fn execute_with_retry<F, Fut>(
        &self,
        request_fn: F,
    ) -> Result<reqwest::Response, CompletionError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match request_fn().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(CompletionError::AuthFailed);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(CompletionError::RateLimited);
                    }

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status.is_server_error() {
                        tracing::warn!(%status, attempt, "Completion service error");
                        last_error = Some(CompletionError::Api(format!("Server error: {status}")));
                        if attempt < self.config.max_retries {
                            self.backoff(attempt).await;
                            continue;
                        }
                        break;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(CompletionError::Api(format!("HTTP {status}: {body}")));
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(CompletionError::Timeout);
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(CompletionError::Request(e));
                    } else {
                        return Err(CompletionError::Request(e));
                    }
                    tracing::warn!(attempt, "Completion request failed");

                    if attempt < self.config.max_retries {
                        self.backoff(attempt).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CompletionError::Api("Unknown error".to_string())))
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, turns = history.len()))]
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let body = build_request(system_instruction, history);
        let url = self.url();

        let response = self
            .execute_with_retry(|| {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.config.api_key)
                    .json(&body)
                    .send()
            })
            .await?;

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}
