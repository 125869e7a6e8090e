//! OpenAI-compatible chat-completions provider
//!
//! Talks to any endpoint that implements `POST {base}/chat/completions` with
//! bearer auth and `response_format: {"type": "json_object"}`. Groq is the
//! default deployment target.

use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    config::Config,
    services::{
        prompt::PromptPair,
        providers::{CompletionProvider, ProviderError},
    },
};

/// Longest provider error body kept in logs
const MAX_LOGGED_BODY: usize = 512;

#[derive(Clone)]
pub struct ChatCompletionsProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
            temperature,
        })
    }

    /// Builds the provider from configuration
    ///
    /// Returns `None` (and logs why) when no API key is set or the HTTP client
    /// cannot be created. Recommendations are then reported as unavailable.
    pub fn from_config(config: &Config) -> Option<Self> {
        let Some(api_key) = config.api_key() else {
            tracing::warn!("GROQ_API_KEY not set, LLM recommendations are disabled");
            return None;
        };

        match Self::new(
            api_key,
            &config.llm_api_url,
            &config.model_name,
            config.max_tokens,
            config.temperature,
            Duration::from_secs(config.llm_timeout_secs),
        ) {
            Ok(provider) => {
                tracing::info!(
                    model = %config.model_name,
                    api_url = %config.llm_api_url,
                    max_tokens = config.max_tokens,
                    temperature = config.temperature,
                    "LLM provider configured"
                );
                Some(provider)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize LLM HTTP client");
                None
            }
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a PromptPair) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }
}

/// Maps a non-success HTTP status to a provider error
fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
    let detail = format!("status {}: {}", status, body);

    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(detail),
        _ => ProviderError::Upstream(detail),
    }
}

/// Pulls the first choice's message content out of a completion response body
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Upstream(format!("invalid completion envelope: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Upstream("completion contained no choices".to_string()))
        .map(|choice| choice.message.content.unwrap_or_default())
}

#[async_trait::async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Upstream(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let content = extract_content(&body)?;

        tracing::debug!(
            provider = self.name(),
            model = %self.model,
            content_len = content.len(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "chat_completions"
    }
}
