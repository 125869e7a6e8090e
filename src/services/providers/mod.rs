//! Completion provider abstraction
//!
//! The recommendation pipeline only needs "prompt pair in, raw text out". Keeping
//! the provider behind this trait lets tests swap in a deterministic stub and
//! keeps HTTP details of any particular LLM vendor out of the services.

use crate::{error::AppError, services::prompt::PromptPair};

pub mod chat_completions;

pub use chat_completions::ChatCompletionsProvider;

/// Failures reported by a completion provider
///
/// The payload is diagnostic detail for logs. It is not forwarded to clients.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("provider request failed: {0}")]
    Upstream(String),

    #[error("unexpected provider failure: {0}")]
    Unexpected(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(_) => AppError::ServiceUnavailable(
                "LLM provider is not configured.".to_string(),
            ),
            ProviderError::RateLimited(_) => AppError::RateLimited(
                "Rate limit exceeded with the LLM provider. Please try again later.".to_string(),
            ),
            ProviderError::Upstream(_) => {
                AppError::Upstream("An error occurred with the LLM provider.".to_string())
            }
            ProviderError::Unexpected(_) => {
                AppError::Internal("An unexpected server error occurred.".to_string())
            }
        }
    }
}

/// A chat-completion style LLM that can answer with a JSON object
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the prompt pair and returns the raw message content
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        assert!(matches!(
            AppError::from(ProviderError::NotConfigured("no key".into())),
            AppError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(ProviderError::RateLimited("429".into())),
            AppError::RateLimited(_)
        ));
        assert!(matches!(
            AppError::from(ProviderError::Upstream("500".into())),
            AppError::Upstream(_)
        ));
        assert!(matches!(
            AppError::from(ProviderError::Unexpected("panic".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_provider_detail_is_not_exposed() {
        let err = AppError::from(ProviderError::Upstream(
            "status 500: {\"error\": \"internal stack trace\"}".into(),
        ));
        assert!(!err.message().contains("stack trace"));
    }
}
