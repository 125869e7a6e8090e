use serde_json::Value;
use std::sync::Arc;

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::RecommendationItem,
    services::{
        prompt::PromptPair,
        providers::{CompletionProvider, ProviderError},
    },
};

/// Validated model output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRecommendations {
    /// Items whose product id resolved in the catalog, in model order
    pub items: Vec<RecommendationItem>,
    /// Number of entries in the model's `recommendations` array before validation
    pub raw_count: usize,
}

/// Client for the recommendation model
///
/// Runs one completion per call and validates the answer against the catalog.
/// Without a provider every call fails as `ServiceUnavailable`.
#[derive(Clone)]
pub struct Recommender {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Recommender {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A recommender with no model behind it
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Asks the model for recommendations and validates them against `catalog`
    pub async fn recommend(
        &self,
        prompt: &PromptPair,
        catalog: &Catalog,
    ) -> AppResult<ModelRecommendations> {
        let raw = self.complete(prompt).await.map_err(|e| {
            match &e {
                ProviderError::RateLimited(_) => {
                    tracing::warn!(error = %e, "LLM provider rate limit hit")
                }
                _ => tracing::error!(error = %e, "LLM completion failed"),
            }
            AppError::from(e)
        })?;

        validate_response(&raw, catalog)
    }

    async fn complete(&self, prompt: &PromptPair) -> Result<String, ProviderError> {
        let provider = self.provider.clone().ok_or_else(|| {
            ProviderError::NotConfigured("no completion provider configured".to_string())
        })?;

        tracing::info!(provider = provider.name(), "Requesting recommendations from LLM");

        // Isolate provider panics so they surface as an internal error
        let prompt = prompt.clone();
        tokio::spawn(async move { provider.complete(&prompt).await })
            .await
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?
    }
}

/// Parses and validates raw model output
///
/// The whole call fails only when the output is not JSON or lacks a
/// `recommendations` array. Individual malformed or unknown items are dropped.
pub fn validate_response(raw: &str, catalog: &Catalog) -> AppResult<ModelRecommendations> {
    let parsed: Value = serde_json::from_str(raw).map_err(|e| {
        tracing::error!(error = %e, raw_output = %raw, "Could not decode JSON response from LLM");
        AppError::ResponseFormat("LLM response JSON parsing error.".to_string())
    })?;

    let Some(entries) = parsed.get("recommendations").and_then(Value::as_array) else {
        tracing::error!(
            raw_output = %raw,
            "LLM response is not an object with a 'recommendations' list"
        );
        return Err(AppError::ResponseFormat(
            "LLM response format error.".to_string(),
        ));
    };

    let items = entries
        .iter()
        .filter_map(|entry| {
            let Ok(item) = serde_json::from_value::<RecommendationItem>(entry.clone()) else {
                tracing::warn!(item = %entry, "LLM recommendation item has incorrect format");
                return None;
            };
            if !catalog.contains(&item.product_id) {
                tracing::warn!(product_id = %item.product_id, "LLM recommended non-existent product");
                return None;
            }
            Some(item)
        })
        .collect();

    Ok(ModelRecommendations {
        items,
        raw_count: entries.len(),
    })
}
