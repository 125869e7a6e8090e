use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{RecommendationRequest, RecommendationResponse},
    services::{filter::filter_products, prompt::build_prompt, recommender::Recommender},
};

/// Generates personalized product recommendations
///
/// Pipeline:
/// 1. Make sure a model is configured and the catalog is loaded
/// 2. Pre-filter the catalog by category and price
/// 3. Render the prompt and ask the model
/// 4. Keep only items that reference real products
///
/// An empty answer from the model is a valid result. An answer whose items were
/// all rejected is reported as an upstream error.
pub async fn get_recommendations(
    catalog_store: &CatalogStore,
    recommender: &Recommender,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    if !recommender.is_configured() {
        return Err(AppError::ServiceUnavailable(
            "LLM API key not configured or client not initialized.".to_string(),
        ));
    }

    let catalog = catalog_store.get_all().await;
    if catalog.is_empty() {
        return Err(AppError::ServiceUnavailable(
            "Product catalog is empty or could not be loaded.".to_string(),
        ));
    }

    let candidates = filter_products(catalog.products(), &request.preferences)?;

    tracing::info!(
        candidates = candidates.len(),
        history = request.history_ids.len(),
        "Sending pre-filtered products to LLM"
    );

    let prompt = build_prompt(&candidates, &catalog, &request);
    let result = recommender.recommend(&prompt, &catalog).await?;

    if result.items.is_empty() && result.raw_count > 0 {
        tracing::warn!(
            raw_count = result.raw_count,
            preferences = %request.preferences.to_pretty_json(),
            "No LLM recommendations matched existing products"
        );
        return Err(AppError::Upstream(
            "No recommendations matched existing products.".to_string(),
        ));
    }

    tracing::info!(
        returned = result.items.len(),
        dropped = result.raw_count - result.items.len(),
        "Recommendations generated"
    );

    Ok(RecommendationResponse {
        recommendations: result.items,
    })
}
