use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Product, RecommendationPayload, RecommendationRequest, RecommendationResponse},
    services::recommendations,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub catalog_loaded_at: Option<DateTime<Utc>>,
    pub llm_configured: bool,
}

/// Liveness message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Recommendation System API!" }))
}

/// Health check endpoint. Reports the current catalog without reloading it.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.catalog.snapshot().await;
    Json(HealthResponse {
        status: "healthy",
        products: catalog.len(),
        catalog_loaded_at: catalog.loaded_at(),
        llm_configured: state.recommender.is_configured(),
    })
}

/// Get the full product catalog
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let catalog = state.catalog.get_all().await;
    if catalog.is_empty() {
        return Err(catalog_unavailable());
    }
    Ok(Json(catalog.products().to_vec()))
}

/// Get a single product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Product>> {
    match state.catalog.get_by_id(&product_id).await {
        Some(product) => Ok(Json(product)),
        None if state.catalog.snapshot().await.is_empty() => Err(catalog_unavailable()),
        None => Err(AppError::NotFound(format!(
            "Product '{}' not found.",
            product_id
        ))),
    }
}

/// Generate recommendations for the given preferences and browsing history
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationPayload>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(payload) = payload?;
    let request = RecommendationRequest::try_from(payload)?;

    tracing::info!(
        request_id = %request_id,
        history_count = request.history_ids.len(),
        categories = ?request.preferences.categories(),
        "Processing recommendation request"
    );

    let response =
        recommendations::get_recommendations(&state.catalog, &state.recommender, request).await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}

fn catalog_unavailable() -> AppError {
    AppError::ServiceUnavailable("Product catalog is currently unavailable.".to_string())
}
