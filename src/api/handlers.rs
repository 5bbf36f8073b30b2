use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{CatalogSummary, RecommendationRequest, RecommendationResponse, TitleOption},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Describe the catalog snapshot being served
pub async fn catalog_summary(State(state): State<AppState>) -> Json<CatalogSummary> {
    Json(state.snapshot().await.summary())
}

/// List every selectable title, in catalog order
pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<TitleOption>> {
    Json(state.snapshot().await.title_options())
}

/// Rank the catalog against the liked titles in the request
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        liked_titles = request.liked_titles.len(),
        liked_ids = request.liked_ids.len(),
        "Processing recommendation request"
    );

    let params = request.into_params(state.defaults())?;
    let context = state.snapshot().await;
    let response = RecommendationResponse::from(context.recommend(&params)?);

    if let Some(warning) = &response.warning {
        tracing::info!(request_id = %request_id, warning = %warning, "Recommendation not attempted");
    }

    Ok(Json(response))
}

/// Re-read the catalog source and swap in a freshly fitted snapshot
pub async fn reload_catalog(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<CatalogSummary>> {
    tracing::info!(request_id = %request_id, "Reloading catalog");
    let summary = state.reload().await?;
    Ok(Json(summary))
}
