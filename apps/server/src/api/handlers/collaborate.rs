//! Collaboration post handlers

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    api::{
        extractors::JsonDocument,
        json::{bson_to_json, documents_to_json},
    },
    state::AppState,
    Result,
};

/// GET /collaborate
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let posts = state.collaboration_service.list().await?;
    Ok(Json(documents_to_json(posts)))
}

/// POST /collaborate
pub async fn submit(
    State(state): State<AppState>,
    JsonDocument(post): JsonDocument,
) -> Result<impl IntoResponse> {
    let id = state.collaboration_service.submit(post).await?;
    Ok(Json(json!({
        "message": "Enquiry submitted successfully",
        "id": bson_to_json(id),
    })))
}
