//! "Help from WWS" enquiry handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    api::{
        extractors::JsonDocument,
        json::{bson_to_json, documents_to_json},
    },
    state::AppState,
    Error, Result,
};

/// GET /help-from-wws
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let enquiries = state.enquiry_service.list().await?;
    Ok(Json(documents_to_json(enquiries)))
}

/// GET /help-from-wws/:userEmail
pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let enquiries = state.enquiry_service.by_email(&email).await?;
    Ok(Json(documents_to_json(enquiries)))
}

/// POST /help-from-wws
pub async fn submit(
    State(state): State<AppState>,
    JsonDocument(enquiry): JsonDocument,
) -> Result<impl IntoResponse> {
    let id = state.enquiry_service.submit(enquiry).await?;
    Ok(Json(json!({
        "message": "Enquiry submitted successfully",
        "id": bson_to_json(id),
    })))
}

/// PATCH /help-from-wws/:id with `{"status": ...}`
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonDocument(mut body): JsonDocument,
) -> Result<impl IntoResponse> {
    let status = body
        .remove("status")
        .ok_or_else(|| Error::Validation("status is required".into()))?;
    let counts = state.enquiry_service.set_status(&id, status).await?;
    Ok(Json(json!({
        "success": true,
        "matchedCount": counts.matched,
        "modifiedCount": counts.modified,
    })))
}

/// DELETE /help-from-wws/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let deleted = state.enquiry_service.delete(&id).await?;
    Ok(Json(json!({
        "success": true,
        "deletedCount": deleted,
    })))
}
