//! Catalog handlers: list, search, read, create, update and delete for
//! courses, scholarships, universities and events.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    api::{
        extractors::{JsonDocument, SearchBody},
        json::{bson_to_json, document_to_json, documents_to_json, string_fields},
    },
    models::CatalogEntity,
    state::AppState,
    Result,
};

/// GET /api/{entity}
pub async fn list(
    State(state): State<AppState>,
    entity: CatalogEntity,
) -> Result<impl IntoResponse> {
    let records = state.catalog_service.list(entity).await?;
    Ok(Json(documents_to_json(records)))
}

/// GET /api/search/{entity}?field=value
pub async fn search_query(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
    entity: CatalogEntity,
) -> Result<impl IntoResponse> {
    let records = state.catalog_service.filter(entity, &query).await?;
    Ok(Json(json!({
        "success": true,
        "data": documents_to_json(records),
    })))
}

/// POST /api/search/{entity}
pub async fn search_body(
    State(state): State<AppState>,
    entity: CatalogEntity,
    SearchBody(body): SearchBody,
) -> Result<impl IntoResponse> {
    let records = state
        .catalog_service
        .search(entity, &string_fields(&body))
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": documents_to_json(records),
    })))
}

/// GET /api/{entity}/:id
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    entity: CatalogEntity,
) -> Result<impl IntoResponse> {
    let record = state.catalog_service.get(entity, &id).await?;
    Ok(Json(document_to_json(record)))
}

/// POST /add-new-{entity}
pub async fn create(
    State(state): State<AppState>,
    entity: CatalogEntity,
    JsonDocument(record): JsonDocument,
) -> Result<impl IntoResponse> {
    let id = bson_to_json(state.catalog_service.create(entity, record).await?);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("{} added successfully", entity.label()),
            "id": id.clone(),
            entity.created_id_key(): id,
        })),
    ))
}

/// PUT /api/{entity}/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    entity: CatalogEntity,
    JsonDocument(changes): JsonDocument,
) -> Result<impl IntoResponse> {
    let counts = state.catalog_service.update(entity, &id, changes).await?;
    Ok(Json(json!({
        "success": true,
        "matchedCount": counts.matched,
        "modifiedCount": counts.modified,
    })))
}

/// DELETE /api/{entity}/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    entity: CatalogEntity,
) -> Result<impl IntoResponse> {
    let deleted = state.catalog_service.delete(entity, &id).await?;
    Ok(Json(json!({
        "success": true,
        "deletedCount": deleted,
    })))
}
