//! User handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    api::{
        extractors::JsonDocument,
        json::{bson_to_json, documents_to_json},
    },
    services::Role,
    state::AppState,
    Result,
};

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list().await?;
    Ok(Json(documents_to_json(users)))
}

/// GET /user/ambassador
pub async fn list_ambassadors(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.ambassadors().await?;
    Ok(Json(documents_to_json(users)))
}

/// PATCH /user/ambassador/:id
pub async fn update_ambassador(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonDocument(changes): JsonDocument,
) -> Result<impl IntoResponse> {
    let counts = state.user_service.update(&id, changes).await?;
    Ok(Json(json!({
        "success": true,
        "matchedCount": counts.matched,
        "modifiedCount": counts.modified,
    })))
}

async fn role_flag(state: &AppState, email: &str, role: Role) -> Result<Json<serde_json::Value>> {
    let flag = state.user_service.has_role(email, role).await?;
    let mut body = serde_json::Map::new();
    body.insert(role.as_str().to_string(), flag.into());
    Ok(Json(body.into()))
}

/// GET /getUser/:email
pub async fn is_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    role_flag(&state, &email, Role::User).await
}

/// GET /getAdmin/:email
pub async fn is_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    role_flag(&state, &email, Role::Admin).await
}

/// GET /getAmbassador/:email
pub async fn is_ambassador(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    role_flag(&state, &email, Role::Ambassador).await
}

/// POST /post-users
pub async fn register(
    State(state): State<AppState>,
    JsonDocument(user): JsonDocument,
) -> Result<impl IntoResponse> {
    let id = state.user_service.register(user).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User added successfully",
            "userId": bson_to_json(id),
        })),
    ))
}
