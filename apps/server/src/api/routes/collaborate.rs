//! Collaboration routes

use axum::{routing::get, Router};

use crate::{api::handlers::collaborate, state::AppState};

pub fn collaborate_routes() -> Router<AppState> {
    Router::new().route(
        "/collaborate",
        get(collaborate::list).post(collaborate::submit),
    )
}
