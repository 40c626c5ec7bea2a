//! User routes

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{api::handlers::users, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/user/ambassador", get(users::list_ambassadors))
        .route("/user/ambassador/:id", patch(users::update_ambassador))
        .route("/getUser/:email", get(users::is_user))
        .route("/getAdmin/:email", get(users::is_admin))
        .route("/getAmbassador/:email", get(users::is_ambassador))
        .route("/post-users", post(users::register))
}
