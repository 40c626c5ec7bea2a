//! Enquiry routes

use axum::{routing::get, Router};

use crate::{api::handlers::enquiries, state::AppState};

pub fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/help-from-wws",
            get(enquiries::list).post(enquiries::submit),
        )
        // One path segment is an email for GET and an identifier otherwise
        .route(
            "/help-from-wws/:key",
            get(enquiries::by_email)
                .patch(enquiries::set_status)
                .delete(enquiries::delete),
        )
}
