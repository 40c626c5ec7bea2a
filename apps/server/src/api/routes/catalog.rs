//! Catalog routes
//!
//! Every catalog entity gets the same set of routes:
//! - `GET /api/{plural}` list
//! - `GET|POST /api/search/{plural}` search by query string or body
//! - `GET|PUT|DELETE /api/{singular}/:id` single record
//! - `POST /add-new-{singular}` create

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};

use crate::{
    api::{
        extractors::{JsonDocument, SearchBody},
        handlers::catalog,
    },
    models::CatalogEntity,
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    CatalogEntity::ALL
        .into_iter()
        .fold(Router::new(), |router, entity| {
            router.merge(entity_routes(entity))
        })
}

fn entity_routes(entity: CatalogEntity) -> Router<AppState> {
    let list_path = format!("/api/{}", entity.plural());
    let search_path = format!("/api/search/{}", entity.plural());
    let record_path = format!("/api/{}/:id", entity.singular());
    let create_path = format!("/add-new-{}", entity.singular());

    Router::new()
        .route(
            &list_path,
            get(move |state: State<AppState>| catalog::list(state, entity)),
        )
        .route(
            &search_path,
            get(
                move |state: State<AppState>, query: Query<Vec<(String, String)>>| {
                    catalog::search_query(state, query, entity)
                },
            )
            .post(move |state: State<AppState>, body: SearchBody| {
                catalog::search_body(state, entity, body)
            }),
        )
        .route(
            &record_path,
            get(move |state: State<AppState>, id: Path<String>| {
                catalog::read(state, id, entity)
            })
            .put(
                move |state: State<AppState>, id: Path<String>, body: JsonDocument| {
                    catalog::update(state, id, entity, body)
                },
            )
            .delete(move |state: State<AppState>, id: Path<String>| {
                catalog::delete(state, id, entity)
            }),
        )
        .route(
            &create_path,
            post(move |state: State<AppState>, body: JsonDocument| {
                catalog::create(state, entity, body)
            }),
        )
}
