pub mod controllers;

use crate::AppState;
use axum::Router;
use axum::routing::{get, post};
use controllers::{catalog, flows, health};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/flows", get(flows::list_flows))
        .route("/flows/{name}", post(flows::invoke_flow))
        .route("/announcements", get(catalog::announcements))
        .route("/events", get(catalog::events))
        .route("/locations", get(catalog::locations))
        .route("/courses", get(catalog::courses))
        .route("/students", get(catalog::students))
        .route("/groups", get(catalog::groups))
        .route("/activities", get(catalog::activities))
        .route("/subjects", get(catalog::subjects));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
