//! HTTP routes.

pub mod ai;
pub mod health;
pub mod search;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::normalize_base_path;
use crate::state::AppState;

/// Base64 inflates uploads by a third; leave room above the decoded image cap.
const IDENTIFY_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Build the application router, mounted under the configured base path.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/search", get(search::search))
        .route("/recipes/{id}", get(search::get_recipe))
        .route("/facets", get(search::facets))
        .route("/health", get(health::health))
        .route("/ai-recipes", post(ai::ai_recipes))
        .route(
            "/identify",
            post(ai::identify).layer(DefaultBodyLimit::max(IDENTIFY_BODY_LIMIT)),
        );

    let base_path = normalize_base_path(&state.config.base_path);
    let mut app = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&base_path, routes)
    };

    if state.config.cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
