use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::HealthResponse;
use crate::state::AppState;

/// GET /health - 200 when the database answers a trivial query, 500 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db = state.store.location();
    match state.read_store(|store| store.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                db,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    db,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
