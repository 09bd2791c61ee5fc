use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::llm::chat::generate_recipes;
use crate::llm::vision::{identify_food, InlineImage};
use crate::models::{AiRecipeRequest, AiRecipeResponse, IdentifyRequest, IdentifyResponse};
use crate::state::AppState;

/// POST /ai-recipes - Free-form recipe suggestions from the chat model.
pub async fn ai_recipes(
    State(state): State<AppState>,
    body: Result<Json<AiRecipeRequest>, JsonRejection>,
) -> Result<Json<AiRecipeResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_input(e.body_text()))?;

    // ── Step 1: Validate input ────────────────────────────
    let prompt = req
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_input("Missing prompt"))?;

    // ── Step 2: Acquire semaphore ─────────────────────────
    let _permit = state
        .model_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Internal("Model service at capacity".to_string()))?;

    // ── Step 3: Call the model ────────────────────────────
    let text = generate_recipes(
        &state.http_client,
        &state.config.llm,
        prompt,
        req.system_prompt.as_deref(),
    )
    .await
    .map_err(|e| ApiError::Upstream(format!("{e:#}")))?;

    tracing::info!("ai-recipes: {} chars generated", text.len());
    Ok(Json(AiRecipeResponse { text }))
}

/// POST /identify - Name the food in a base64 photo.
pub async fn identify(
    State(state): State<AppState>,
    body: Result<Json<IdentifyRequest>, JsonRejection>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_input(e.body_text()))?;
    let image = InlineImage::parse(&req.image, &req.mime_type)
        .map_err(|e| ApiError::bad_input(e.to_string()))?;

    let _permit = state
        .model_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Internal("Model service at capacity".to_string()))?;

    let label = identify_food(&state.http_client, &state.config.vision, &image)
        .await
        .map_err(|e| ApiError::Upstream(format!("{e:#}")))?;

    tracing::info!("identify ({}): {label}", image.mime_type);
    Ok(Json(IdentifyResponse { label }))
}
