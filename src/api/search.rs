use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::models::{Facets, Recipe, SearchParams, SearchResponse};
use crate::search::{shape, SearchRequest};
use crate::state::AppState;

/// GET /search - Paged full-text search with facet filters:
///   1. Validate and normalize parameters (bad filter values → 400)
///   2. Compile text, filters, sort and paging into a plan
///   3. Page read + count read against the store
///   4. Decode rows into the response envelope
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::bad_input(e.body_text()))?;
    let request = SearchRequest::from_params(&params)?;
    let response = state
        .read_store(move |store| shape::run_search(store, &request))
        .await?;

    tracing::debug!(
        "search q={:?} → {} of {} (page {}/{})",
        params.q,
        response.items.len(),
        response.total,
        response.page,
        response.pages
    );
    Ok(Json(response))
}

/// GET /recipes/{id} - One recipe with decoded ingredients, nutrition and steps
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_recipe_id(&raw_id)?;
    state
        .read_store(move |store| shape::get_recipe(store, id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// GET /facets - Cuisine and diet values with counts
pub async fn facets(State(state): State<AppState>) -> Result<Json<Facets>, ApiError> {
    let facets = state.read_store(shape::list_facets).await?;
    Ok(Json(facets))
}

fn parse_recipe_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_input("invalid id"))
}
