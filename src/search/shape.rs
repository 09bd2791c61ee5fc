//! Executing plans against a store and shaping the rows for the API.

use chrono::NaiveDate;

use super::decode::{decode_ingredients, decode_nutrition, decode_steps};
use super::SearchRequest;
use crate::error::StoreError;
use crate::models::{Facets, Recipe, RecipeHit, RecipeRow, SearchResponse};
use crate::store::{FacetColumn, RecipeStore};

pub const MAX_CUISINE_FACETS: usize = 40;
pub const MAX_DIET_FACETS: usize = 20;

/// Run one paged search: the page read, then the count read. Either failing
/// fails the whole search.
pub fn run_search(
    store: &dyn RecipeStore,
    request: &SearchRequest,
) -> Result<SearchResponse, StoreError> {
    let plan = request.plan();
    let (rows, total) = store.search_page(&plan)?;

    Ok(SearchResponse {
        page: plan.page.page,
        page_size: plan.page.page_size,
        total,
        pages: plan.page.page_count(total),
        items: rows.into_iter().map(shape_hit).collect(),
    })
}

/// `Ok(None)` when no recipe has this id.
pub fn get_recipe(store: &dyn RecipeStore, id: i64) -> Result<Option<Recipe>, StoreError> {
    Ok(store.recipe(id)?.map(shape_recipe))
}

pub fn list_facets(store: &dyn RecipeStore) -> Result<Facets, StoreError> {
    Ok(Facets {
        cuisines: store.facet_counts(FacetColumn::Cuisine, MAX_CUISINE_FACETS)?,
        diets: store.facet_counts(FacetColumn::Diet, MAX_DIET_FACETS)?,
    })
}

pub fn shape_hit(row: RecipeRow) -> RecipeHit {
    RecipeHit {
        ingredients: decode_ingredients(row.ingredients.as_deref()),
        submitted: parse_date(row.submitted.as_deref()),
        id: row.id,
        name: row.name,
        minutes: row.minutes.unwrap_or(0),
        rating: row.rating.unwrap_or(0.0),
        popularity: row.popularity.unwrap_or(0),
        cuisine: row.cuisine,
        diet: row.diet,
        description: row.description.unwrap_or_default(),
        n_ingredients: row.n_ingredients.unwrap_or(0),
        n_steps: row.n_steps.unwrap_or(0),
        score: row.score,
    }
}

pub fn shape_recipe(row: RecipeRow) -> Recipe {
    Recipe {
        steps: decode_steps(row.steps.as_deref()),
        ingredients: decode_ingredients(row.ingredients.as_deref()),
        nutrition: decode_nutrition(row.nutrition.as_deref()),
        submitted: parse_date(row.submitted.as_deref()),
        id: row.id,
        name: row.name,
        minutes: row.minutes.unwrap_or(0),
        rating: row.rating.unwrap_or(0.0),
        popularity: row.popularity.unwrap_or(0),
        cuisine: row.cuisine,
        diet: row.diet,
        description: row.description.unwrap_or_default(),
        n_ingredients: row.n_ingredients.unwrap_or(0),
        n_steps: row.n_steps.unwrap_or(0),
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
