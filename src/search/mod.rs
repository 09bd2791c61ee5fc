//! Search query shaping.
//!
//! A request flows through four independent, pure steps before touching the
//! store:
//!
//! ```text
//!   q ──────────────► TextQuery::parse ──┐
//!   facets ─────────► Filters::compile ──┼──► SearchPlan ──► RecipeStore
//!   sort ───────────► SortKey::parse  ───┤      (page + count reads)
//!   page, page_size ► Page::new ─────────┘             │
//!                                                      ▼
//!                                           shape::run_search
//!                                      (decode rows, build envelope)
//! ```

pub mod decode;
pub mod filter;
pub mod paginate;
pub mod query;
pub mod shape;
pub mod sort;
pub mod sql;

use crate::error::ApiError;
use crate::models::SearchParams;

use filter::{parse_ingredient_list, Filters};
use paginate::Page;
use query::TextQuery;
use sort::SortKey;

/// Validated, normalized form of one search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub text: TextQuery,
    pub filters: Filters,
    pub sort: SortKey,
    pub page: Page,
}

/// Everything the store needs to execute a search.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub text: TextQuery,
    pub filters: Vec<sql::SqlFragment>,
    pub sort: SortKey,
    pub page: Page,
}

impl SearchRequest {
    /// Validate query-string parameters.
    ///
    /// Malformed `min_rating` / `max_minutes` are rejected. Malformed paging
    /// values are treated as absent and clamped later.
    pub fn from_params(params: &SearchParams) -> Result<Self, ApiError> {
        let min_rating = parse_bound("min_rating", params.min_rating.as_deref())?;
        let max_minutes = parse_bound("max_minutes", params.max_minutes.as_deref())?;

        Ok(Self {
            text: TextQuery::parse(params.q.as_deref().unwrap_or_default()),
            filters: Filters {
                cuisine: blank_to_none(params.cuisine.as_deref()).map(str::to_string),
                diet: blank_to_none(params.diet.as_deref()).map(str::to_string),
                min_rating,
                max_minutes,
                ingredients: params
                    .ingredients
                    .as_deref()
                    .map(parse_ingredient_list)
                    .unwrap_or_default(),
            },
            sort: SortKey::parse(params.sort.as_deref()),
            page: Page::new(
                params.page.as_deref().and_then(parse_whole_number),
                params.page_size.as_deref().and_then(parse_whole_number),
            ),
        })
    }

    pub fn plan(&self) -> SearchPlan {
        SearchPlan {
            text: self.text.clone(),
            filters: self.filters.compile(),
            sort: self.sort,
            page: self.page,
        }
    }
}

/// A numeric filter bound; absent or blank is 0 (unset).
fn parse_bound(name: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    match blank_to_none(raw) {
        None => Ok(0.0),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::bad_input(format!("invalid {name}: {raw}"))),
    }
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Integers, plus whole-valued decimals like "30.0" that form fields send.
fn parse_whole_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}
