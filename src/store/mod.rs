//! Read-only access to the recipe database.
//!
//! [`RecipeStore`] is the seam between the search layer and the engine that
//! owns the rows and the ranking function. The search layer hands it a
//! [`SearchPlan`](crate::search::SearchPlan) of engine-neutral predicate
//! fragments; the store decides how to join, score and execute them.

pub mod schema;
pub mod sqlite;

use crate::error::StoreError;
use crate::models::{FacetCount, RecipeRow};
use crate::search::SearchPlan;

/// Categorical columns that can be listed as facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetColumn {
    Cuisine,
    Diet,
}

impl FacetColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            FacetColumn::Cuisine => "cuisine",
            FacetColumn::Diet => "diet",
        }
    }
}

pub trait RecipeStore: Send + Sync {
    /// Human-readable location of the backing database.
    fn location(&self) -> String;

    /// Cheap reachability probe.
    fn ping(&self) -> Result<(), StoreError>;

    /// One page of rows matching the plan, in the plan's order, with scores.
    fn fetch_page(&self, plan: &SearchPlan) -> Result<Vec<RecipeRow>, StoreError>;

    /// Total rows matching the plan's predicate, ignoring order and paging.
    fn count(&self, plan: &SearchPlan) -> Result<u64, StoreError>;

    /// The page read then the count read, in that order.
    fn search_page(&self, plan: &SearchPlan) -> Result<(Vec<RecipeRow>, u64), StoreError> {
        let rows = self.fetch_page(plan)?;
        let total = self.count(plan)?;
        Ok((rows, total))
    }

    fn recipe(&self, id: i64) -> Result<Option<RecipeRow>, StoreError>;

    /// Distinct non-empty values with their row counts, most frequent first.
    fn facet_counts(&self, column: FacetColumn, limit: usize) -> Result<Vec<FacetCount>, StoreError>;
}
