//! Facet filters compiled into conjunctive predicate fragments.

use super::sql::{SqlFragment, SqlParam};

/// Ingredient terms beyond this many are ignored.
pub const MAX_INGREDIENT_TERMS: usize = 10;

/// Optional facet selections for a search. Unset values never narrow results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    /// 0 or less means unset
    pub min_rating: f64,
    /// 0 or less means unset
    pub max_minutes: f64,
    pub ingredients: Vec<String>,
}

impl Filters {
    /// One fragment per active filter, in a fixed order:
    /// cuisine, diet, rating, minutes, then each ingredient.
    pub fn compile(&self) -> Vec<SqlFragment> {
        let mut fragments = Vec::new();

        if let Some(cuisine) = non_empty(self.cuisine.as_deref()) {
            fragments.push(SqlFragment::new("r.cuisine = ?", vec![SqlParam::text(cuisine)]));
        }
        if let Some(diet) = non_empty(self.diet.as_deref()) {
            fragments.push(SqlFragment::new("r.diet = ?", vec![SqlParam::text(diet)]));
        }
        if self.min_rating > 0.0 {
            fragments.push(SqlFragment::new(
                "r.rating >= ?",
                vec![SqlParam::Real(self.min_rating)],
            ));
        }
        if self.max_minutes > 0.0 {
            fragments.push(SqlFragment::new(
                "r.minutes <= ?",
                vec![SqlParam::Real(self.max_minutes)],
            ));
        }
        for ingredient in self.ingredients.iter().take(MAX_INGREDIENT_TERMS) {
            if ingredient.is_empty() {
                continue;
            }
            fragments.push(SqlFragment::new(
                "r.ingredients LIKE ? ESCAPE '\\'",
                vec![SqlParam::Text(format!("%{}%", escape_like(ingredient)))],
            ));
        }

        fragments
    }
}

/// Split a comma separated ingredient list into trimmed, non-empty terms.
pub fn parse_ingredient_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_INGREDIENT_TERMS)
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
