use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recipe row as read from the store, list columns still serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub minutes: Option<i64>,
    pub rating: Option<f64>,
    pub popularity: Option<i64>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub ingredients: Option<String>,
    pub nutrition: Option<String>,
    pub n_ingredients: Option<i64>,
    pub n_steps: Option<i64>,
    pub submitted: Option<String>,
    /// bm25 relevance (lower is better); 0 when no text predicate applied
    pub score: f64,
}

/// A full recipe with decoded list fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub minutes: i64,
    pub rating: f64,
    pub popularity: i64,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub description: String,
    pub steps: Vec<String>,
    pub ingredients: Vec<String>,
    pub nutrition: Vec<f64>,
    pub n_ingredients: i64,
    pub n_steps: i64,
    pub submitted: Option<NaiveDate>,
}

/// One search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeHit {
    pub id: i64,
    pub name: String,
    pub minutes: i64,
    pub rating: f64,
    pub popularity: i64,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub description: String,
    pub ingredients: Vec<String>,
    pub n_ingredients: i64,
    pub n_steps: i64,
    pub submitted: Option<NaiveDate>,
    pub score: f64,
}

/// Raw query-string parameters of `GET /search`.
///
/// Everything arrives as text so malformed numbers can be reported with the
/// API's own error shape instead of the extractor's.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub min_rating: Option<String>,
    pub max_minutes: Option<String>,
    pub ingredients: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Search response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub pages: u64,
    pub items: Vec<RecipeHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facets {
    pub cuisines: Vec<FacetCount>,
    pub diets: Vec<FacetCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// AI recipe request
#[derive(Debug, Clone, Deserialize)]
pub struct AiRecipeRequest {
    pub prompt: Option<String>,
    #[serde(default, alias = "systemPrompt")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRecipeResponse {
    pub text: String,
}

/// Food photo identification request (base64 image body)
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifyRequest {
    pub image: String,
    #[serde(default = "default_mime_type", alias = "mimeType")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub label: String,
}
