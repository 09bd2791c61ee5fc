//! HTTP tests for the router: status codes and JSON bodies, driven through
//! `tower::ServiceExt::oneshot` against a temporary database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use recipe_search::api;
use recipe_search::config::Config;
use recipe_search::models::RecipeRow;
use recipe_search::state::AppState;
use recipe_search::store::schema;
use recipe_search::store::sqlite::{SqliteStore, StoreOptions};

fn rows() -> Vec<RecipeRow> {
    let dish = |id: i64, name: &str, cuisine: &str, rating: f64, ingredients: &str| RecipeRow {
        id,
        name: name.to_string(),
        minutes: Some(20 + id),
        rating: Some(rating),
        popularity: Some(id),
        cuisine: Some(cuisine.to_string()),
        diet: Some("none".to_string()),
        description: Some("weeknight dinner".to_string()),
        steps: Some("boil water\nadd noodles\ndrain".to_string()),
        ingredients: Some(ingredients.to_string()),
        nutrition: Some("[100.0, 2.0]".to_string()),
        n_ingredients: Some(2),
        n_steps: Some(3),
        submitted: Some("2010-01-02 00:00:00".to_string()),
        score: 0.0,
    };
    vec![
        dish(1, "Pasta al limone", "italian", 4.2, r#"["pasta", "lemon"]"#),
        dish(2, "Pasta e fagioli", "italian", 4.7, r#"["pasta", "beans"]"#),
        dish(3, "Pad thai", "thai", 4.5, r#"["rice noodles", "peanuts"]"#),
    ]
}

fn app(base_path: &str) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.db");
    let mut conn = rusqlite::Connection::open(&path).unwrap();
    schema::initialize(&conn).unwrap();
    schema::load_recipes(&mut conn, &rows()).unwrap();
    drop(conn);

    let config = Config {
        db_path: path.clone(),
        base_path: base_path.to_string(),
        ..Config::default()
    };
    let store = SqliteStore::open(&path, StoreOptions::from_config(&config)).unwrap();
    let state = AppState::with_store(config, Arc::new(store)).unwrap();
    (dir, api::router(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_search_envelope() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/search?q=pasta&sort=rating&page_size=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 1);
    assert_eq!(body["items"][0]["id"], 2);
    assert_eq!(body["items"][0]["ingredients"], serde_json::json!(["pasta", "beans"]));
    assert_eq!(body["items"][0]["submitted"], "2010-01-02");
}

#[tokio::test]
async fn test_search_clamps_paging() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/search?page=0&page_size=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 50);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_search_rejects_bad_rating() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/search?min_rating=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("min_rating"));
}

#[tokio::test]
async fn test_search_rejected_query_string_is_json() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/search?q=a&q=b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate field"));
}

#[tokio::test]
async fn test_search_fractional_max_minutes() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/search?max_minutes=21.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], 1);
}

#[tokio::test]
async fn test_recipe_lookup() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/recipes/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pad thai");
    assert_eq!(
        body["steps"],
        serde_json::json!(["boil water", "add noodles", "drain"])
    );
    assert_eq!(body["nutrition"], serde_json::json!([100.0, 2.0]));
}

#[tokio::test]
async fn test_recipe_invalid_id() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/recipes/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({"error": "invalid id"}));
}

#[tokio::test]
async fn test_recipe_not_found() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/recipes/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_facets() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/facets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["cuisines"],
        serde_json::json!([
            {"name": "italian", "count": 2},
            {"name": "thai", "count": 1}
        ])
    );
    assert_eq!(body["diets"], serde_json::json!([{"name": "none", "count": 3}]));
}

#[tokio::test]
async fn test_health() {
    let (_dir, app) = app("/api");
    let (status, body) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["db"].as_str().unwrap().ends_with("recipes.db"));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_routes_without_base_path() {
    let (_dir, app) = app("/");
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_ai_recipes_requires_prompt() {
    let (_dir, app) = app("/api");
    let (status, body) = post_json(app, "/api/ai-recipes", r#"{"prompt": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({"error": "Missing prompt"}));
}

#[tokio::test]
async fn test_identify_rejects_unsupported_type() {
    let (_dir, app) = app("/api");
    let (status, body) = post_json(
        app,
        "/api/identify",
        r#"{"image": "R0lGODlhAQABAAAAACw=", "mime_type": "image/gif"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("image/gif"));
}
