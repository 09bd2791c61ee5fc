//! # recipe-search
//!
//! A read-only HTTP API for discovering recipes in a SQLite database:
//! ranked full-text search with facet filters, single-recipe lookup,
//! facet listings and a health probe, plus two model-backed helpers
//! (free-form recipe suggestions and food-photo identification).
//!
//! ## Architecture
//!
//! ```text
//!   GET /search?q=…&cuisine=…&sort=…&page=…
//!              │
//!              ▼
//!   ┌──────────────────────┐
//!   │  SearchRequest        │  validate + normalize parameters
//!   └──────────┬───────────┘
//!              ▼
//!   ┌──────────────────────┐
//!   │  SearchPlan           │  text query · filters · sort · page
//!   └──────────┬───────────┘
//!              ▼
//!   ┌──────────────────────┐
//!   │  RecipeStore (SQLite) │  FTS5 MATCH + bm25, page + count
//!   └──────────┬───────────┘
//!              ▼
//!   ┌──────────────────────┐
//!   │  Result shaping       │  decode lists, parse dates, envelope
//!   └──────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, database, and model settings
//! - [`models`] - Shared data types: raw rows, shaped recipes, request/response bodies
//! - [`search`] - Query normalization, filter compilation, sorting, paging and shaping
//! - [`store`] - The `RecipeStore` seam and its pooled SQLite FTS5 implementation
//! - [`llm`] - Chat and vision model clients
//! - [`api`] - Axum HTTP handlers and the router
//! - [`error`] - Store and request errors with their HTTP mapping
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
