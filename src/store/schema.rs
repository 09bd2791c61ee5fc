//! Database layout and bulk loading.
//!
//! The serving path never writes. These helpers create a database file in the
//! expected layout and fill it, keeping the FTS index in lockstep with the
//! row table.

use rusqlite::{params, Connection};

use crate::models::RecipeRow;

pub const RECIPES_TABLE: &str = "recipes";
pub const FTS_TABLE: &str = "recipes_fts";

const CREATE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id            INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    minutes       INTEGER,
    rating        REAL,
    popularity    INTEGER,
    cuisine       TEXT,
    diet          TEXT,
    description   TEXT,
    steps         TEXT,
    ingredients   TEXT,
    nutrition     TEXT,
    n_ingredients INTEGER,
    n_steps       INTEGER,
    submitted     TEXT
);

CREATE INDEX IF NOT EXISTS idx_recipes_cuisine ON recipes(cuisine);
CREATE INDEX IF NOT EXISTS idx_recipes_diet ON recipes(diet);

CREATE VIRTUAL TABLE IF NOT EXISTS recipes_fts USING fts5(
    name,
    description,
    ingredients,
    steps,
    content='recipes',
    content_rowid='id',
    tokenize='porter unicode61'
);
"#;

/// Create the row table and its external-content FTS5 index.
pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SQL)
}

/// Insert or replace rows, then rebuild the FTS index from the row table.
///
/// `score` on the input rows is ignored.
pub fn load_recipes(conn: &mut Connection, rows: &[RecipeRow]) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO recipes (
                id, name, minutes, rating, popularity, cuisine, diet, description,
                steps, ingredients, nutrition, n_ingredients, n_steps, submitted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )?;
        for row in rows {
            stmt.execute(params![
                row.id,
                row.name,
                row.minutes,
                row.rating,
                row.popularity,
                row.cuisine,
                row.diet,
                row.description,
                row.steps,
                row.ingredients,
                row.nutrition,
                row.n_ingredients,
                row.n_steps,
                row.submitted,
            ])?;
        }
    }
    tx.execute_batch("INSERT INTO recipes_fts(recipes_fts) VALUES ('rebuild')")?;
    tx.commit()?;
    tracing::info!("Loaded {} recipes and rebuilt the full-text index", rows.len());
    Ok(rows.len())
}
