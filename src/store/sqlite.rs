use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};

use super::schema::{FTS_TABLE, RECIPES_TABLE};
use super::{FacetColumn, RecipeStore};
use crate::config::{Config, RankWeights};
use crate::error::StoreError;
use crate::models::{FacetCount, RecipeRow};
use crate::search::sql::{SqlFragment, SqlParam};
use crate::search::SearchPlan;

const ROW_COLUMNS: &str = "r.id, r.name, r.minutes, r.rating, r.popularity, r.cuisine, r.diet, \
     r.description, r.steps, r.ingredients, r.nutrition, r.n_ingredients, r.n_steps, r.submitted";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub pool_size: u32,
    pub connection_timeout: Duration,
    pub weights: RankWeights,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            pool_size: 8,
            connection_timeout: Duration::from_secs(5),
            weights: RankWeights::default(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pool_size: config.pool_size,
            connection_timeout: Duration::from_secs(config.pool_timeout_secs),
            weights: config.weights,
        }
    }
}

/// SQLite FTS5 recipe store over a pool of read-only connections.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
    weights: RankWeights,
}

/// FROM clause, score expression and WHERE predicate for one plan.
struct ComposedQuery {
    from: String,
    score: String,
    predicate: Option<SqlFragment>,
}

impl ComposedQuery {
    fn where_clause(&self) -> String {
        self.predicate
            .as_ref()
            .map(|p| format!(" WHERE {}", p.sql))
            .unwrap_or_default()
    }

    fn params(&self) -> Vec<SqlParam> {
        self.predicate
            .as_ref()
            .map(|p| p.params.clone())
            .unwrap_or_default()
    }
}

impl SqliteStore {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(StoreError::Missing(path));
        }

        let manager = SqliteConnectionManager::file(&path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        );
        let pool = Pool::builder()
            .max_size(options.pool_size.max(1))
            .connection_timeout(options.connection_timeout)
            .build(manager)?;

        tracing::info!(
            "Opened recipe database {} (pool size {})",
            path.display(),
            options.pool_size.max(1)
        );

        Ok(Self {
            pool,
            path,
            weights: options.weights,
        })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }

    fn bm25_expression(&self) -> String {
        let w = &self.weights;
        format!(
            "bm25({FTS_TABLE}, {}, {}, {}, {})",
            w.name, w.description, w.ingredients, w.steps
        )
    }

    /// The text predicate decides the shape of the query: with one, rows come
    /// from the FTS index joined to the row table and carry a bm25 score;
    /// without one, the row table is scanned and every score is 0.
    fn compose(&self, plan: &SearchPlan) -> ComposedQuery {
        let mut fragments = Vec::with_capacity(plan.filters.len() + 1);
        let (from, score) = match plan.text.to_fragment(FTS_TABLE) {
            Some(text) => {
                fragments.push(text);
                (
                    format!("{FTS_TABLE} JOIN {RECIPES_TABLE} r ON r.id = {FTS_TABLE}.rowid"),
                    self.bm25_expression(),
                )
            }
            None => (format!("{RECIPES_TABLE} r"), "0.0".to_string()),
        };
        fragments.extend(plan.filters.iter().cloned());

        ComposedQuery {
            from,
            score,
            predicate: SqlFragment::and_all(&fragments),
        }
    }

    fn query_page(&self, conn: &Connection, plan: &SearchPlan) -> Result<Vec<RecipeRow>, StoreError> {
        let query = self.compose(plan);
        let sql = format!(
            "SELECT {ROW_COLUMNS}, {score} AS score FROM {from}{where_clause} ORDER BY {order} LIMIT ? OFFSET ?",
            score = query.score,
            from = query.from,
            where_clause = query.where_clause(),
            order = plan.sort.order_clause(),
        );
        let mut params = query.params();
        params.push(SqlParam::Integer(plan.page.limit()));
        params.push(SqlParam::Integer(plan.page.offset()));

        tracing::debug!("search page sql: {sql}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_count(&self, conn: &Connection, plan: &SearchPlan) -> Result<u64, StoreError> {
        let query = self.compose(plan);
        let sql = format!(
            "SELECT COUNT(*) FROM {from}{where_clause}",
            from = query.from,
            where_clause = query.where_clause(),
        );
        let params = query.params();
        let total: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |r| r.get(0))?;
        Ok(total.max(0) as u64)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecipeRow> {
    Ok(RecipeRow {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        minutes: row.get(2)?,
        rating: row.get(3)?,
        popularity: row.get(4)?,
        cuisine: row.get(5)?,
        diet: row.get(6)?,
        description: row.get(7)?,
        steps: row.get(8)?,
        ingredients: row.get(9)?,
        nutrition: row.get(10)?,
        n_ingredients: row.get(11)?,
        n_steps: row.get(12)?,
        submitted: row.get(13)?,
        score: row.get::<_, Option<f64>>(14)?.unwrap_or(0.0),
    })
}

impl RecipeStore for SqliteStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    }

    fn fetch_page(&self, plan: &SearchPlan) -> Result<Vec<RecipeRow>, StoreError> {
        let conn = self.conn()?;
        self.query_page(&conn, plan)
    }

    fn count(&self, plan: &SearchPlan) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        self.query_count(&conn, plan)
    }

    fn search_page(&self, plan: &SearchPlan) -> Result<(Vec<RecipeRow>, u64), StoreError> {
        let conn = self.conn()?;
        let rows = self.query_page(&conn, plan)?;
        let total = self.query_count(&conn, plan)?;
        Ok((rows, total))
    }

    fn recipe(&self, id: i64) -> Result<Option<RecipeRow>, StoreError> {
        let sql = format!("SELECT {ROW_COLUMNS}, 0.0 AS score FROM {RECIPES_TABLE} r WHERE r.id = ?1");
        let conn = self.conn()?;
        let row = conn.query_row(&sql, [id], read_row).optional()?;
        Ok(row)
    }

    fn facet_counts(&self, column: FacetColumn, limit: usize) -> Result<Vec<FacetCount>, StoreError> {
        let col = column.column_name();
        let sql = format!(
            "SELECT {col} AS name, COUNT(*) AS count FROM {RECIPES_TABLE} \
             WHERE {col} IS NOT NULL AND TRIM({col}) <> '' \
             GROUP BY {col} ORDER BY count DESC, name ASC LIMIT ?1"
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let facets = stmt
            .query_map([limit as i64], |r| {
                Ok(FacetCount {
                    name: r.get(0)?,
                    count: r.get::<_, i64>(1)?.max(0) as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facets)
    }
}
