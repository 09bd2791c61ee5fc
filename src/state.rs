use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, StoreError};
use crate::store::sqlite::{SqliteStore, StoreOptions};
use crate::store::RecipeStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecipeStore>,
    pub http_client: reqwest::Client,
    pub model_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    /// Open the configured database and build the state around it.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = SqliteStore::open(&config.db_path, StoreOptions::from_config(&config))
            .with_context(|| format!("Failed to open recipe database {}", config.db_path.display()))?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: Config, store: Arc<dyn RecipeStore>) -> anyhow::Result<Self> {
        let permits = config.max_concurrent_model_calls.max(1);
        Ok(Self {
            config,
            store,
            http_client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            model_semaphore: Arc::new(tokio::sync::Semaphore::new(permits)),
        })
    }

    /// Run a blocking store read on the blocking thread pool.
    pub async fn read_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn RecipeStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?;
        Ok(result?)
    }
}
