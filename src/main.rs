use tracing_subscriber::EnvFilter;

use recipe_search::api;
use recipe_search::config::Config;
use recipe_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Recipe database: {}", config.db_path.display());
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        "Server listening on {}{}",
        config.bind_addr,
        recipe_search::config::normalize_base_path(&config.base_path)
    );

    axum::serve(listener, app).await?;
    Ok(())
}
