use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite recipe database (opened read-only)
    pub db_path: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Prefix every API route is mounted under ("/api" by default, "" for none)
    pub base_path: String,
    /// Maximum pooled SQLite connections
    pub pool_size: u32,
    /// Seconds to wait for a pooled connection
    pub pool_timeout_secs: u64,
    /// Permissive CORS for browser front-ends served from another origin
    pub cors: bool,
    /// Per-column bm25 weights for the full-text index
    pub weights: RankWeights,
    /// Maximum concurrent outbound calls to hosted models
    pub max_concurrent_model_calls: usize,
    /// Chat model used for AI recipe suggestions
    pub llm: LlmConfig,
    /// Vision model used for food-photo identification
    pub vision: VisionConfig,
}

/// Column weights passed to FTS5 `bm25()`, in index column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub name: f64,
    pub description: f64,
    pub ingredients: f64,
    pub steps: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            name: 10.0,
            description: 2.0,
            ingredients: 4.0,
            steps: 1.0,
        }
    }
}

impl RankWeights {
    /// Parse "name,description,ingredients,steps". Anything other than four
    /// finite non-negative numbers is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let values: Vec<f64> = raw
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        if values.len() != 4 || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        Some(Self {
            name: values[0],
            description: values[1],
            ingredients: values[2],
            steps: values[3],
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the chat API
    pub base_url: String,
    /// Model name for recipe generation
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4.1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Base URL for the Gemini API
    pub base_url: String,
    /// Model name for image understanding
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-image".to_string(),
            api_key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./recipes.db"),
            bind_addr: "127.0.0.1:4000".to_string(),
            base_path: "/api".to_string(),
            pool_size: 8,
            pool_timeout_secs: 5,
            cors: true,
            weights: RankWeights::default(),
            max_concurrent_model_calls: 4,
            llm: LlmConfig::default(),
            vision: VisionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("RECIPE_SEARCH_DB_PATH").or_else(|_| std::env::var("DB_PATH")) {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var("RECIPE_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                config.bind_addr = with_port(&config.bind_addr, p);
            }
        }
        if let Ok(base) = std::env::var("RECIPE_SEARCH_BASE_PATH") {
            config.base_path = normalize_base_path(&base);
        }
        if let Ok(val) = std::env::var("RECIPE_SEARCH_POOL_SIZE") {
            if let Ok(v) = val.parse::<u32>() {
                config.pool_size = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("RECIPE_SEARCH_POOL_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.pool_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("RECIPE_SEARCH_BM25_WEIGHTS") {
            match RankWeights::parse(&val) {
                Some(w) => config.weights = w,
                None => tracing::warn!("Ignoring malformed RECIPE_SEARCH_BM25_WEIGHTS: {val}"),
            }
        }
        if let Ok(val) = std::env::var("RECIPE_SEARCH_MAX_MODEL_CALLS") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_concurrent_model_calls = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("RECIPE_SEARCH_CORS") {
            config.cors = !matches!(val.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off");
        }

        // Chat model
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }

        // Vision model
        if let Ok(url) = std::env::var("VISION_BASE_URL") {
            config.vision.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("VISION_MODEL") {
            config.vision.model = model;
        }
        if let Ok(key) = std::env::var("VISION_API_KEY") {
            config.vision.api_key = Some(key);
        }

        config
    }
}

/// "/api/" -> "/api", "api" -> "/api", "/" or "" -> "".
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn with_port(bind_addr: &str, port: u16) -> String {
    let host = bind_addr
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(bind_addr);
    format!("{host}:{port}")
}
