use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub cohere_api_key: String,
    pub cohere_model: String,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub max_chars: usize,
    pub overlap: usize,
}

impl PipelineConfig {
    /// Read configuration from the environment. Credentials are required;
    /// connection and chunking settings have sensible defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            cohere_api_key: std::env::var("COHERE_API_KEY")
                .context("COHERE_API_KEY is not set")?,
            cohere_model: std::env::var("COHERE_MODEL")
                .unwrap_or_else(|_| extract::llm::DEFAULT_MODEL.into()),
            neo4j_uri: std::env::var("NEO4J_URI")
                .unwrap_or_else(|_| "bolt://localhost:7687".into()),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".into()),
            neo4j_password: std::env::var("NEO4J_PASSWORD")
                .context("NEO4J_PASSWORD is not set")?,
            max_chars: env_usize("KG_MAX_CHARS", 3000)?,
            overlap: env_usize("KG_OVERLAP", 200)?,
        })
    }
}

fn env_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{key} must be an integer, got {value:?}")),
        Err(_) => Ok(default),
    }
}
