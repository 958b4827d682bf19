//! Configuration management for Courtside.
//!
//! Configuration is set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. API key for the chat-completions endpoint.
//! - `AGENT_MODEL` - Optional. Model identifier. Defaults to `openai/gpt-4o-mini`.
//! - `NEO4J_HTTP_URL` - Optional. Base URL of the Neo4j HTTP API. Defaults to `http://127.0.0.1:7474`.
//! - `NEO4J_USERNAME` / `NEO4J_PASSWORD` - Optional. Store credentials. Default `neo4j` / `password`.
//! - `NEO4J_DATABASE` - Optional. Database name. Defaults to `neo4j`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Reasoning loop iteration budget. Defaults to `8`.
//! - `LLM_TIMEOUT_SECS` - Optional. Per-call language model timeout. Defaults to `60`.
//! - `QUERY_TIMEOUT_SECS` - Optional. Per-query store timeout. Defaults to `15`.
//! - `LLM_MAX_CONCURRENCY` - Optional. Cap on simultaneous model calls. Defaults to `4`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Graph store connection configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the Neo4j HTTP API (scheme + host + port).
    pub http_url: String,

    /// Store username.
    pub username: String,

    /// Store password.
    pub password: String,

    /// Database name used in the transaction endpoint path.
    pub database: String,

    /// Timeout for a single query round-trip.
    pub query_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            http_url: "http://127.0.0.1:7474".to_string(),
            username: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            query_timeout: Duration::from_secs(15),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions endpoint
    pub api_key: String,

    /// Model identifier (OpenRouter format)
    pub model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Iteration budget for the reasoning loop
    pub max_iterations: usize,

    /// Timeout for a single language model call
    pub llm_timeout: Duration,

    /// Cap on simultaneous outstanding language model calls
    pub llm_max_concurrency: usize,

    /// Graph store connection settings
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model =
            std::env::var("AGENT_MODEL").unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env_parse("PORT", 3000u16)?;
        let max_iterations = env_parse("MAX_ITERATIONS", 8usize)?;
        let llm_timeout = Duration::from_secs(env_parse("LLM_TIMEOUT_SECS", 60u64)?);
        let llm_max_concurrency = env_parse("LLM_MAX_CONCURRENCY", 4usize)?;

        let store = StoreConfig {
            http_url: std::env::var("NEO4J_HTTP_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:7474".to_string()),
            username: std::env::var("NEO4J_USERNAME").unwrap_or_else(|_| "neo4j".to_string()),
            password: std::env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "password".to_string()),
            database: std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
            query_timeout: Duration::from_secs(env_parse("QUERY_TIMEOUT_SECS", 15u64)?),
        };

        Ok(Self {
            api_key,
            model,
            host,
            port,
            max_iterations,
            llm_timeout,
            llm_max_concurrency,
            store,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 8,
            llm_timeout: Duration::from_secs(60),
            llm_max_concurrency: 4,
            store: StoreConfig::default(),
        }
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_defaults() {
        let config = Config::new("key".to_string(), "openai/gpt-4o-mini".to_string());
        assert_eq!(config.max_iterations, 8);
        assert_eq!(config.port, 3000);
        assert_eq!(config.store.database, "neo4j");
        assert_eq!(config.store.query_timeout, Duration::from_secs(15));
    }
}
