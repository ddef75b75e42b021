use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the DocRAG server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// API key used to authenticate against the Gemini endpoints.
    pub gemini_api_key: String,
    /// Base URL of the Gemini API; override mainly exists for tests.
    pub gemini_base_url: String,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Dimensionality of the vectors produced by the embedding model.
    pub embedding_dimension: usize,
    /// Generation model used to produce grounded answers.
    pub generation_model: String,
    /// Per-request timeout applied to provider calls, in seconds.
    pub provider_timeout_secs: u64,
    /// Maximum chunk length in characters before the chunker closes a chunk.
    pub chunk_size: usize,
    /// Overlap parameter handed to the chunker; the seed width is derived from it.
    pub chunk_overlap_words: usize,
    /// Directory where raw uploaded document bytes are kept.
    pub upload_dir: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Result count used when a query does not specify one.
    pub query_default_max_results: usize,
    /// Upper bound applied to the per-query result count.
    pub query_max_results: usize,
}

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_EMBEDDING_DIMENSION: usize = 768;
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP_WORDS: usize = 200;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_QUERY_DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_QUERY_MAX_RESULTS: usize = 20;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            embedding_model: load_env_optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dimension: load_env_parsed(
                "EMBEDDING_DIMENSION",
                DEFAULT_EMBEDDING_DIMENSION,
            )?,
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            provider_timeout_secs: load_env_parsed(
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )?,
            chunk_size: load_env_parsed("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap_words: load_env_parsed(
                "CHUNK_OVERLAP_WORDS",
                DEFAULT_CHUNK_OVERLAP_WORDS,
            )?,
            upload_dir: load_env_optional("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            query_default_max_results: load_env_parsed(
                "QUERY_DEFAULT_MAX_RESULTS",
                DEFAULT_QUERY_DEFAULT_MAX_RESULTS,
            )?,
            query_max_results: load_env_parsed("QUERY_MAX_RESULTS", DEFAULT_QUERY_MAX_RESULTS)?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        base_url = %config.gemini_base_url,
        embedding_model = %config.embedding_model,
        embedding_dimension = config.embedding_dimension,
        generation_model = %config.generation_model,
        upload_dir = %config.upload_dir,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
