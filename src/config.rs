use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Azgentica";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Sampling temperature for all model calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default per-request timeout for the blocking HTTP client (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default location of the ingested recommendations table.
pub const DEFAULT_STORE_PATH: &str = "data/service-recommendations.json";

/// Which model backend serves the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    Ollama,
    Azure,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid MODEL_TYPE '{0}'. Supported values are 'ollama' or 'azure'")]
    InvalidModelType(String),

    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Environment-driven settings for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: ModelBackend,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub azure_endpoint: Option<String>,
    pub azure_api_key: Option<String>,
    pub azure_deployment: String,
    pub store_path: PathBuf,
    pub timeout_secs: u64,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// The Azure variables are only required when MODEL_TYPE is `azure`;
    /// they are validated here so a misconfigured run fails before any
    /// image is encoded or model contacted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("MODEL_TYPE")
            .unwrap_or_else(|_| "ollama".into())
            .as_str()
        {
            "ollama" => ModelBackend::Ollama,
            "azure" => ModelBackend::Azure,
            other => return Err(ConfigError::InvalidModelType(other.to_string())),
        };

        let azure_endpoint = env::var("AZURE_OPENAI_ENDPOINT").ok();
        let azure_api_key = env::var("AZURE_OPENAI_API_KEY").ok();
        if backend == ModelBackend::Azure {
            if azure_endpoint.is_none() {
                return Err(ConfigError::MissingVar("AZURE_OPENAI_ENDPOINT"));
            }
            if azure_api_key.is_none() {
                return Err(ConfigError::MissingVar("AZURE_OPENAI_API_KEY"));
            }
        }

        Ok(Self {
            backend,
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".into()),
            ollama_model: env::var("OLLAMA_MODEL_NAME").unwrap_or_else(|_| "llava:7b".into()),
            azure_endpoint,
            azure_api_key,
            azure_deployment: env::var("AZURE_OPENAI_DEPLOYMENT_NAME")
                .unwrap_or_else(|_| "gpt-4o".into()),
            store_path: env::var("RECOMMENDATION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH)),
            timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}
