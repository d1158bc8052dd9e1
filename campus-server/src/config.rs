use campus_model::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TTS_MODEL};
use campus_model::GeminiConfig;
use campus_telemetry::TelemetryConfig;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },

    #[error("invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

/// Campus assistant server.
#[derive(Debug, Clone, Parser)]
#[command(name = "campus-server", version, about)]
pub struct ServerConfig {
    #[arg(long, env = "CAMPUS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CAMPUS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Gemini API key. Falls back to GOOGLE_API_KEY.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "CAMPUS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Model used by the text-to-speech flow.
    #[arg(long, env = "CAMPUS_TTS_MODEL", default_value = DEFAULT_TTS_MODEL)]
    pub tts_model: String,

    #[arg(long, env = "CAMPUS_MAX_TOOL_ROUNDS", default_value_t = campus_flow::DEFAULT_MAX_TOOL_ROUNDS)]
    pub max_tool_rounds: usize,

    /// Model request timeout in seconds.
    #[arg(long, env = "CAMPUS_REQUEST_TIMEOUT", default_value_t = 60)]
    pub request_timeout: u64,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,

    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn gemini_config(&self) -> Result<GeminiConfig, ConfigError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|source| ConfigError::InvalidBaseUrl { url: self.base_url.clone(), source })?;
        Ok(GeminiConfig::new(self.resolve_api_key()?)
            .with_base_url(base_url)
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.request_timeout)))
    }

    pub fn telemetry_config(&self) -> TelemetryConfig {
        let config = TelemetryConfig::new("campus-server")
            .with_log_level(self.log_level.clone())
            .with_json(self.log_json);
        match &self.otlp_endpoint {
            Some(endpoint) => config.with_otlp(endpoint.clone()),
            None => config,
        }
    }
}
