//! Configuration management for the Zenith AI backend.
//!
//! Configuration is merged from three sources, lowest precedence first:
//! - Built-in defaults
//! - An optional YAML config file (`zenith.yaml`)
//! - Environment variables (`DATABASE_URL`, `GOOGLE_API_KEY`, `GROQ_API_KEY`,
//!   `PORT`, `RUST_LOG`, `NO_COLOR`)
//!
//! The server binary applies clap flag overrides on top via
//! [`AppConfig::with_overrides`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub listen: String,

    /// Postgres connection string (None means the store is unavailable)
    pub database_url: Option<String>,

    /// API key for the embedding provider
    pub google_api_key: Option<String>,

    /// API key for the chat completion provider
    pub groq_api_key: Option<String>,

    /// Default number of documents retrieved per chat turn
    pub top_k: usize,

    /// Embedding provider settings
    pub embedding: EmbeddingSettings,

    /// Chat completion provider settings
    pub chat: ChatSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Disable colored output
    pub no_color: bool,

    /// Optional config file path
    pub config_file: Option<PathBuf>,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider identifier (e.g., "gemini", "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Expected embedding dimensionality
    pub dimensions: usize,

    /// Custom endpoint URL (primarily for tests)
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "text-embedding-004".to_string(),
            dimensions: 768,
            endpoint: None,
        }
    }
}

/// Chat completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Provider identifier (e.g., "groq")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom endpoint URL (primarily for tests)
    pub endpoint: Option<String>,

    /// Sampling temperature (0.0 keeps answers grounded in the context)
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "openai/gpt-oss-120b".to_string(),
            endpoint: None,
            temperature: 0.0,
        }
    }
}

/// YAML config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    embedding: Option<EmbeddingSettings>,
    chat: Option<ChatSettings>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServerSection {
    listen: Option<String>,
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            database_url: None,
            google_api_key: None,
            groq_api_key: None,
            top_k: 3,
            embedding: EmbeddingSettings::default(),
            chat: ChatSettings::default(),
            log_level: None,
            no_color: false,
            config_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `ZENITH_CONFIG`: path to a YAML config file (default: `zenith.yaml`
    ///   in the working directory, if present)
    /// - `DATABASE_URL`: Postgres connection string
    /// - `GOOGLE_API_KEY`: embedding provider credential
    /// - `GROQ_API_KEY`: chat provider credential
    /// - `PORT`: overrides the port portion of the listen address
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("ZENITH_CONFIG") {
            config.config_file = Some(PathBuf::from(path));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("zenith.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
            tracing::debug!("Merged config file {:?}", config_path);
        }

        // Environment variables override the YAML config
        config.database_url = std::env::var("DATABASE_URL").ok().or(config.database_url);
        config.google_api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .or(config.google_api_key);
        config.groq_api_key = std::env::var("GROQ_API_KEY").ok().or(config.groq_api_key);

        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid PORT value: {}", port)))?;
            let host = config
                .listen
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            config.listen = format!("{}:{}", host, port);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(server) = file.server {
            if let Some(listen) = server.listen {
                result.listen = listen;
            }
            if let Some(top_k) = server.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(embedding) = file.embedding {
            result.embedding = embedding;
        }

        if let Some(chat) = file.chat {
            result.chat = chat;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over both the config file and the
    /// environment.
    pub fn with_overrides(
        mut self,
        listen: Option<String>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(listen) = listen {
            self.listen = listen;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration invariants that would otherwise surface as
    /// confusing runtime failures.
    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Config(
                "top_k must be a positive integer".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be a positive integer".to_string(),
            ));
        }

        let known_embedding = ["gemini", "mock"];
        if !known_embedding.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_embedding.join(", ")
            )));
        }

        Ok(())
    }
}
