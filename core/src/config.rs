//! Layered service configuration.
//!
//! Precedence (later layers override earlier):
//! 1. Defaults
//! 2. TOML file (`alttext.toml`, or an explicit path)
//! 3. Environment variables
//!
//! ```no_run
//! use alttext_core::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! # Ok::<(), alttext_core::config::ConfigError>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::PipelineOptions;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "alttext.toml";

/// Variable naming an explicit config file.
pub const CONFIG_PATH_ENV_VAR: &str = "ALTTEXT_CONFIG";

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://alttextgenerator.vercel.app",
    "http://localhost:3000",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for ${var}: '{value}' (expected: {expected})")]
    InvalidEnvValue {
        var: String,
        value: String,
        expected: String,
    },

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Immutable configuration for one process.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub openai_api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub pipeline: PipelineOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pipeline: PipelineOptions::default(),
        }
    }
}

impl ServiceConfig {
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// `host:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "max_tokens must be greater than zero".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// The credential never appears in Debug output.
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

/// File layer. Every field is optional so a file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_origins: Option<Vec<String>>,
    pub max_upload_bytes: Option<usize>,
    pub pipeline: Option<PipelineOptions>,
}

/// Builder for layered configuration loading.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    skip_file: bool,
    skip_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the file layer from `path`. An explicit path must exist.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Skip loading from config file (only use defaults + env).
    pub fn skip_file_layer(mut self) -> Self {
        self.skip_file = true;
        self
    }

    /// Skip environment variable overrides (only use defaults + file).
    pub fn skip_env_layer(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Load configuration with all enabled layers.
    ///
    /// Precedence: default < file < environment
    pub fn load(self) -> Result<ServiceConfig, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Like [`ConfigLoader::load`], reading variables through `lookup`.
    pub fn load_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ServiceConfig, ConfigError> {
        let mut config = ServiceConfig::default();

        if !self.skip_file {
            let file_config = match self.config_path {
                Some(path) => Some(Self::load_from_file(&path)?),
                None => match lookup(CONFIG_PATH_ENV_VAR).filter(|p| !p.trim().is_empty()) {
                    Some(path) => Some(Self::load_from_file(Path::new(&path))?),
                    None => Self::load_optional_file(Path::new(DEFAULT_CONFIG_FILE))?,
                },
            };
            if let Some(file_config) = file_config {
                Self::merge_file(&mut config, file_config);
            }
        }

        if !self.skip_env {
            Self::apply_env_overrides(&mut config, &lookup)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_optional_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(None);
        }
        Self::load_from_file(path).map(Some)
    }

    /// Merge `file` into `base`, preferring the file's values where present.
    pub fn merge_file(base: &mut ServiceConfig, file: FileConfig) {
        if let Some(key) = file.openai_api_key {
            base.openai_api_key = Some(key);
        }
        if let Some(url) = file.api_base_url {
            base.api_base_url = url;
        }
        if let Some(model) = file.model {
            base.model = model;
        }
        if let Some(max_tokens) = file.max_tokens {
            base.max_tokens = max_tokens;
        }
        if let Some(secs) = file.request_timeout_secs {
            base.request_timeout = Duration::from_secs(secs);
        }
        if let Some(host) = file.host {
            base.host = host;
        }
        if let Some(port) = file.port {
            base.port = port;
        }
        if let Some(origins) = file.allowed_origins {
            base.allowed_origins = origins;
        }
        if let Some(bytes) = file.max_upload_bytes {
            base.max_upload_bytes = bytes;
        }
        if let Some(pipeline) = file.pipeline {
            base.pipeline = pipeline;
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Blank values are ignored. Values that do not parse are errors.
    pub fn apply_env_overrides(
        config: &mut ServiceConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            config.openai_api_key = Some(key.trim().to_string());
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            tracing::debug!("Applying env override: OPENAI_BASE_URL={url}");
            config.api_base_url = url.trim().to_string();
        }
        if let Some(model) = get("ALTTEXT_MODEL") {
            tracing::debug!("Applying env override: ALTTEXT_MODEL={model}");
            config.model = model.trim().to_string();
        }
        if let Some(value) = get("ALTTEXT_MAX_TOKENS") {
            config.max_tokens = parse_number("ALTTEXT_MAX_TOKENS", value)?;
        }
        if let Some(host) = get("HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(value) = get("PORT") {
            config.port = parse_number("PORT", value)?;
        }
        if let Some(value) = get("ALLOWED_ORIGINS") {
            config.allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(value) = get("ALTTEXT_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_number("ALTTEXT_MAX_UPLOAD_BYTES", value)?;
        }
        if let Some(value) = get("ALTTEXT_CLASSIFY") {
            config.pipeline.enable_classification = parse_bool("ALTTEXT_CLASSIFY", value)?;
        }
        if let Some(value) = get("ALTTEXT_SCORE") {
            config.pipeline.enable_scoring = parse_bool("ALTTEXT_SCORE", value)?;
        }
        if let Some(value) = get("ALTTEXT_TRUNCATE") {
            config.pipeline.auto_truncate = parse_bool("ALTTEXT_TRUNCATE", value)?;
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            value,
            expected: "a non-negative integer".to_string(),
        })
}

fn parse_bool(var: &str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            value,
            expected: "true/false, 1/0, yes/no, on/off".to_string(),
        }),
    }
}
