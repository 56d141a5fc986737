use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use strum::{Display, EnumString};
use thiserror::Error;
use url::Url;

/// Base URL of the Recrux REST API when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Request timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Log directive applied when neither the configuration nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors raised while resolving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The YAML configuration file did not parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The JSON configuration file did not parse.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration file is neither YAML nor JSON.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,
    /// An environment override could not be parsed.
    #[error("Invalid {name} value: {reason}")]
    InvalidEnv {
        /// Name of the offending variable.
        name: &'static str,
        /// What was wrong with its value.
        reason: String,
    },
    /// The API base URL is malformed or not http(s).
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidUrl {
        /// The configured URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The request timeout is zero.
    #[error("Invalid request timeout. Must be greater than 0.")]
    InvalidTimeout,
}

/// Output format of the log subscriber.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Log level and output format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (`warn`, `info,client=debug`, ...), overridden
    /// by `RUST_LOG` when set.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Configuration for the Recrux client and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Root of the REST API, including any `/api` prefix.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Directory holding the persisted credential. Resolved lazily when unset.
    pub credential_dir: Option<PathBuf>,

    /// Log settings.
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            credential_dir: None,
            logging: LoggingConfig::default(),
        }
    }

    /// Loads the configuration from a file, the process environment, or defaults.
    ///
    /// # Errors
    /// See [`Config::load_config_with_env`].
    pub fn load_config(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_config_with_env(config_path, |name| env::var(name).ok())
    }

    /// Loads the configuration, reading `RECRUX_*` overrides through `lookup`.
    ///
    /// Overrides only apply to values the file left at their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the resolved configuration is invalid.
    pub fn load_config_with_env<F>(
        config_path: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) => {
                let content = fs::read_to_string(&path)?;
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                    Some("json") => serde_json::from_str(&content)?,
                    _ => return Err(ConfigError::UnsupportedFormat),
                }
            }
            None => Config::with_defaults(),
        };

        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Some(url) = lookup("RECRUX_API_URL") {
                self.api_base_url = url;
            }
        }
        if self.request_timeout_secs == defaults.request_timeout_secs {
            if let Some(timeout) = lookup("RECRUX_TIMEOUT_SECS") {
                self.request_timeout_secs =
                    timeout.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        name: "RECRUX_TIMEOUT_SECS",
                        reason: "must be a whole number of seconds".to_string(),
                    })?;
            }
        }
        if self.credential_dir.is_none() {
            if let Some(dir) = lookup("RECRUX_CREDENTIAL_DIR") {
                self.credential_dir = Some(PathBuf::from(dir));
            }
        }
        if self.logging.level == defaults.logging.level {
            if let Some(level) = lookup("RECRUX_LOG_LEVEL") {
                self.logging.level = level;
            }
        }
        if self.logging.format == defaults.logging.format {
            if let Some(format) = lookup("RECRUX_LOG_FORMAT") {
                self.logging.format =
                    format.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        name: "RECRUX_LOG_FORMAT",
                        reason: format!("unknown log format '{format}', expected text or json"),
                    })?;
            }
        }

        Ok(())
    }

    /// Checks that the resolved values are usable.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.base_url().map(|_| ())
    }

    /// The API base URL, parsed and normalised to end with a `/` so relative
    /// endpoint paths join beneath it.
    ///
    /// # Errors
    /// Returns an error when the URL does not parse or is not http(s).
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.api_base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.api_base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Directory that holds the persisted credential.
    #[must_use]
    pub fn credential_dir(&self) -> PathBuf {
        self.credential_dir.clone().unwrap_or_else(|| {
            BaseDirs::new()
                .map(|dirs| dirs.config_dir().join("recrux"))
                .unwrap_or_else(|| PathBuf::from("./.recrux"))
        })
    }
}
