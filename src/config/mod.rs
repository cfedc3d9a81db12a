//! Configuration management.
//!
//! Configuration is read from a TOML file and then overridden by
//! environment variables:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `KWDOC_CONFIG_PATH` | config file location |
//! | `KWDOC_KEYWORDS_PATH` | `keywords_path` |
//! | `KWDOC_LOG` | log filter (falls back to `RUST_LOG`) |
//! | `KWDOC_LOG_FORMAT` | `logging.format` (`pretty` or `json`) |

use crate::observability::LogFormat;
use crate::services::watcher::DEFAULT_POLL_INTERVAL_MS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the keyword dictionary.
pub const DEFAULT_KEYWORDS_PATH: &str = "resources/keywords.json";

/// Default editor language the annotator serves.
pub const DEFAULT_LANGUAGE_ID: &str = "sql";

/// Main configuration for kwdoc.
#[derive(Debug, Clone)]
pub struct KwdocConfig {
    /// Path to the keyword dictionary (JSON).
    pub keywords_path: PathBuf,
    /// Language id of documents to annotate.
    pub language_id: String,
    /// How often the watcher polls the dictionary.
    pub poll_interval: Duration,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `kwdoc=debug`.
    pub filter: Option<String>,
    /// Output format.
    pub format: Option<LogFormat>,
    /// Optional log file; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Keyword dictionary path.
    pub keywords_path: Option<String>,
    /// Language id.
    pub language_id: Option<String>,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: Option<u64>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// Filter directive.
    pub filter: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for KwdocConfig {
    fn default() -> Self {
        Self {
            keywords_path: PathBuf::from(DEFAULT_KEYWORDS_PATH),
            language_id: DEFAULT_LANGUAGE_ID.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            logging: LoggingSettings::default(),
        }
    }
}

impl KwdocConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, contains unknown
    /// keys, or names an unknown log format.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from a file path.
    ///
    /// Relative paths inside the file resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = path.parent() {
            config.keywords_path = resolve_relative(base, &config.keywords_path);
            config.logging.file = config
                .logging
                .file
                .map(|file| resolve_relative(base, &file));
        }
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/kwdoc/` on macOS)
    /// 2. XDG config dir (`~/.config/kwdoc/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found. A config
    /// file that fails to parse is skipped with a warning.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("kwdoc").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("kwdoc")
                .join("config.toml"),
        ];

        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Ignoring config file");
                },
            }
        }

        Self::default()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = non_empty_env("KWDOC_KEYWORDS_PATH") {
            self.keywords_path = PathBuf::from(path);
        }
        if let Some(filter) = non_empty_env("KWDOC_LOG") {
            self.logging.filter = Some(filter);
        }
        if let Some(format) = non_empty_env("KWDOC_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.logging.format = Some(format),
                None => tracing::warn!(value = %format, "Ignoring unknown KWDOC_LOG_FORMAT"),
            }
        }
        self
    }

    /// Converts a `ConfigFile` to `KwdocConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file.keywords_path {
            config.keywords_path = PathBuf::from(path);
        }
        if let Some(language_id) = file.language_id {
            config.language_id = language_id;
        }
        if let Some(ms) = file.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(logging) = file.logging {
            config.logging.filter = logging.filter;
            config.logging.file = logging.file.map(PathBuf::from);
            if let Some(format) = logging.format {
                config.logging.format = Some(LogFormat::parse(&format).ok_or_else(|| {
                    crate::Error::InvalidInput(format!("unknown log format: {format}"))
                })?);
            }
        }

        Ok(config)
    }

    /// Sets the keyword dictionary path.
    #[must_use]
    pub fn with_keywords_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keywords_path = path.into();
        self
    }

    /// Sets the language id.
    #[must_use]
    pub fn with_language_id(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
