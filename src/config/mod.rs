//! Codec configuration
//!
//! Two layers:
//! 1. Built-in defaults
//! 2. Optional TOML file
//!
//! ```toml
//! [stream]
//! max_string_bytes = 16777216
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ml_stream::{StreamLimits, DEFAULT_MAX_STRING_BYTES};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Codec configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Binary stream settings
    #[serde(default)]
    pub stream: StreamSection,
}

/// `[stream]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamSection {
    /// Largest accepted string length prefix in bytes
    #[serde(default = "default_max_string_bytes")]
    pub max_string_bytes: usize,
}

fn default_max_string_bytes() -> usize {
    DEFAULT_MAX_STRING_BYTES
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            max_string_bytes: default_max_string_bytes(),
        }
    }
}

impl CodecConfig {
    /// Parse a TOML document layered over the built-in defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), ?config, "loaded codec config");
        Ok(config)
    }

    /// Load a config file if one is given and exists, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Decode limits for [`ml_stream::StreamInput::with_limits`].
    pub fn stream_limits(&self) -> StreamLimits {
        StreamLimits {
            max_string_bytes: self.stream.max_string_bytes,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.max_string_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "stream.max_string_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
