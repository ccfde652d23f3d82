//! Layered configuration for the TTS gateway.
//!
//! Configuration is a YAML document resolved once at startup against an
//! [`EnvOverlay`] (process environment plus optional dotenv file, environment
//! winning on conflict). Placeholders of the form `${VAR}` / `${VAR:-default}`
//! are substituted during resolution; afterwards the tree is immutable and
//! addressed by dotted paths:
//!
//! ```rust,no_run
//! use tts_gateway::config::{EnvOverlay, Settings};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), tts_gateway::config::ConfigError> {
//! let overlay = EnvOverlay::from_process_env();
//! let settings = Settings::load(Path::new("config.yaml"), &overlay)?;
//! let port = settings.get_u64("server.port", 8000);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

mod env;
mod resolve;

pub use env::EnvOverlay;
pub use resolve::{is_unresolved, resolve};

/// Errors raised while loading the configuration document. All variants are
/// fatal at boot; the process must not start without a valid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable, dotted-path-addressable configuration tree.
#[derive(Debug, Clone)]
pub struct Settings {
    root: Value,
}

impl Settings {
    /// Load and resolve the configuration document from a file.
    pub fn load(path: &Path, overlay: &EnvOverlay) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_str(&contents, overlay)
    }

    /// Parse and resolve a configuration document from a string.
    pub fn from_str(contents: &str, overlay: &EnvOverlay) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(contents)?;
        Ok(Self {
            root: resolve(root, overlay),
        })
    }

    /// Walk the tree along a dotted path. Returns `None` the moment a key is
    /// absent or an intermediate node is not a mapping; never panics.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for key in path.split('.') {
            current = match current {
                Value::Mapping(mapping) => mapping.get(key)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// True if the dotted path exists in the tree.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn get_str(&self, path: &str, default: &str) -> String {
        self.get(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Integer lookup. Substituted values arrive as strings ("${PORT:-8000}"
    /// resolves to the string "8000"), so string leaves are parsed too.
    pub fn get_u64(&self, path: &str, default: u64) -> u64 {
        match self.get(path) {
            Some(Value::Number(number)) => number.as_u64().unwrap_or(default),
            Some(Value::String(text)) => text.parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.get(path) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Sequence-of-strings lookup; missing paths yield an empty list.
    pub fn get_str_list(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
app:
  name: "TTS Gateway"
  version: "1.0.0"
server:
  host: "${HOST:-0.0.0.0}"
  port: "${PORT:-8000}"
  reload: false
cors:
  allow_origins:
    - "*"
  allow_credentials: false
server_manager:
  services:
    minimax_tts:
      enabled: true
      api_key: "${MINIMAX_API_KEY}"
"#;

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        let overlay = EnvOverlay::from_pairs(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        Settings::from_str(SAMPLE, &overlay).unwrap()
    }

    #[test]
    fn missing_path_returns_default() {
        let settings = settings_with(&[]);
        assert_eq!(settings.get("server.nope"), None);
        assert_eq!(settings.get_str("server.nope", "fallback"), "fallback");
        assert_eq!(settings.get_u64("nope.deeper.still", 42), 42);
    }

    #[test]
    fn traversal_into_scalar_returns_default() {
        let settings = settings_with(&[]);
        // "app.name" is a string; descending further must not panic.
        assert_eq!(settings.get("app.name.deeper"), None);
        assert_eq!(settings.get_str("app.name.deeper", "d"), "d");
    }

    #[test]
    fn port_default_applies_without_env() {
        let settings = settings_with(&[]);
        assert_eq!(settings.get_u64("server.port", 0), 8000);
        assert_eq!(settings.get_str("server.port", ""), "8000");
    }

    #[test]
    fn port_env_overrides_default() {
        let settings = settings_with(&[("PORT", "9090")]);
        assert_eq!(settings.get_u64("server.port", 0), 9090);
    }

    #[test]
    fn unresolved_placeholder_is_preserved() {
        let settings = settings_with(&[]);
        let api_key = settings.get_str("server_manager.services.minimax_tts.api_key", "");
        assert_eq!(api_key, "${MINIMAX_API_KEY}");
        assert!(is_unresolved(&api_key));
    }

    #[test]
    fn typed_accessors() {
        let settings = settings_with(&[]);
        assert!(!settings.get_bool("server.reload", true));
        assert!(settings.get_bool("server_manager.services.minimax_tts.enabled", false));
        assert_eq!(settings.get_str_list("cors.allow_origins"), vec!["*"]);
        assert!(settings.get_str_list("cors.allow_methods").is_empty());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let overlay = EnvOverlay::from_pairs(std::iter::empty());
        let err = Settings::load(Path::new("/nonexistent/config.yaml"), &overlay).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_malformed_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "server: [unclosed").unwrap();
        file.flush().unwrap();

        let overlay = EnvOverlay::from_pairs(std::iter::empty());
        let err = Settings::load(file.path(), &overlay).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        file.flush().unwrap();

        let overlay = EnvOverlay::from_pairs(std::iter::empty());
        let settings = Settings::load(file.path(), &overlay).unwrap();
        assert_eq!(settings.get_str("app.name", ""), "TTS Gateway");
    }
}
