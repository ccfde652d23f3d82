//! MiniMax adapter configuration.

use zeroize::Zeroize;

use crate::config::is_unresolved;
use crate::core::service::{ServiceError, ServiceResult};
use crate::registry::ServiceConfig;

/// Default MiniMax API endpoint.
pub const MINIMAX_BASE_URL: &str = "https://api.minimax.chat";

/// Default speech model.
pub const DEFAULT_MODEL: &str = "speech-02-hd";

/// Credential and endpoint slice for the MiniMax TTS adapter, built from the
/// resolved `server_manager.services.minimax_tts` configuration section.
#[derive(Clone)]
pub struct MinimaxConfig {
    /// Bearer token for the MiniMax API (`MINIMAX_API_KEY`).
    pub api_key: String,
    /// Account/group identifier appended to every request (`MINIMAX_GROUP_ID`).
    pub group_id: String,
    /// API origin; overridable for tests and proxies.
    pub base_url: String,
    /// Speech model used for synthesis.
    pub model: String,
}

impl MinimaxConfig {
    pub fn from_service_config(config: &ServiceConfig) -> Self {
        Self {
            api_key: config.get_str("api_key").unwrap_or_default().to_string(),
            group_id: config.get_str("group_id").unwrap_or_default().to_string(),
            base_url: config
                .get_str("base_url")
                .unwrap_or(MINIMAX_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config.get_str("model").unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }

    /// Validate required credentials. An empty value and a leftover
    /// `${VAR}` placeholder both count as missing.
    pub fn validate(&self) -> ServiceResult<()> {
        credential(&self.api_key, "api_key")?;
        credential(&self.group_id, "group_id")?;
        Ok(())
    }
}

fn credential(value: &str, key: &'static str) -> ServiceResult<()> {
    if value.trim().is_empty() || is_unresolved(value) {
        return Err(ServiceError::MissingCredentials(key.to_string()));
    }
    Ok(())
}

// The bearer token never appears in debug output.
impl std::fmt::Debug for MinimaxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimaxConfig")
            .field("api_key", &"<redacted>")
            .field("group_id", &self.group_id)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

// Clear the bearer token from memory once the config is dropped.
impl Drop for MinimaxConfig {
    fn drop(&mut self) {
        self.api_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slice(fields: serde_json::Value) -> ServiceConfig {
        let map = match fields {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        ServiceConfig::new("minimax_tts", map)
    }

    #[test]
    fn defaults_applied() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "api_key": "key",
            "group_id": "group",
        })));
        assert_eq!(config.base_url, MINIMAX_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "api_key": "key",
            "group_id": "group",
            "base_url": "http://localhost:9000/",
        })));
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn missing_api_key_rejected() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "group_id": "group",
        })));
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::MissingCredentials(key) if key == "api_key"
        ));
    }

    #[test]
    fn unresolved_placeholder_counts_as_missing() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "api_key": "${MINIMAX_API_KEY}",
            "group_id": "group",
        })));
        assert!(matches!(
            config.validate().unwrap_err(),
            ServiceError::MissingCredentials(key) if key == "api_key"
        ));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "api_key": "super-secret-token",
            "group_id": "group",
        })));
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("group"));
    }

    #[test]
    fn missing_group_id_rejected() {
        let config = MinimaxConfig::from_service_config(&slice(json!({
            "api_key": "key",
            "group_id": "",
        })));
        assert!(matches!(
            config.validate().unwrap_err(),
            ServiceError::MissingCredentials(key) if key == "group_id"
        ));
    }
}
