//! Shared application state handed to request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::registry::ServiceRegistry;

/// Immutable state built once at startup. Handlers resolve services from the
/// registry explicitly per request; there is no ambient global lookup.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<ServiceRegistry>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, registry: Arc<ServiceRegistry>) -> Self {
        Self { settings, registry }
    }

    pub fn service_name(&self) -> String {
        self.settings.get_str("app.name", "TTS Gateway")
    }

    pub fn version(&self) -> String {
        self.settings
            .get_str("app.version", env!("CARGO_PKG_VERSION"))
    }
}
