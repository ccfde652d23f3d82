//! Process-wide service registry with a managed lifecycle.
//!
//! Services are registered under unique names during startup, initialized in
//! registration order, looked up per request, and torn down in reverse order
//! at shutdown. Registration and initialization happen strictly before the
//! server accepts traffic, shutdown strictly after it stops; only `get` runs
//! concurrently, guarded by a read lock. Locks are never held across `.await`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::core::service::Service;

/// Lifecycle state of a registry entry. Transitions are monotonic
/// (`Registered -> Initialized -> ShutDown`) except `Failed`, which is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Registered,
    Initialized,
    Failed,
    ShutDown,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registered => "registered",
            Self::Initialized => "initialized",
            Self::Failed => "failed",
            Self::ShutDown => "shut_down",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service '{0}' is already registered")]
    DuplicateServiceName(String),

    #[error("service '{0}' is not registered")]
    ServiceNotFound(String),

    #[error("service '{name}' is not ready (state: {state})")]
    ServiceNotReady { name: String, state: ServiceState },

    #[error("service '{0}' has an unexpected concrete type")]
    ServiceTypeMismatch(String),
}

/// Named configuration slice handed to a service adapter at construction.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub enabled: bool,
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, config: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            config,
        }
    }

    /// Extract the slice for `server_manager.services.<name>` from resolved
    /// settings. Returns `None` if the section is absent.
    pub fn from_settings(settings: &Settings, name: &str) -> Option<Self> {
        let section = settings.get(&format!("server_manager.services.{name}"))?;
        let value = serde_json::to_value(section).ok()?;
        let mut config = match value {
            serde_json::Value::Object(map) => map,
            _ => return None,
        };
        let enabled = config
            .remove("enabled")
            .and_then(|flag| flag.as_bool())
            .unwrap_or(true);
        Some(Self {
            name: name.to_string(),
            enabled,
            config,
        })
    }

    /// String-typed lookup into the slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(serde_json::Value::as_str)
    }
}

struct Entry {
    service: Arc<dyn Service>,
    state: ServiceState,
}

/// Registry map plus the caller-controlled registration order.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    order: RwLock<Vec<String>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a service in state `Registered`. Fails if a service of the same
    /// name exists in any state other than `ShutDown`; a shut-down entry may
    /// be replaced (it keeps its original position in the order).
    pub fn register(&self, service: Arc<dyn Service>) -> Result<(), RegistryError> {
        let name = service.name().to_string();
        let mut entries = self.entries.write();

        if let Some(existing) = entries.get(&name) {
            if existing.state != ServiceState::ShutDown {
                return Err(RegistryError::DuplicateServiceName(name));
            }
        }

        entries.insert(
            name.clone(),
            Entry {
                service,
                state: ServiceState::Registered,
            },
        );

        let mut order = self.order.write();
        if !order.contains(&name) {
            order.push(name.clone());
        }
        drop(order);
        drop(entries);

        info!(service = %name, "service registered");
        Ok(())
    }

    /// Initialize every registered service in registration order. A failure
    /// marks that entry `Failed` and the pass continues, so one boot attempt
    /// reports every misconfigured service; already-initialized siblings stay
    /// `Initialized` (startup aborts on `false`, so no partial state serves
    /// traffic). Returns `true` only if all services reached `Initialized`.
    pub async fn initialize_all(&self) -> bool {
        let names: Vec<String> = self.order.read().clone();
        let mut all_ok = true;

        for name in names {
            let service = {
                let entries = self.entries.read();
                match entries.get(&name) {
                    Some(entry) if entry.state == ServiceState::Registered => {
                        Arc::clone(&entry.service)
                    }
                    _ => continue,
                }
            };

            match service.initialize().await {
                Ok(()) => {
                    self.set_state(&name, ServiceState::Initialized);
                    info!(service = %name, "service initialized");
                }
                Err(err) => {
                    self.set_state(&name, ServiceState::Failed);
                    error!(service = %name, error = %err, "service initialization failed");
                    all_ok = false;
                }
            }
        }

        all_ok
    }

    /// Look up an initialized service. Safe to call concurrently.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Service>, RegistryError> {
        let entries = self.entries.read();
        let entry = entries
            .get(name)
            .ok_or_else(|| RegistryError::ServiceNotFound(name.to_string()))?;
        if entry.state != ServiceState::Initialized {
            return Err(RegistryError::ServiceNotReady {
                name: name.to_string(),
                state: entry.state,
            });
        }
        Ok(Arc::clone(&entry.service))
    }

    /// Look up an initialized service and downcast to its concrete type.
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.get(name)?
            .into_any()
            .downcast::<T>()
            .map_err(|_| RegistryError::ServiceTypeMismatch(name.to_string()))
    }

    /// Current lifecycle state of a named entry.
    pub fn state(&self, name: &str) -> Option<ServiceState> {
        self.entries.read().get(name).map(|entry| entry.state)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.read().clone()
    }

    /// Tear down initialized services in reverse registration order.
    /// Best-effort: a failing teardown is logged and the pass continues.
    /// Every entry ends in `ShutDown` regardless of outcome.
    pub async fn shutdown(&self) {
        let names: Vec<String> = {
            let order = self.order.read();
            order.iter().rev().cloned().collect()
        };

        for name in names {
            let service = {
                let entries = self.entries.read();
                entries
                    .get(&name)
                    .filter(|entry| entry.state == ServiceState::Initialized)
                    .map(|entry| Arc::clone(&entry.service))
            };

            if let Some(service) = service {
                if let Err(err) = service.shutdown().await {
                    warn!(service = %name, error = %err, "service shutdown failed");
                } else {
                    info!(service = %name, "service shut down");
                }
            }

            self.set_state(&name, ServiceState::ShutDown);
        }
    }

    /// Aggregate health across all entries in registration order. The overall
    /// flag is true only when every entry is initialized and reports healthy.
    pub async fn health_report(&self) -> (bool, serde_json::Map<String, serde_json::Value>) {
        let mut services = serde_json::Map::new();
        let mut all_healthy = true;

        for name in self.names() {
            match self.get(&name) {
                Ok(service) => {
                    let status = service.health_check().await;
                    all_healthy &= status.healthy;
                    services.insert(
                        name,
                        serde_json::json!({
                            "status": if status.healthy { "healthy" } else { "unhealthy" },
                            "detail": status.detail,
                        }),
                    );
                }
                Err(err) => {
                    all_healthy = false;
                    let state = self
                        .state(&name)
                        .map(|state| state.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    services.insert(
                        name,
                        serde_json::json!({
                            "status": "unhealthy",
                            "state": state,
                            "detail": err.to_string(),
                        }),
                    );
                }
            }
        }

        (all_healthy, services)
    }

    fn set_state(&self, name: &str, state: ServiceState) {
        if let Some(entry) = self.entries.write().get_mut(name) {
            entry.state = state;
        }
    }
}
