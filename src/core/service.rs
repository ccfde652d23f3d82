//! Capability contract every managed backend service implements.
//!
//! The registry holds services as trait objects and drives their lifecycle
//! uniformly; domain-specific operations (synthesis, cloning) live on the
//! concrete adapter and are reached through [`Service::into_any`] downcasting.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by service adapters.
///
/// `MissingCredentials` and `InvalidConfiguration` are boot-time failures
/// raised from `initialize`; `Upstream` and `Http` are per-request vendor
/// failures and must never be swallowed by an adapter.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing credential: {0} is not set")]
    MissingCredentials(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Point-in-time health report for a single service.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub detail: serde_json::Value,
}

impl HealthStatus {
    pub fn healthy(detail: serde_json::Value) -> Self {
        Self {
            healthy: true,
            detail,
        }
    }

    pub fn unhealthy(detail: serde_json::Value) -> Self {
        Self {
            healthy: false,
            detail,
        }
    }
}

/// Lifecycle and health contract for a registered service.
#[async_trait]
pub trait Service: Send + Sync {
    /// Unique registry name for this service instance.
    fn name(&self) -> &str;

    /// Validate configuration and prepare the service for traffic. Called at
    /// most once per registry lifecycle, strictly before any request reaches
    /// the service. Required credentials must be checked here, not lazily on
    /// first use, so misconfiguration fails the boot.
    async fn initialize(&self) -> ServiceResult<()>;

    /// Release resources. Failures are logged by the registry and do not
    /// abort the teardown of other services.
    async fn shutdown(&self) -> ServiceResult<()>;

    async fn health_check(&self) -> HealthStatus;

    /// Upcast for downcasting to the concrete adapter type; lets the dispatch
    /// layer reach domain operations after an explicit registry lookup.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service").field("name", &self.name()).finish()
    }
}
