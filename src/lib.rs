pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::{ConfigError, EnvOverlay, Settings};
pub use crate::core::{HealthStatus, Service, ServiceError, ServiceResult};
pub use errors::{ApiError, ApiResult};
pub use registry::{RegistryError, ServiceConfig, ServiceRegistry, ServiceState};
pub use state::AppState;
