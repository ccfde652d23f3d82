//! Core service contracts and vendor adapters.

pub mod minimax;
pub mod service;

pub use service::{HealthStatus, Service, ServiceError, ServiceResult};
