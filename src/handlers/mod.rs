//! HTTP request handlers.
//!
//! - `health` - aggregated health check and liveness probe
//! - `speech` - text-to-speech synthesis
//! - `voices` - voice cloning and the clone-and-generate workflow

pub mod health;
pub mod speech;
pub mod voices;
