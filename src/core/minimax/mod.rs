//! MiniMax text-to-speech vendor integration.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{MinimaxTts, SERVICE_NAME};
pub use config::{MinimaxConfig, DEFAULT_MODEL, MINIMAX_BASE_URL};
