//! Environment overlay used during configuration resolution.
//!
//! The overlay is the union of an optional dotenv-style file and the process
//! environment. On conflicting names the process environment wins, so a
//! `.env` file only supplies defaults for local development. The overlay is
//! consumed once while resolving placeholders and not retained afterwards.

use std::collections::HashMap;
use std::path::Path;

/// Flattened name -> value mapping consulted by placeholder resolution.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: HashMap<String, String>,
}

impl EnvOverlay {
    /// Build the overlay from an optional dotenv file plus the process
    /// environment. A missing or unreadable dotenv file is not an error;
    /// the file is optional by contract.
    pub fn load(dotenv_path: Option<&Path>) -> Self {
        let mut vars = HashMap::new();

        if let Some(path) = dotenv_path {
            if let Ok(iter) = dotenvy::from_path_iter(path) {
                for (name, value) in iter.flatten() {
                    vars.insert(name, value);
                }
            }
        }

        // Process environment takes precedence over dotenv values.
        vars.extend(std::env::vars());

        Self { vars }
    }

    /// Overlay backed by the process environment only.
    pub fn from_process_env() -> Self {
        Self::load(None)
    }

    /// Overlay built from explicit pairs. Useful for deterministic tests
    /// that must not depend on the ambient process environment.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            vars: pairs.into_iter().collect(),
        }
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}
