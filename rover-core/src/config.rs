//! Config file loading shared by the relay and the controller.
//!
//! Each crate owns its config struct; this module only turns a file into
//! one. JSON is tried first, then TOML.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load a config struct from a JSON or TOML file.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
        .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))
}

/// Parse config content, JSON first, then TOML.
pub fn parse_config<T: DeserializeOwned>(content: &str) -> Result<T> {
    if let Ok(config) = serde_json::from_str::<T>(content) {
        return Ok(config);
    }

    toml::from_str::<T>(content).map_err(|e| Error::Configuration(e.to_string()))
}
