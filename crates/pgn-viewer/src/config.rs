//! Configuration file loading for the viewer.
//!
//! Settings come from `pgn-viewer.toml` in the working directory, or from a
//! file named on the command line. Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Display and perft settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Draw pieces with Unicode chess symbols instead of FEN letters.
    pub unicode: bool,
    /// Print rank and file labels around the board.
    pub coordinates: bool,
    /// Draw the board from Black's side.
    pub flip: bool,
    /// Depth used by `perft` when none is given.
    pub perft_depth: u32,
    /// Character drawn for an empty square.
    pub empty_square: char,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            unicode: false,
            coordinates: true,
            flip: false,
            perft_depth: 4,
            empty_square: '.',
        }
    }
}

impl ViewerConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`Self::config_path()`] is
    /// read if present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and parses the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Returns `pgn-viewer.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("pgn-viewer.toml")
    }
}
