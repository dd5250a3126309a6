//! Planner configuration: origins (people) and candidate destinations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named coordinate, used both as an origin (a person's home) and as a
/// destination (a candidate venue). Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Origins and destinations for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub origins: Vec<Location>,
    pub destinations: Vec<Location>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config file {path} lists no {section}")]
    Empty {
        path: PathBuf,
        section: &'static str,
    },
}

impl PlannerConfig {
    /// Load a config document from a JSON file.
    ///
    /// A missing file and a malformed file are distinct errors; both are
    /// fatal to the run.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // The scorer treats zero travel-time samples as a caller bug, so an
        // empty section must be rejected here, before any ranking starts.
        if config.origins.is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
                section: "origins",
            });
        }
        if config.destinations.is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
                section: "destinations",
            });
        }

        Ok(config)
    }
}
