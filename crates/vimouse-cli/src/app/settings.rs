//! Loading and validating the configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use vimouse_core::config::Config;
use vimouse_core::error::ConfigError;

use super::paths::{self, ConfigSource};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Resolve, read, parse and validate the configuration.
pub fn load(flag: Option<&Path>) -> Result<Config, LoadError> {
    let source = paths::resolve_config(flag);
    let config = load_from(&source)?;
    config.validate()?;
    Ok(config)
}

fn load_from(source: &ConfigSource) -> Result<Config, LoadError> {
    let Some(path) = source.path() else {
        debug!("no config location, using built-in defaults");
        return Ok(Config::default());
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !source.is_explicit() => {
            debug!(path = %path.display(), "no user config, using built-in defaults");
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let config = serde_json::from_str(&text).map_err(|err| LoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}
