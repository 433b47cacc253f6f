//! Location of the document store.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database file used when no location is configured.
pub const DEFAULT_DATABASE: &str = "media.db";

/// Where the document store lives.
///
/// The store is an embedded SQLite database, so the instance is named by a
/// file path rather than a host and port.
///
/// # Examples
///
/// ```
/// use rental_core::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{"path": "data/media.db"}"#)
///     .expect("parse config");
/// assert_eq!(config.path.as_str(), "data/media.db");
/// assert_eq!(StoreConfig::default().path.as_str(), "media.db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the SQLite database file. Parent directories are created on
    /// first connection.
    pub path: Utf8PathBuf,
}

impl StoreConfig {
    /// Configuration pointing at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load configuration from a JSON document on disk.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, StoreConfigError> {
        let file = rental_fs::open_utf8_file(path).map_err(|source| StoreConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| StoreConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE)
    }
}

/// Errors raised while loading a [`StoreConfig`].
#[derive(Debug, Error)]
pub enum StoreConfigError {
    /// The configuration file could not be opened.
    #[error("failed to open store configuration at {path}")]
    Open {
        /// Configuration file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file was not valid JSON for a [`StoreConfig`].
    #[error("failed to parse store configuration at {path}")]
    Parse {
        /// Configuration file location.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
}
