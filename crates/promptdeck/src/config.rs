//! Storage location configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{PromptdeckError, Result};
use crate::storage::{FileStorage, TemplateStorage};

/// Default file name of the template collection
pub const DEFAULT_FILE: &str = "prompts.json";

/// Where the template collection lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    /// A JSON file on this device
    File(PathBuf),

    /// A promptdeck server, by base URL
    Remote(String),
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StorageLocation,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StorageLocation::File(path.into()),
        }
    }

    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            location: StorageLocation::Remote(base_url.into()),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `PROMPTDECK_REMOTE_URL` selects a server and takes precedence over
    /// `PROMPTDECK_FILE`; with neither set the default file is used.
    pub fn from_env() -> Result<Self> {
        if let Ok(url) = std::env::var("PROMPTDECK_REMOTE_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(PromptdeckError::Config(
                    "PROMPTDECK_REMOTE_URL is empty".to_string(),
                ));
            }
            return Ok(Self::remote(url));
        }

        Ok(Self::file(
            std::env::var("PROMPTDECK_FILE").unwrap_or_else(|_| DEFAULT_FILE.to_string()),
        ))
    }

    /// Build the storage backend for this location
    pub fn open_storage(&self) -> Result<Arc<dyn TemplateStorage>> {
        match &self.location {
            StorageLocation::File(path) => Ok(Arc::new(FileStorage::new(path))),
            #[cfg(feature = "remote")]
            StorageLocation::Remote(url) => Ok(Arc::new(crate::storage::RemoteStorage::new(url))),
            #[cfg(not(feature = "remote"))]
            StorageLocation::Remote(url) => Err(PromptdeckError::Config(format!(
                "remote storage ({}) requires the `remote` feature",
                url
            ))),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_FILE)
    }
}
