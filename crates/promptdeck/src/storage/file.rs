use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{PromptdeckError, Result};
use crate::template::Template;

use super::TemplateStorage;

/// A single JSON document on disk, replaced atomically on every write
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the document is staged in before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read and decode the document, `None` if the file does not exist
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PromptdeckError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PromptdeckError::malformed_data(format!("{}: {}", self.path.display(), e)))
    }

    /// Pretty-print `value` to a staging file, then rename it over the
    /// document. A failed write leaves the previous document untouched.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| PromptdeckError::persist_failure(format!("Failed to serialize: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                PromptdeckError::persist_failure(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let staging = self.staging_path();
        fs::write(&staging, json).await.map_err(|e| {
            PromptdeckError::persist_failure(format!(
                "Failed to write {}: {}",
                staging.display(),
                e
            ))
        })?;

        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(PromptdeckError::persist_failure(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(path = %self.path.display(), "document written");
        Ok(())
    }
}

/// Template collection kept in a local JSON file
#[derive(Debug)]
pub struct FileStorage {
    file: JsonFile,
}

impl FileStorage {
    /// Create a file storage backed by the JSON file at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl TemplateStorage for FileStorage {
    async fn fetch_all(&self) -> Result<Vec<Template>> {
        Ok(self.file.read::<Vec<Template>>().await?.unwrap_or_default())
    }

    async fn replace_all(&self, templates: &[Template]) -> Result<()> {
        self.file.write(templates).await
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path().display())
    }
}
