//! Storage abstraction for template collections
//!
//! A backend persists the whole collection at once: `fetch_all` returns
//! everything, `replace_all` overwrites everything.

mod file;
mod memory;
#[cfg(feature = "remote")]
mod remote;

pub use file::{FileStorage, JsonFile};
pub use memory::MemoryStorage;
#[cfg(feature = "remote")]
pub use remote::RemoteStorage;

use async_trait::async_trait;

use crate::error::Result;
use crate::template::Template;

/// Backing store for a template collection
#[async_trait]
pub trait TemplateStorage: Send + Sync {
    /// Fetch the persisted collection.
    ///
    /// Missing data yields an empty collection; data that cannot be decoded
    /// yields `MalformedPersistedData`.
    async fn fetch_all(&self) -> Result<Vec<Template>>;

    /// Overwrite the persisted collection with `templates`.
    ///
    /// Either the whole collection is written or the previous content is
    /// left in place.
    async fn replace_all(&self, templates: &[Template]) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}
