//! The authoritative template collection
//!
//! The store owns the ordered sequence (newest first) and writes the whole
//! sequence to its backend after every mutation. The in-memory sequence stays
//! authoritative: a failed write is reported through [`Committed`] but never
//! rolls the mutation back.

use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{PromptdeckError, Result};
use crate::storage::TemplateStorage;
use crate::template::{Template, TemplateId};

/// Outcome of a mutation: its value, plus whether the collection was
/// persisted afterwards
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub persisted: Result<()>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    /// Collapse into a `Result`, treating a persistence failure as an error
    pub fn into_result(self) -> Result<T> {
        self.persisted.map(|_| self.value)
    }
}

/// Ordered template collection synchronised to a storage backend
pub struct TemplateStore {
    storage: Arc<dyn TemplateStorage>,
    templates: Vec<Template>,
    last_issued: i64,
    /// Cleared while the backend could not be read; writing then would
    /// replace a collection the store never saw
    in_sync: bool,
}

impl TemplateStore {
    /// Create an empty store; call [`TemplateStore::load`] to read the
    /// persisted collection
    pub fn new(storage: Arc<dyn TemplateStorage>) -> Self {
        Self {
            storage,
            templates: Vec::new(),
            last_issued: 0,
            in_sync: true,
        }
    }

    /// Create a store and load it.
    ///
    /// Malformed persisted data is logged and the store starts empty. Any
    /// other read failure is returned.
    pub async fn open(storage: Arc<dyn TemplateStorage>) -> Result<Self> {
        let mut store = Self::new(storage);
        match store.load().await {
            Ok(_) => Ok(store),
            Err(e @ PromptdeckError::MalformedPersistedData { .. }) => {
                warn!(storage = %store.storage.describe(), "starting with no templates: {}", e);
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the in-memory sequence with the persisted one.
    ///
    /// Malformed persisted data leaves the store empty. Any other failure
    /// leaves the sequence untouched and blocks [`TemplateStore::persist`]
    /// until a later load succeeds.
    pub async fn load(&mut self) -> Result<&[Template]> {
        match self.storage.fetch_all().await {
            Ok(templates) => {
                info!(count = templates.len(), storage = %self.storage.describe(), "templates loaded");
                self.templates = templates;
                self.in_sync = true;
            }
            Err(e @ PromptdeckError::MalformedPersistedData { .. }) => {
                self.templates.clear();
                self.in_sync = true;
                return Err(e);
            }
            Err(e) => {
                warn!(storage = %self.storage.describe(), "failed to load templates: {}", e);
                self.in_sync = false;
                return Err(e);
            }
        }

        self.last_issued = self.last_issued.max(self.max_id());
        Ok(&self.templates)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Create a template from `body` and insert it at the front.
    ///
    /// Blank bodies are refused with `EmptyBody` and leave the store
    /// unchanged.
    pub async fn add(&mut self, body: &str) -> Result<Committed<Template>> {
        let now = OffsetDateTime::now_utc();
        let id = self.next_id(now)?;
        let template = Template::new(id, body, now)?;
        self.last_issued = id.0;

        self.templates.insert(0, template.clone());
        info!(id = %template.id, "template added");

        Ok(Committed {
            value: template,
            persisted: self.persist().await,
        })
    }

    /// Remove the template with `id`; returns whether one was removed
    pub async fn delete(&mut self, id: TemplateId) -> Committed<bool> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        let removed = self.templates.len() != before;

        if removed {
            info!(id = %id, "template deleted");
        }

        Committed {
            value: removed,
            persisted: self.persist().await,
        }
    }

    /// Append imported templates after the existing ones.
    ///
    /// Ids are taken as-is: duplicates of existing ids are kept.
    pub async fn import(&mut self, templates: Vec<Template>) -> Committed<usize> {
        let count = templates.len();
        self.templates.extend(templates);
        self.last_issued = self.last_issued.max(self.max_id());
        info!(count, total = self.templates.len(), "templates imported");

        Committed {
            value: count,
            persisted: self.persist().await,
        }
    }

    /// Write the entire sequence to the backend
    pub async fn persist(&self) -> Result<()> {
        if !self.in_sync {
            return Err(PromptdeckError::persist_failure(format!(
                "{} was not loaded; not overwriting it",
                self.storage.describe()
            )));
        }

        self.storage.replace_all(&self.templates).await.map_err(|e| {
            warn!(storage = %self.storage.describe(), "failed to persist templates: {}", e);
            match e {
                e @ PromptdeckError::PersistFailure { .. } => e,
                other => PromptdeckError::persist_failure(other.to_string()),
            }
        })
    }

    /// Creation-time id, bumped past the last issued one so ids stay
    /// strictly increasing
    fn next_id(&self, now: OffsetDateTime) -> Result<TemplateId> {
        let TemplateId(candidate) = TemplateId::from_timestamp(now);
        let floor = self
            .last_issued
            .checked_add(1)
            .ok_or(PromptdeckError::IdsExhausted(self.last_issued))?;
        Ok(TemplateId(candidate.max(floor)))
    }

    fn max_id(&self) -> i64 {
        self.templates.iter().map(|t| t.id.0).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_next_id_is_monotonic() {
        let mut store = TemplateStore::new(Arc::new(MemoryStorage::new()));
        store.last_issued = i64::MAX - 10;
        let id = store.next_id(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(id, TemplateId(i64::MAX - 9));

        store.last_issued = i64::MAX;
        assert!(matches!(
            store.next_id(OffsetDateTime::now_utc()),
            Err(PromptdeckError::IdsExhausted(i64::MAX))
        ));
    }

    #[tokio::test]
    async fn test_malformed_load_leaves_store_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = TemplateStore::new(storage.clone());
        store.add("kept in memory").await.unwrap().into_result().unwrap();

        let failing: Arc<dyn TemplateStorage> = Arc::new(Corrupt);
        let mut store = TemplateStore { storage: failing, ..store };
        assert!(store.load().await.is_err());
        assert!(store.is_empty());
        assert!(store.in_sync);
    }

    struct Corrupt;

    #[async_trait::async_trait]
    impl TemplateStorage for Corrupt {
        async fn fetch_all(&self) -> Result<Vec<Template>> {
            Err(PromptdeckError::malformed_data("truncated"))
        }

        async fn replace_all(&self, _templates: &[Template]) -> Result<()> {
            Ok(())
        }

        fn describe(&self) -> String {
            "corrupt".to_string()
        }
    }
}
