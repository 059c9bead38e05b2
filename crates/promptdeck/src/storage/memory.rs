use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::error::{PromptdeckError, Result};
use crate::template::Template;

use super::TemplateStorage;

/// In-memory storage implementation for testing and embedding
#[derive(Debug, Default)]
pub struct MemoryStorage {
    templates: Mutex<Option<Vec<Template>>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `templates`
    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            templates: Mutex::new(Some(templates)),
            fail_writes: Mutex::new(false),
        }
    }

    /// Make every subsequent `replace_all` fail (useful for testing)
    pub fn set_fail_writes(&self, fail: bool) {
        let mut flag = self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *flag = fail;
    }

    /// Snapshot of the persisted collection, `None` if never written
    pub fn snapshot(&self) -> Option<Vec<Template>> {
        self.templates.lock().ok().and_then(|t| t.clone())
    }
}

#[async_trait]
impl TemplateStorage for MemoryStorage {
    async fn fetch_all(&self) -> Result<Vec<Template>> {
        let templates = self
            .templates
            .lock()
            .map_err(|_| PromptdeckError::storage("Lock poisoned"))?;

        Ok(templates.clone().unwrap_or_default())
    }

    async fn replace_all(&self, templates: &[Template]) -> Result<()> {
        let fail = *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if fail {
            return Err(PromptdeckError::persist_failure("writes disabled"));
        }

        let mut stored = self
            .templates
            .lock()
            .map_err(|_| PromptdeckError::persist_failure("Lock poisoned"))?;

        *stored = Some(templates.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateId;
    use time::macros::datetime;

    #[tokio::test]
    async fn test_memory_storage_basic_operations() {
        let storage = MemoryStorage::new();
        assert!(storage.fetch_all().await.unwrap().is_empty());
        assert!(storage.snapshot().is_none());

        let template =
            Template::new(TemplateId(7), "hello", datetime!(2025-03-05 10:00 UTC)).unwrap();
        storage.replace_all(&[template.clone()]).await.unwrap();

        assert_eq!(storage.fetch_all().await.unwrap(), vec![template]);
    }

    #[tokio::test]
    async fn test_memory_storage_failing_writes() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);

        match storage.replace_all(&[]).await {
            Err(PromptdeckError::PersistFailure { reason }) => assert_eq!(reason, "writes disabled"),
            other => panic!("Expected PersistFailure, got {:?}", other),
        }
        assert!(storage.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_fail_writes_survives_poisoned_lock() {
        let storage = MemoryStorage::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _flag = storage.fail_writes.lock().unwrap();
            panic!("poison the flag");
        }));
        assert!(storage.fail_writes.is_poisoned());

        storage.set_fail_writes(true);
        assert!(matches!(
            storage.replace_all(&[]).await,
            Err(PromptdeckError::PersistFailure { reason }) if reason == "writes disabled"
        ));

        storage.set_fail_writes(false);
        storage.replace_all(&[]).await.unwrap();
        assert_eq!(storage.snapshot(), Some(Vec::new()));
    }
}
