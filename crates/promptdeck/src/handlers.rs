//! Command handlers
//!
//! [`PromptDeck`] pairs a [`TemplateStore`] with a [`CopySession`] and exposes
//! one handler per user command. Every handler returns its outcome; nothing is
//! rendered here.

use time::OffsetDateTime;
use tracing::debug;

use crate::error::{PromptdeckError, Result};
use crate::session::{CopySession, CopyState};
use crate::store::{Committed, TemplateStore};
use crate::template::{Template, TemplateId};
use crate::transfer;

/// A file ready to be written by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

pub struct PromptDeck {
    store: TemplateStore,
    session: CopySession,
}

impl PromptDeck {
    pub fn new(store: TemplateStore) -> Self {
        Self::with_session(store, CopySession::new())
    }

    pub fn with_session(store: TemplateStore, session: CopySession) -> Self {
        Self { store, session }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn session(&self) -> &CopySession {
        &self.session
    }

    pub fn templates(&self) -> &[Template] {
        self.store.templates()
    }

    pub async fn on_add(&mut self, body: &str) -> Result<Committed<Template>> {
        self.store.add(body).await
    }

    pub async fn on_delete(&mut self, id: TemplateId) -> Committed<bool> {
        self.store.delete(id).await
    }

    /// Start a copy action for the template `id`.
    ///
    /// The returned state is `Resolved` when the template has no input
    /// tokens, `CollectingInputs` otherwise.
    pub fn on_copy_requested(&mut self, id: TemplateId) -> Result<&CopyState> {
        let template = self.store.get(id).ok_or(PromptdeckError::NotFound(id.0))?;
        debug!(id = %id, inputs = template.required_input_count(), "copy requested");

        let body = template.body.clone();
        Ok(self.session.request(&body))
    }

    /// Set input field `index` (0-based) of the current copy action
    pub fn on_input(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.session.set_input(index, value)
    }

    pub fn on_confirm(&mut self) -> Result<String> {
        self.session.confirm().map(str::to_string)
    }

    pub fn on_cancel(&mut self) {
        self.session.cancel();
    }

    /// Serialize the whole collection into a dated export file
    pub fn on_export(&self) -> Result<ExportFile> {
        Ok(ExportFile {
            file_name: transfer::export_file_name(OffsetDateTime::now_utc().date()),
            content: transfer::export_json(self.store.templates())?,
        })
    }

    /// Import the templates in `content`, appended after the existing ones.
    ///
    /// Malformed content is rejected wholesale and the store is unchanged.
    pub async fn on_import(&mut self, content: &str) -> Result<Committed<usize>> {
        let templates = transfer::parse_import(content)?;
        Ok(self.store.import(templates).await)
    }
}
