//! Promptdeck stores reusable text templates and resolves their
//! placeholders: `{today}` becomes the current date, each `{input}` takes
//! the next user-supplied value.
//!
//! ```rust,no_run
//! use promptdeck::{StoreConfig, TemplateStore, resolve};
//!
//! # async fn example() -> promptdeck::Result<()> {
//! let storage = StoreConfig::file("prompts.json").open_storage()?;
//! let mut store = TemplateStore::open(storage).await?;
//!
//! let added = store.add("Summarise {input} as of {today}").await?;
//! let text = resolve(&added.value.body, &["the quarterly report"]);
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod resolve;
pub mod session;
pub mod storage;
pub mod store;
pub mod template;
pub mod transfer;

// Re-export core types
pub use config::{StorageLocation, StoreConfig};
pub use error::{PromptdeckError, Result};
pub use handlers::{ExportFile, PromptDeck};
pub use resolve::{DATE_TOKEN, INPUT_TOKEN, format_date, required_input_count, resolve, resolve_on};
pub use session::{CopySession, CopyState};
pub use storage::{FileStorage, JsonFile, MemoryStorage, TemplateStorage};
pub use store::{Committed, TemplateStore};
pub use template::{Template, TemplateId};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
