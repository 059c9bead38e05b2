//! Error types for the promptdeck library
//!
//! None of these conditions is fatal to a running session. Validation errors
//! ask the user to correct their input, storage errors leave the in-memory
//! collection as the source of truth.

use thiserror::Error;

/// Main error type for the promptdeck library
#[derive(Error, Debug)]
pub enum PromptdeckError {
    /// A template body was empty or whitespace-only
    #[error("Template body must not be empty")]
    EmptyBody,

    /// The persisted collection exists but could not be decoded
    #[error("Persisted templates are malformed: {reason}")]
    MalformedPersistedData { reason: String },

    /// Writing the collection to the backing store failed
    #[error("Failed to persist templates: {reason}")]
    PersistFailure { reason: String },

    /// An import payload was not a JSON array of template records
    #[error("Invalid import file: {reason}")]
    MalformedImport { reason: String },

    /// Reading from the backing store failed (I/O or transport)
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    #[error("Template not found: {0}")]
    NotFound(i64),

    /// The largest id is already taken, so no later id can be issued
    #[error("No template ids left after {0}")]
    IdsExhausted(i64),

    /// Confirmation attempted while some input fields are blank
    #[error("Please fill in all input fields (missing: {})", format_fields(.fields))]
    MissingInputs { fields: Vec<usize> },

    #[error("Input field {index} out of range (template has {count} inputs)")]
    InvalidInput { index: usize, count: usize },

    #[error("No copy in progress")]
    NoCopyInProgress,

    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_fields(fields: &[usize]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PromptdeckError {
    pub fn malformed_data(reason: impl Into<String>) -> Self {
        Self::MalformedPersistedData {
            reason: reason.into(),
        }
    }

    pub fn persist_failure(reason: impl Into<String>) -> Self {
        Self::PersistFailure {
            reason: reason.into(),
        }
    }

    pub fn malformed_import(reason: impl Into<String>) -> Self {
        Self::MalformedImport {
            reason: reason.into(),
        }
    }

    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }

    /// Whether this error came from the validation layer (user can correct it)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyBody | Self::MissingInputs { .. } | Self::InvalidInput { .. }
        )
    }
}

/// Result type for promptdeck operations
pub type Result<T> = std::result::Result<T, PromptdeckError>;
