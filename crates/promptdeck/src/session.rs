//! Input collection for a single copy action
//!
//! `Idle -> CollectingInputs -> Resolved`. A template without input tokens
//! resolves immediately; otherwise every field must be filled before
//! confirmation succeeds.

use time::Date;

use crate::error::{PromptdeckError, Result};
use crate::resolve;

/// Where a copy action currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,

    /// Waiting for one value per input token
    CollectingInputs { template: String, inputs: Vec<String> },

    /// Final text, ready for the clipboard
    Resolved(String),
}

/// Drives one copy action at a time
#[derive(Debug, Default)]
pub struct CopySession {
    state: CopyState,
    date: Option<Date>,
}

impl CopySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that resolves `{today}` against a fixed date
    pub fn with_date(date: Date) -> Self {
        Self {
            state: CopyState::Idle,
            date: Some(date),
        }
    }

    pub fn state(&self) -> &CopyState {
        &self.state
    }

    /// Start a copy action for `template`, discarding any previous one
    pub fn request(&mut self, template: &str) -> &CopyState {
        let count = resolve::required_input_count(template);

        self.state = if count == 0 {
            CopyState::Resolved(self.resolve(template, &[]))
        } else {
            CopyState::CollectingInputs {
                template: template.to_string(),
                inputs: vec![String::new(); count],
            }
        };

        &self.state
    }

    /// Set the value of input field `index` (0-based)
    pub fn set_input(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        match &mut self.state {
            CopyState::CollectingInputs { inputs, .. } => {
                let count = inputs.len();
                let slot = inputs
                    .get_mut(index)
                    .ok_or(PromptdeckError::InvalidInput { index, count })?;
                *slot = value.into();
                Ok(())
            }
            _ => Err(PromptdeckError::NoCopyInProgress),
        }
    }

    /// 1-based numbers of the fields that are still blank
    pub fn missing_fields(&self) -> Vec<usize> {
        match &self.state {
            CopyState::CollectingInputs { inputs, .. } => inputs
                .iter()
                .enumerate()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(i, _)| i + 1)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve with the collected inputs.
    ///
    /// With any blank field the state is left unchanged and the blank fields
    /// are reported.
    pub fn confirm(&mut self) -> Result<&str> {
        let resolved = match &self.state {
            CopyState::CollectingInputs { template, inputs } => {
                let fields = self.missing_fields();
                if !fields.is_empty() {
                    return Err(PromptdeckError::MissingInputs { fields });
                }
                self.resolve(template, inputs)
            }
            CopyState::Resolved(_) | CopyState::Idle => {
                return Err(PromptdeckError::NoCopyInProgress);
            }
        };

        self.state = CopyState::Resolved(resolved);
        Ok(self.resolved().unwrap_or_default())
    }

    /// Abandon the current action
    pub fn cancel(&mut self) {
        self.state = CopyState::Idle;
    }

    /// Text of the last resolved action
    pub fn resolved(&self) -> Option<&str> {
        match &self.state {
            CopyState::Resolved(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn resolve(&self, template: &str, inputs: &[String]) -> String {
        match self.date {
            Some(date) => resolve::resolve_on(template, inputs, date),
            None => resolve::resolve(template, inputs),
        }
    }
}
