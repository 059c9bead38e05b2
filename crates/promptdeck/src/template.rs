//! Template records

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::error::{PromptdeckError, Result};

/// Unique identifier for a template, derived from its creation time in
/// Unix milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TemplateId(pub i64);

impl TemplateId {
    /// Id for a record created at `at`
    pub fn from_timestamp(at: OffsetDateTime) -> Self {
        TemplateId((at.unix_timestamp_nanos() / 1_000_000) as i64)
    }
}

impl From<i64> for TemplateId {
    fn from(id: i64) -> Self {
        TemplateId(id)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored template
///
/// Serialized as `{ "id": 1700000000000, "template": "...", "createdAt": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    /// Unique identifier
    pub id: TemplateId,

    /// Raw template text with `{today}` and `{input}` tokens
    #[serde(rename = "template", alias = "body")]
    pub body: String,

    /// Creation timestamp
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Template {
    /// Create a template with an explicit id and creation time.
    ///
    /// The body is trimmed; a body that is empty after trimming is refused.
    pub fn new(id: TemplateId, body: &str, created_at: OffsetDateTime) -> Result<Self> {
        let body = body.trim();
        if body.is_empty() {
            return Err(PromptdeckError::EmptyBody);
        }

        Ok(Template {
            id,
            body: body.to_string(),
            created_at,
        })
    }

    /// Number of `{input}` tokens in the body
    pub fn required_input_count(&self) -> usize {
        crate::resolve::required_input_count(&self.body)
    }

    /// First line of the body, for listings
    pub fn title(&self) -> &str {
        self.body.lines().next().unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.body.matches('\n').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_new_trims_body() {
        let template = Template::new(
            TemplateId(1),
            "  Hello {input}\n",
            datetime!(2025-03-05 10:00 UTC),
        )
        .unwrap();
        assert_eq!(template.body, "Hello {input}");
        assert_eq!(template.required_input_count(), 1);
    }

    #[test]
    fn test_new_rejects_blank_body() {
        let at = datetime!(2025-03-05 10:00 UTC);
        assert!(matches!(
            Template::new(TemplateId(1), "", at),
            Err(PromptdeckError::EmptyBody)
        ));
        assert!(matches!(
            Template::new(TemplateId(1), " \n\t ", at),
            Err(PromptdeckError::EmptyBody)
        ));
    }

    #[test]
    fn test_id_from_timestamp_is_millis() {
        let id = TemplateId::from_timestamp(datetime!(2023-11-14 22:13:20.123 UTC));
        assert_eq!(id, TemplateId(1_700_000_000_123));
    }

    #[test]
    fn test_json_shape() {
        let template = Template::new(
            TemplateId(1_700_000_000_000),
            "Summarise {input}",
            datetime!(2023-11-14 22:13:20 UTC),
        )
        .unwrap();

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["id"], 1_700_000_000_000_i64);
        assert_eq!(value["template"], "Summarise {input}");
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_reads_browser_iso_timestamps_and_body_alias() {
        let json = r#"{"id": 1700000000000, "body": "x", "createdAt": "2023-11-14T22:13:20.000Z"}"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.body, "x");
        assert_eq!(template.created_at, datetime!(2023-11-14 22:13:20 UTC));
    }

    #[test]
    fn test_title_and_line_count() {
        let template = Template::new(
            TemplateId(1),
            "first\nsecond\nthird\nfourth",
            datetime!(2025-03-05 10:00 UTC),
        )
        .unwrap();
        assert_eq!(template.title(), "first");
        assert_eq!(template.line_count(), 4);
    }
}
