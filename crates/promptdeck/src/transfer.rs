//! Export and import of template collections as JSON files

use serde_json::Value;
use time::Date;

use crate::error::{PromptdeckError, Result};
use crate::template::Template;

/// Pretty-printed JSON array of `templates`
pub fn export_json(templates: &[Template]) -> Result<String> {
    serde_json::to_string_pretty(templates)
        .map_err(|e| PromptdeckError::persist_failure(format!("Failed to serialize export: {}", e)))
}

/// `prompt-templates-2025-03-05.json`
pub fn export_file_name(date: Date) -> String {
    format!(
        "prompt-templates-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parse an import file.
///
/// The content must be a JSON array whose every element is a template record;
/// otherwise nothing is imported.
pub fn parse_import(content: &str) -> Result<Vec<Template>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| PromptdeckError::malformed_import(format!("not valid JSON: {}", e)))?;

    if !value.is_array() {
        return Err(PromptdeckError::malformed_import("expected a JSON array"));
    }

    serde_json::from_value(value)
        .map_err(|e| PromptdeckError::malformed_import(format!("invalid template record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateId;
    use time::macros::{date, datetime};

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(date!(2025 - 03 - 05)),
            "prompt-templates-2025-03-05.json"
        );
    }

    #[test]
    fn test_export_then_parse_keeps_records() {
        let templates = vec![
            Template::new(TemplateId(2), "b {input}", datetime!(2025-03-05 10:00 UTC)).unwrap(),
            Template::new(TemplateId(1), "a {today}", datetime!(2025-03-04 10:00 UTC)).unwrap(),
        ];

        let json = export_json(&templates).unwrap();
        assert!(json.contains("\n  {"));
        assert_eq!(parse_import(&json).unwrap(), templates);
    }

    #[test]
    fn test_parse_import_rejects_non_array() {
        for content in [r#"{"id": 1}"#, "42", "\"text\"", "not json", ""] {
            assert!(
                matches!(
                    parse_import(content),
                    Err(PromptdeckError::MalformedImport { .. })
                ),
                "accepted {:?}",
                content
            );
        }
    }

    #[test]
    fn test_parse_import_rejects_partial_records() {
        let content = r#"[
            {"id": 1, "template": "ok", "createdAt": "2025-03-05T10:00:00Z"},
            {"id": 2}
        ]"#;
        assert!(matches!(
            parse_import(content),
            Err(PromptdeckError::MalformedImport { .. })
        ));
    }

    #[test]
    fn test_parse_import_empty_array() {
        assert!(parse_import("[]").unwrap().is_empty());
    }
}
