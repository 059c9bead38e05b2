//! Template resolution
//!
//! Two literal, case-sensitive tokens are recognised:
//! - [`DATE_TOKEN`] is replaced by the current date as `D Month YYYY`
//! - [`INPUT_TOKEN`] is replaced positionally by caller-supplied values
//!
//! There is no escaping. Substituted values are never rescanned.

use time::{Date, OffsetDateTime};

/// Replaced by the date of resolution
pub const DATE_TOKEN: &str = "{today}";

/// Replaced by the next positional input
pub const INPUT_TOKEN: &str = "{input}";

/// Number of input tokens in `template`
pub fn required_input_count(template: &str) -> usize {
    template.matches(INPUT_TOKEN).count()
}

/// Number of date tokens in `template`
pub fn date_token_count(template: &str) -> usize {
    template.matches(DATE_TOKEN).count()
}

/// Resolve `template` against today's local date
pub fn resolve<S: AsRef<str>>(template: &str, inputs: &[S]) -> String {
    resolve_on(template, inputs, today())
}

/// Resolve `template` against a fixed date.
///
/// Input tokens take `inputs` in encounter order; tokens beyond the end of
/// `inputs` resolve to the empty string.
pub fn resolve_on<S: AsRef<str>>(template: &str, inputs: &[S], date: Date) -> String {
    let with_date = if date_token_count(template) > 0 {
        template.replace(DATE_TOKEN, &format_date(date))
    } else {
        template.to_string()
    };

    let mut resolved = String::with_capacity(with_date.len());
    let mut values = inputs.iter().map(AsRef::as_ref);
    let mut rest = with_date.as_str();

    while let Some(pos) = rest.find(INPUT_TOKEN) {
        resolved.push_str(&rest[..pos]);
        resolved.push_str(values.next().unwrap_or_default());
        rest = &rest[pos + INPUT_TOKEN.len()..];
    }
    resolved.push_str(rest);

    resolved
}

/// `5 March 2025`: day without leading zero, full month name, year
pub fn format_date(date: Date) -> String {
    format!("{} {} {}", date.day(), date.month(), date.year())
}

/// Today's date in the local timezone, falling back to UTC when the local
/// offset cannot be determined
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date!(2025 - 03 - 05)), "5 March 2025");
        assert_eq!(format_date(date!(2024 - 12 - 31)), "31 December 2024");
    }

    #[test]
    fn test_resolve_date_and_input() {
        let resolved = resolve_on(
            "Hello {input} on {today}",
            &["World"],
            date!(2025 - 03 - 05),
        );
        assert_eq!(resolved, "Hello World on 5 March 2025");
    }

    #[test]
    fn test_every_date_token_gets_same_value() {
        let resolved = resolve_on("{today}|{today}", &[] as &[&str], date!(2025 - 01 - 09));
        assert_eq!(resolved, "9 January 2025|9 January 2025");
    }

    #[test]
    fn test_missing_inputs_resolve_empty() {
        assert_eq!(resolve("{input}-{input}", &["a"]), "a-");
        assert_eq!(resolve("[{input}]", &[] as &[&str]), "[]");
    }

    #[test]
    fn test_extra_inputs_are_ignored() {
        assert_eq!(resolve("{input}", &["a", "b"]), "a");
    }

    #[test]
    fn test_no_tokens_unchanged() {
        assert_eq!(resolve("no tokens here", &[] as &[&str]), "no tokens here");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let resolved = resolve_on(
            "{input} {input}",
            &["{input}", "{today}"],
            date!(2025 - 03 - 05),
        );
        assert_eq!(resolved, "{input} {today}");
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!(resolve("{INPUT} {Today}", &["x"]), "{INPUT} {Today}");
        assert_eq!(required_input_count("{Input}"), 0);
    }

    #[test]
    fn test_required_input_count() {
        assert_eq!(required_input_count("{input} and {input}"), 2);
        assert_eq!(required_input_count("{today}"), 0);
        assert_eq!(date_token_count("{today} {input} {today}"), 2);
    }

    #[test]
    fn test_resolve_uses_today() {
        let expected = format!("Hello World on {}", format_date(today()));
        assert_eq!(resolve("Hello {input} on {today}", &["World"]), expected);
    }
}
