use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Parse a status/priority/role value using serde-deserialization.
///
/// Accepts lower-case and hyphenated spellings (`in-progress` for
/// `IN_PROGRESS`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_").to_ascii_uppercase();
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}' (expected YYYY-MM-DD): {error}"))
}

#[cfg(test)]
mod tests {
    use deck_core::enums::{Role, TaskStatus};

    use super::{parse_date, parse_enum};

    #[test]
    fn parses_lower_case_enum() {
        let status: TaskStatus = parse_enum("done", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn parses_hyphenated_spelling() {
        let status: TaskStatus = parse_enum("in-progress", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn parses_role_short_codes() {
        let role: Role = parse_enum("pm", "role").expect("role should parse");
        assert_eq!(role, Role::Manager);
        let role: Role = parse_enum("QA", "role").expect("role should parse");
        assert_eq!(role, Role::Tester);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<TaskStatus>("finished", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'finished'"));
    }

    #[test]
    fn parses_iso_dates_only() {
        assert!(parse_date("2026-03-02", "start").is_ok());
        assert!(parse_date("03/02/2026", "start").is_err());
    }
}
