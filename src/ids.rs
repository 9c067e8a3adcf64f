//! Task identifier and timestamp utilities.
//!
//! ClickUp knows tasks by an opaque internal ID (`868z8d9q1`) and, when a
//! workspace enables them, by a human-assigned custom ID (`DEV-42`). Custom
//! IDs only resolve when the request also names the workspace, so callers
//! run every task ID through [`with_custom_id_params`].
//!
//! ClickUp timestamps are milliseconds since the Unix epoch; agents speak
//! ISO 8601. [`to_epoch_millis`] and [`from_epoch_millis`] convert between
//! the two. The conversion back to text drops the sub-second part.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static CUSTOM_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-[0-9]+$").expect("custom task ID pattern is valid"));

/// Naive date-time layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Whether `id` looks like a custom task ID (`LETTERS-DIGITS`, e.g. `DEV-42`).
#[must_use]
pub fn is_custom_id(id: &str) -> bool {
    CUSTOM_ID.is_match(id)
}

/// Add the query parameters ClickUp needs to resolve a custom task ID.
///
/// When `id` is a custom ID and a workspace is known, `custom_task_ids=true`
/// and `team_id=<workspace>` are appended. Otherwise `params` is returned
/// unchanged.
#[must_use]
pub fn with_custom_id_params(
    id: &str,
    workspace_id: Option<&str>,
    mut params: Vec<(String, String)>,
) -> Vec<(String, String)> {
    if let Some(workspace) = workspace_id.filter(|w| !w.is_empty()) {
        if is_custom_id(id) {
            params.push(("custom_task_ids".to_string(), "true".to_string()));
            params.push(("team_id".to_string(), workspace.to_string()));
        }
    }
    params
}

/// Parse a date or date-time string into milliseconds since the epoch.
///
/// Accepts RFC 3339 (`2026-03-15T14:30:00+02:00`), naive date-times with a
/// `T` or a space separator (read as UTC), and bare dates (midnight UTC).
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the string matches none of these.
pub fn to_epoch_millis(input: &str) -> Result<i64> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }

    Err(Error::InvalidDate(input.to_string()))
}

/// Format a millisecond timestamp as an RFC 3339 UTC string.
///
/// The milliseconds are floored to whole seconds first, so
/// `to_epoch_millis(&from_epoch_millis(m))` yields `m` rounded down to the
/// second. Timestamps outside chrono's range fall back to the raw number.
#[must_use]
pub fn from_epoch_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp(millis.div_euclid(1000), 0).map_or_else(
        || millis.to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Split a comma-separated string into trimmed, non-empty items.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_custom_id() {
        assert!(is_custom_id("DEV-42"));
        assert!(is_custom_id("A-1"));
        assert!(!is_custom_id("868z8d9q1"));
        assert!(!is_custom_id("dev-42"));
        assert!(!is_custom_id("DEV42"));
        assert!(!is_custom_id("DEV-"));
        assert!(!is_custom_id("-42"));
        assert!(!is_custom_id(" DEV-42"));
        assert!(!is_custom_id("DEV-42a"));
        assert!(!is_custom_id("DEV-\u{664}\u{662}"));
    }

    #[test]
    fn test_with_custom_id_params_adds_workspace() {
        let params = with_custom_id_params("DEV-42", Some("999"), Vec::new());
        assert_eq!(
            params,
            vec![
                ("custom_task_ids".to_string(), "true".to_string()),
                ("team_id".to_string(), "999".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_custom_id_params_without_workspace() {
        assert!(with_custom_id_params("DEV-42", None, Vec::new()).is_empty());
        assert!(with_custom_id_params("DEV-42", Some(""), Vec::new()).is_empty());
    }

    #[test]
    fn test_with_custom_id_params_keeps_existing() {
        let existing = vec![("include_subtasks".to_string(), "true".to_string())];
        let params = with_custom_id_params("868z8d9q1", Some("999"), existing.clone());
        assert_eq!(params, existing);

        let params = with_custom_id_params("DEV-1", Some("999"), existing);
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].0, "include_subtasks");
    }

    #[test]
    fn test_to_epoch_millis_formats() {
        assert_eq!(to_epoch_millis("1970-01-01").unwrap(), 0);
        assert_eq!(to_epoch_millis("2026-03-15").unwrap(), 1_773_532_800_000);
        assert_eq!(to_epoch_millis("2026-03-15T14:30:00").unwrap(), 1_773_585_000_000);
        assert_eq!(to_epoch_millis("2026-03-15 14:30:00").unwrap(), 1_773_585_000_000);
        assert_eq!(to_epoch_millis("2026-03-15T14:30").unwrap(), 1_773_585_000_000);
        assert_eq!(to_epoch_millis("2026-03-15T14:30:00Z").unwrap(), 1_773_585_000_000);
        assert_eq!(to_epoch_millis("2026-03-15T16:30:00+02:00").unwrap(), 1_773_585_000_000);
        assert_eq!(to_epoch_millis("2026-03-15T14:30:00.250Z").unwrap(), 1_773_585_000_250);
    }

    #[test]
    fn test_to_epoch_millis_rejects_garbage() {
        let err = to_epoch_millis("next tuesday").unwrap_err();
        assert!(matches!(err, Error::InvalidDate(ref s) if s == "next tuesday"));
        assert!(to_epoch_millis("").is_err());
        assert!(to_epoch_millis("2026-13-40").is_err());
        assert!(to_epoch_millis("1773585000000").is_err());
    }

    #[test]
    fn test_from_epoch_millis() {
        assert_eq!(from_epoch_millis(0), "1970-01-01T00:00:00Z");
        assert_eq!(from_epoch_millis(1_773_585_000_999), "2026-03-15T14:30:00Z");
        assert_eq!(from_epoch_millis(-1), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn test_sub_second_precision_is_dropped() {
        // Expected: the millisecond part does not survive the round trip.
        let m = 1_773_585_000_250;
        assert_eq!(to_epoch_millis(&from_epoch_millis(m)).unwrap(), 1_773_585_000_000);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    proptest! {
        #[test]
        fn prop_custom_ids_match(prefix in "[A-Z]{1,8}", number in 0u32..1_000_000) {
            let id = format!("{prefix}-{number}");
            prop_assert!(is_custom_id(&id));
        }

        #[test]
        fn prop_lowercase_ids_never_match(prefix in "[a-z]{1,8}", number in 0u32..1_000_000) {
            let id = format!("{prefix}-{number}");
            prop_assert!(!is_custom_id(&id));
        }

        #[test]
        fn prop_ids_without_hyphen_never_match(id in "[A-Za-z0-9]{0,16}") {
            prop_assert!(!is_custom_id(&id));
        }

        #[test]
        fn prop_round_trip_floors_to_second(m in -50_000_000_000_000i64..50_000_000_000_000i64) {
            let back = to_epoch_millis(&from_epoch_millis(m)).unwrap();
            prop_assert_eq!(back, m - m.rem_euclid(1000));
        }
    }
}
