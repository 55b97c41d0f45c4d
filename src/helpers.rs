use chrono::{DateTime, NaiveDate};

use crate::error::Error;

/// Normalizes a stored or submitted billing date into a plain calendar date.
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; any time-of-day and
/// offset are discarded.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, Error> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    let timestamp = DateTime::parse_from_rfc3339(value)?;
    Ok(timestamp.date_naive())
}

/// Merges the built-in category list with the user's custom ones,
/// deduplicated, built-ins first.
pub fn merge_categories(
    builtin: &[&str],
    custom: Vec<String>,
) -> Vec<String> {
    let mut merged: Vec<String> =
        builtin.iter().map(|item| item.to_string()).collect();

    for category in custom {
        if !merged.contains(&category) {
            merged.push(category);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_calendar_date("2026-08-04").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2026, 8, 4));
    }

    #[test]
    fn test_parse_timestamp_discards_time() {
        let date = parse_calendar_date("2026-08-04T23:15:00+02:00").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2026, 8, 4));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_calendar_date("next tuesday").is_err());
        assert!(parse_calendar_date("").is_err());
    }

    #[test]
    fn test_merge_categories_dedupes() {
        let merged = merge_categories(
            &["music", "software"],
            vec![
                String::from("software"),
                String::from("gaming"),
                String::from("gaming"),
            ],
        );

        assert_eq!(merged, vec!["music", "software", "gaming"]);
    }

    #[test]
    fn test_merge_categories_no_custom() {
        let merged = merge_categories(&["music"], vec![]);
        assert_eq!(merged, vec!["music"]);
    }
}
