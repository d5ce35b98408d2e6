//! Publish dates: parsing, canonical form and ordering

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::cmp::Reverse;

use super::Record;

/// Field every collection orders by
pub const DATE_FIELD: &str = "date";

/// A publish date as written by an author or stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDate {
    /// Calendar date without a time component
    Day(NaiveDate),
    /// A point in time (naive values are taken as UTC)
    Moment(DateTime<FixedOffset>),
}

impl PublishDate {
    /// The instant used for ordering; plain days count from midnight UTC
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            PublishDate::Day(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            PublishDate::Moment(dt) => dt.with_timezone(&Utc),
        }
    }

    /// Canonical string form: `YYYY-MM-DD` for days, RFC 3339 otherwise
    pub fn canonical(&self) -> String {
        match self {
            PublishDate::Day(d) => d.format("%Y-%m-%d").to_string(),
            PublishDate::Moment(dt) => dt.to_rfc3339(),
        }
    }

    /// Format with a strftime pattern
    pub fn format(&self, fmt: &str) -> String {
        match self {
            PublishDate::Day(d) => d.format(fmt).to_string(),
            PublishDate::Moment(dt) => dt.format(fmt).to_string(),
        }
    }
}

/// Parse a date string in the formats authors and the backend actually produce
pub fn parse_date(s: &str) -> Option<PublishDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(PublishDate::Moment(dt));
    }

    let zoned_formats = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%z"];
    for fmt in zoned_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(PublishDate::Moment(dt));
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(PublishDate::Moment(dt.and_utc().fixed_offset()));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(PublishDate::Day(d));
        }
    }

    None
}

/// Normalize a metadata date value to its canonical string form.
///
/// Unparseable strings are kept verbatim, other scalars are stringified.
/// Returns `None` for null.
pub fn canonical_date_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Value::String(
            parse_date(s).map(|d| d.canonical()).unwrap_or_else(|| s.clone()),
        )),
        Value::Number(n) => Some(Value::String(n.to_string())),
        other => Some(Value::String(other.to_string())),
    }
}

/// Ordering key for a record's publish date.
///
/// Variant order matters: records without a date sort below unparseable
/// dates, which sort below real dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Missing,
    Unparsed(String),
    Parsed(DateTime<Utc>),
}

/// Compute the ordering key of a record
pub fn date_key(record: &Record) -> DateKey {
    match record.get(DATE_FIELD) {
        None | Some(Value::Null) => DateKey::Missing,
        Some(Value::String(s)) => match parse_date(s) {
            Some(d) => DateKey::Parsed(d.instant()),
            None => DateKey::Unparsed(s.clone()),
        },
        Some(other) => DateKey::Unparsed(other.to_string()),
    }
}

/// Stable sort, newest first
pub fn sort_by_date_desc(records: &mut [Record]) {
    records.sort_by_cached_key(|r| Reverse(date_key(r)));
}

/// Human-readable date of a record, if it has one
pub fn display_date(record: &Record, fmt: &str) -> Option<String> {
    match record.get(DATE_FIELD)? {
        Value::String(s) => Some(parse_date(s).map(|d| d.format(fmt)).unwrap_or_else(|| s.clone())),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Whether a record list honours the newest-first invariant
pub fn is_sorted_desc(records: &[Record]) -> bool {
    records
        .windows(2)
        .all(|pair| date_key(&pair[0]) >= date_key(&pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(date: Option<&str>) -> Record {
        let mut r = Record::new();
        if let Some(d) = date {
            r.insert(DATE_FIELD.to_string(), json!(d));
        }
        r
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(
            parse_date("2023-12-15"),
            Some(PublishDate::Day(NaiveDate::from_ymd_opt(2023, 12, 15).unwrap()))
        );
        assert_eq!(
            parse_date("2023/12/15").map(|d| d.canonical()),
            Some("2023-12-15".to_string())
        );
        assert!(matches!(parse_date("2024-01-15 10:30:00"), Some(PublishDate::Moment(_))));
        assert!(matches!(parse_date("2024-01-15T10:30:00.000Z"), Some(PublishDate::Moment(_))));
        assert_eq!(parse_date("last tuesday"), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn test_canonical_date_value() {
        assert_eq!(canonical_date_value(&json!("2023/09/21")), Some(json!("2023-09-21")));
        assert_eq!(
            canonical_date_value(&json!("2024-01-15 10:30:00")),
            Some(json!("2024-01-15T10:30:00+00:00"))
        );
        assert_eq!(canonical_date_value(&json!("spring 2023")), Some(json!("spring 2023")));
        assert_eq!(canonical_date_value(&json!(2023)), Some(json!("2023")));
        assert_eq!(canonical_date_value(&Value::Null), None);
    }

    #[test]
    fn test_sort_mixed_formats() {
        // A plain string comparison would put "2023/12/01" above "2023-12-15"
        let mut records = vec![
            record(None),
            record(Some("2023/12/01")),
            record(Some("someday")),
            record(Some("2023-12-15")),
            record(Some("2024-01-02T08:00:00+02:00")),
        ];
        sort_by_date_desc(&mut records);

        let dates: Vec<_> = records
            .iter()
            .map(|r| r.get(DATE_FIELD).and_then(|v| v.as_str()).unwrap_or("-"))
            .collect();
        assert_eq!(
            dates,
            vec!["2024-01-02T08:00:00+02:00", "2023-12-15", "2023/12/01", "someday", "-"]
        );
        assert!(is_sorted_desc(&records));
    }

    #[test]
    fn test_display_date() {
        let r = record(Some("2023-11-03"));
        assert_eq!(display_date(&r, "%B %d, %Y"), Some("November 03, 2023".to_string()));
        assert_eq!(display_date(&record(None), "%Y"), None);
    }
}
