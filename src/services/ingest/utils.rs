use std::collections::HashSet;

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d{4}-\d{2}-\d{2}$",
        r"^\d{2}/\d{2}/\d{4}$",
        r"^\d{4}/\d{2}/\d{2}$",
        r"^\d{2}-\d{2}-\d{4}$",
        r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(:\d{2})?$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Builds a header name the way tabular readers usually do: blank cells become
/// `Unnamed: <idx>` and repeats get a `.1`, `.2`, ... suffix.
pub fn unique_header(cell: &Data, idx: usize, existing_names: &mut HashSet<String>) -> String {
    let raw = match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    };
    let base_name = if raw.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        raw
    };

    let mut cleaned = base_name.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{}.{}", base_name, counter);
        counter += 1;
    }

    cleaned
}

pub fn is_date_string(s: &str) -> bool {
    let s = s.trim();
    DATE_PATTERNS.iter().any(|re| re.is_match(s))
}

/// Parses a date-shaped string into milliseconds since the Unix epoch.
pub fn parse_date_string(s: &str) -> Option<i64> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Converts a spreadsheet serial date (days since 1899-12-30) into
/// milliseconds since the Unix epoch.
pub fn excel_serial_to_millis(serial: f64) -> Option<i64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let dt = epoch.checked_add_signed(chrono::Duration::milliseconds(millis))?;
    Some(dt.and_utc().timestamp_millis())
}
