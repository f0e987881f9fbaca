//! Field validators shared by request bodies

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::ValidationError;

/// Accepts ISBN-10 and ISBN-13, with optional hyphens or spaces, checksum verified
pub fn validate_isbn(value: &str) -> Result<(), ValidationError> {
    if is_valid_isbn(value) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn").with_message("must be a valid ISBN-10 or ISBN-13".into()))
    }
}

/// Accepts an ISO 8601 date (`1775-12-16`, `1775-12`, `1775`) or date-time
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    if parse_iso_date(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("iso_date").with_message("must be a valid ISO 8601 date string".into()))
    }
}

pub fn is_valid_isbn(value: &str) -> bool {
    let compact: Vec<char> = value.chars().filter(|c| *c != '-' && *c != ' ').collect();
    match compact.len() {
        10 => {
            let mut sum = 0u32;
            for (i, &c) in compact.iter().enumerate() {
                let digit = match (i, c) {
                    (9, 'X') => 10,
                    _ => match c.to_digit(10) {
                        Some(d) => d,
                        None => return false,
                    },
                };
                sum += digit * (10 - i as u32);
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0u32;
            for (i, c) in compact.iter().enumerate() {
                let Some(d) = c.to_digit(10) else {
                    return false;
                };
                sum += if i % 2 == 0 { d } else { d * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Parse an ISO 8601 date or date-time into a UTC timestamp.
/// Bare dates and offset-less date-times are taken as UTC; a year or
/// year-month starts at the first day of that period.
pub fn parse_iso_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_reduced_date(value));
    if let Some(date) = date {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// `YYYY` or `YYYY-MM`
fn parse_reduced_date(value: &str) -> Option<NaiveDate> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    match value.split_once('-') {
        None if digits(value, 4) => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1),
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        _ => None,
    }
}
