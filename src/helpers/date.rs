//! Date helper functions

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Write;

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    let mut formatted = String::new();
    match write!(formatted, "{}", date.format(&chrono_format)) {
        Ok(()) => formatted,
        Err(_) => format.to_string(),
    }
}

/// Check that a Moment.js-style format string can be rendered
pub fn validate_date_format(format: &str) -> Result<()> {
    let chrono_format = moment_to_chrono_format(format);
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("Invalid date format: {:?}", format);
    }
    Ok(())
}

/// Format a date in ISO 8601 form, as used by `<time datetime>`
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each field
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
    ];

    // Anything left after token replacement is literal text
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2024-01-05");
        assert_eq!(format_date(&date(), "MMMM DD, YYYY"), "January 05, 2024");
        assert_eq!(format_date(&date(), "YYYY/MM/DD HH:mm"), "2024/01/05 10:30");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date()), "2024-01-05T10:30:00+08:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("YYYY 100%"), "%Y 100%%");
    }

    #[test]
    fn test_literal_percent() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD 100%"), "2024-01-05 100%");
        assert_eq!(format_date(&date(), "%Q DD"), "%Q 05");
        assert!(validate_date_format("YYYY-MM-DD 100%").is_ok());
        assert!(validate_date_format("MMMM DD, YYYY").is_ok());
    }
}
