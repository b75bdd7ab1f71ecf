//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::html_escape;

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%B %d, %Y", "%b %d, %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

/// Generate a <time> element, with a `datetime` attribute when the text is a date
pub fn time_tag(date: &str) -> String {
    match parse_date_string(date) {
        Some(dt) => format!(
            r#"<time datetime="{}">{}</time>"#,
            dt.format("%Y-%m-%d"),
            html_escape(date)
        ),
        None => html_escape(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for s in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00+00:00",
            "January 15, 2024",
        ] {
            let dt = parse_date_string(s).unwrap_or_else(|| panic!("failed on {s}"));
            assert_eq!(dt.date(), expected, "{s}");
        }
    }

    #[test]
    fn test_parse_date_rejects_prose() {
        assert!(parse_date_string("last summer").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(
            time_tag("2023-01-01"),
            r#"<time datetime="2023-01-01">2023-01-01</time>"#
        );
        assert_eq!(time_tag("Spring <2023>"), "Spring &lt;2023&gt;");
    }
}
