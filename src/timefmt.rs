use chrono::{DateTime, FixedOffset, Local, TimeZone};

/// Fixed human-readable start-time pattern, e.g. "Wed, 01 May 2013 12:00:00".
pub const START_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Format a start time in the local timezone.
pub fn format_start_time(time: &DateTime<FixedOffset>) -> String {
    format_in(time, &Local)
}

pub(crate) fn format_in<Tz: TimeZone>(time: &DateTime<FixedOffset>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.with_timezone(tz).format(START_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc() {
        let time = DateTime::parse_from_rfc3339("2013-05-01T12:00:00Z").unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_in(&time, &utc), "Wed, 01 May 2013 12:00:00");
    }

    #[test]
    fn test_format_converts_timezone() {
        let time = DateTime::parse_from_rfc3339("2013-05-01T12:00:00Z").unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_in(&time, &plus_two), "Wed, 01 May 2013 14:00:00");
    }

    #[test]
    fn test_local_format_matches_chrono_conversion() {
        let time = DateTime::parse_from_rfc3339("2013-05-01T12:00:00Z").unwrap();
        let expected = time
            .with_timezone(&Local)
            .format(START_TIME_FORMAT)
            .to_string();
        assert_eq!(format_start_time(&time), expected);
    }
}
