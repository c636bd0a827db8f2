/// Utilities for date and time formatting
///
/// Provides consistent date/time formatting for the dashboard header
use contracts::dashboards::d404_campus_pulse::DateRange;

/// Day part of an ISO timestamp
/// Example: "2021-01-01T05:00:00" or "2021-01-01 05:00:00" -> "2021-01-01"
pub fn date_part(datetime_str: &str) -> &str {
    datetime_str
        .split(['T', ' '])
        .next()
        .unwrap_or(datetime_str)
}

/// Human readable span of the ratings in view
/// Example: start "2021-01-01T00:00:00", end "2021-02-11T15:00:00" -> "2021-01-01 to 2021-02-11"
pub fn format_date_range(range: &DateRange) -> String {
    match (range.start.as_deref(), range.end.as_deref()) {
        (Some(start), Some(end)) => format!("{} to {}", date_part(start), date_part(end)),
        (Some(start), None) => format!("since {}", date_part(start)),
        (None, Some(end)) => format!("until {}", date_part(end)),
        (None, None) => "no ratings".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-03-15T14:02:26.123Z"), "2024-03-15");
        assert_eq!(date_part("2024-03-15 14:02:26"), "2024-03-15");
        assert_eq!(date_part("invalid"), "invalid");
    }

    #[test]
    fn test_format_date_range() {
        let range = DateRange {
            start: Some("2021-01-01T00:00:00".to_string()),
            end: Some("2021-02-11T15:00:00".to_string()),
        };
        assert_eq!(format_date_range(&range), "2021-01-01 to 2021-02-11");
        assert_eq!(format_date_range(&DateRange::default()), "no ratings");
    }
}
