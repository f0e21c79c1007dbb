//! Reporting period handling

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::ReportError;

/// Inclusive reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// Build a period from explicit request bounds, used verbatim.
    pub fn from_bounds(from: &str, to: &str) -> crate::Result<Self> {
        let start = parse_report_date(from)?;
        let end = parse_report_date(to)?;
        if end < start {
            return Err(ReportError::Input(format!(
                "report period ends before it starts: {} .. {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The ISO week (Monday through Sunday) containing `today`.
    pub fn current_week(today: NaiveDate) -> Self {
        let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }
}

/// Parse a request date: ISO-8601 with an optional time component, trailing
/// `Z` stripped before parsing.
pub fn parse_report_date(value: &str) -> crate::Result<NaiveDate> {
    let trimmed = value.trim().trim_end_matches('Z');
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|err| ReportError::Input(format!("invalid date '{}': {}", value, err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        assert_eq!(parse_report_date("2025-09-08").unwrap(), expected);
        assert_eq!(parse_report_date("2025-09-08T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_report_date("2025-09-08T14:30:00").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_report_date("last tuesday").is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(ReportPeriod::from_bounds("2025-09-08", "2025-09-01").is_err());
    }

    #[test]
    fn current_week_runs_monday_through_sunday() {
        // 2025-09-10 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let period = ReportPeriod::current_week(wednesday);

        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 9, 8).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 9, 14).unwrap());
        assert_eq!(period.start.weekday(), chrono::Weekday::Mon);
        assert_eq!(period.end.weekday(), chrono::Weekday::Sun);
    }

    #[test]
    fn current_week_is_stable_on_monday_and_sunday() {
        let monday = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();

        assert_eq!(ReportPeriod::current_week(monday), ReportPeriod::current_week(sunday));
    }
}
