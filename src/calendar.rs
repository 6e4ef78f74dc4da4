use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_with(raw: &str, resolve: fn(&DateTime<FixedOffset>) -> NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(resolve(&parsed));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses the date strings held by reports and CDRs as written, keeping the
/// wall-clock time of any offset. `None` means unparseable.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_with(raw, |parsed| parsed.naive_local())
}

/// Like [`parse_timestamp`], but offset timestamps are shifted to UTC so that
/// values from different offsets order by instant.
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    parse_with(raw, |parsed| parsed.naive_utc())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|timestamp| timestamp.date())
}

/// CDRs store their date and time separately.
pub fn cdr_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    parse_timestamp(&format!("{}T{}", date.trim(), time.trim()))
}

pub fn cdr_instant(date: &str, time: &str) -> Option<NaiveDateTime> {
    parse_instant(&format!("{}T{}", date.trim(), time.trim()))
}

/// `en-US` short month/day label, e.g. `Oct 5`.
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current and previous calendar month, anchored on `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub this_start: NaiveDate,
    pub last_start: NaiveDate,
    pub last_end: NaiveDate,
}

impl MonthWindow {
    pub fn for_today(today: NaiveDate) -> Self {
        let this_start = today - Duration::days(i64::from(today.day0()));
        let last_end = this_start - Duration::days(1);
        let last_start = last_end - Duration::days(i64::from(last_end.day0()));
        Self {
            this_start,
            last_start,
            last_end,
        }
    }

    /// Anything on or after the first of the month, future dates included.
    pub fn is_this_month(&self, date: NaiveDate) -> bool {
        date >= self.this_start
    }

    pub fn is_last_month(&self, date: NaiveDate) -> bool {
        date >= self.last_start && date <= self.last_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_date("2026-02-02"), Some(ymd(2026, 2, 2)));
        assert_eq!(parse_date("2026-02-02T14:30"), Some(ymd(2026, 2, 2)));
        assert_eq!(parse_date("2026-02-02 14:30:10"), Some(ymd(2026, 2, 2)));
        assert_eq!(parse_date("2026-02-02T14:30:10.250"), Some(ymd(2026, 2, 2)));
        assert_eq!(parse_date("2026-02-02T23:30:00+04:00"), Some(ymd(2026, 2, 2)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2026-13-40"), None);
    }

    #[test]
    fn instants_shift_offsets_to_utc() {
        let instant = parse_instant("2026-10-02T10:00:00+04:00").unwrap();
        assert_eq!(instant, ymd(2026, 10, 2).and_hms_opt(6, 0, 0).unwrap());
        let wall_clock = parse_timestamp("2026-10-02T10:00:00+04:00").unwrap();
        assert_eq!(wall_clock, ymd(2026, 10, 2).and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(
            parse_instant("2026-10-02T10:00"),
            parse_timestamp("2026-10-02T10:00")
        );
    }

    #[test]
    fn cdr_timestamp_combines_fields() {
        let timestamp = cdr_timestamp("2026-03-04", "09:15").unwrap();
        assert_eq!(timestamp, ymd(2026, 3, 4).and_hms_opt(9, 15, 0).unwrap());
        assert!(cdr_timestamp("2026-03-04", "late").is_none());
    }

    #[test]
    fn month_window_handles_year_boundary() {
        let window = MonthWindow::for_today(ymd(2026, 1, 15));
        assert_eq!(window.this_start, ymd(2026, 1, 1));
        assert_eq!(window.last_start, ymd(2025, 12, 1));
        assert_eq!(window.last_end, ymd(2025, 12, 31));
        assert!(window.is_last_month(ymd(2025, 12, 31)));
        assert!(!window.is_last_month(ymd(2026, 1, 1)));
        assert!(window.is_this_month(ymd(2026, 2, 3)));
    }

    #[test]
    fn month_window_handles_leap_february() {
        let window = MonthWindow::for_today(ymd(2024, 3, 1));
        assert_eq!(window.last_start, ymd(2024, 2, 1));
        assert_eq!(window.last_end, ymd(2024, 2, 29));
    }

    #[test]
    fn chart_label_matches_short_month_day() {
        assert_eq!(chart_label(ymd(2026, 10, 5)), "Oct 5");
        assert_eq!(chart_label(ymd(2026, 12, 25)), "Dec 25");
    }
}
