use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The `YYYY-MM` key the backend groups monthly payments by.
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Reads the calendar date out of an ISO date or datetime string.
pub fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parses the value of an `<input type="date">`; empty means unset.
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn input_value(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_date(raw: &str) -> String {
    parse_row_date(raw)
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_datetime(raw: &str) -> String {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|dt| dt.format("%d.%m.%Y, %H:%M").to_string())
        .unwrap_or_else(|_| format_date(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_keys_are_zero_padded() {
        assert_eq!(YearMonth::new(2024, 3).key(), "2024-03");
        assert_eq!(YearMonth::new(2024, 12).key(), "2024-12");
    }

    #[test]
    fn month_name_out_of_range_is_empty() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn row_dates_accept_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 3);
        assert_eq!(parse_row_date("2024-05-03"), expected);
        assert_eq!(parse_row_date("2024-05-03T18:45:00.123456"), expected);
        assert_eq!(parse_row_date("garbage"), None);
        assert_eq!(parse_row_date(""), None);
    }

    #[test]
    fn empty_input_date_is_unset() {
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("  "), None);
        assert_eq!(
            parse_input_date("2024-01-31"),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn display_formats() {
        assert_eq!(format_date("2024-05-03T10:00:00"), "03.05.2024");
        assert_eq!(format_date(""), "-");
        assert_eq!(format_datetime("2024-05-03T09:07:00"), "03.05.2024, 09:07");
        assert_eq!(format_datetime("2024-05-03"), "03.05.2024");
    }
}
