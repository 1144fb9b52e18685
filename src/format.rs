//! Display Formatting
//!
//! Spanish date and timestamp rendering for tables and cards, plus the
//! `YYYY-MM-DD` form used by `<input type="date">`.

use chrono::{DateTime, Local, Locale, NaiveDate, NaiveTime, TimeZone, Utc};

/// `01/05/2024, 08:30` in the given zone
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%d/%m/%Y, %H:%M").to_string()
}

/// `-` for events the backend sent without a usable date
pub fn format_optional_timestamp<Tz: TimeZone>(at: Option<&DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.map(|at| format_timestamp(at, tz)).unwrap_or_else(|| "-".to_string())
}

/// `1 de mayo de 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%-d de %B de %Y", Locale::es_ES)
        .to_string()
}

/// Long date of an optional timestamp, `-` when missing
pub fn format_optional_date<Tz: TimeZone>(at: Option<&DateTime<Utc>>, tz: &Tz) -> String {
    match at {
        Some(at) => format_long_date(at.with_timezone(tz).date_naive()),
        None => "-".to_string(),
    }
}

pub fn input_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_timestamp_in_zone() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
        let central = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(format_timestamp(&at, &central), "01/05/2024, 08:30");
        assert_eq!(format_timestamp(&at, &Utc), "01/05/2024, 14:30");
        assert_eq!(format_optional_timestamp(Some(&at), &central), "01/05/2024, 08:30");
        assert_eq!(format_optional_timestamp(None, &central), "-");
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), "1 de mayo de 2024");
        assert_eq!(format_long_date(NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()), "25 de diciembre de 2023");
        assert_eq!(format_optional_date(None, &Utc), "-");
    }

    #[test]
    fn test_input_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(input_date(date), "2024-01-09");
        assert_eq!(parse_input_date("2024-01-09"), Some(date));
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("09/01/2024"), None);
    }
}
