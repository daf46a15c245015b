use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, &'static str> {
    match raw {
        Some(value) => parse_date_value(value)
            .ok_or("`from`/`to` must be a valid date (YYYY-MM-DD or RFC3339)")
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_value_accepts_rfc3339_sql_and_plain_dates() {
        assert_eq!(
            parse_date_value("2024-06-03T09:30:00+05:30"),
            Some(date(2024, 6, 3))
        );
        assert_eq!(parse_date_value("2024-06-03 13:30:00"), Some(date(2024, 6, 3)));
        assert_eq!(parse_date_value("2024-06-03"), Some(date(2024, 6, 3)));
        assert!(parse_date_value("03/06/2024").is_none());
    }

    #[test]
    fn parse_optional_date_passes_none_through() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert!(parse_optional_date(Some("2024-02-30")).is_err());
    }
}
