use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

/// Input does not match the `"<day> <month>"` grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("date does not match the \"day month\" format")]
pub struct InvalidDateFormat;

/// Matches free-text date expressions against the `"<day> <month>"` grammar
///
/// The month-name table is injected at construction, so matching never
/// depends on host locale settings. Keys produced by `parse` and `key_for`
/// compare by plain string equality.
#[derive(Clone, Copy)]
pub struct DateMatcher {
    months: &'static [&'static str; 12],
}

impl DateMatcher {
    pub fn new(months: &'static [&'static str; 12]) -> Self {
        Self { months }
    }

    /// Parse a free-text date expression into its canonical key
    ///
    /// Accepts one or two digits for the day (value 1-31, leading zero kept
    /// as typed), any run of whitespace between day and month, and any
    /// casing. No calendar validation: `"31 şubat"` is accepted.
    pub fn parse(&self, text: &str) -> Result<String, InvalidDateFormat> {
        let lowered = text.trim().to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let [day, month] = tokens.as_slice() else {
            return Err(InvalidDateFormat);
        };

        if day.len() > 2 || !day.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidDateFormat);
        }
        if !day.parse::<u8>().is_ok_and(|d| (1..=31).contains(&d)) {
            return Err(InvalidDateFormat);
        }
        if !self.months.contains(month) {
            return Err(InvalidDateFormat);
        }

        Ok(format!("{day} {month}"))
    }

    /// Canonical key for a calendar date, e.g. `"7 haziran"`
    pub fn key_for(&self, date: NaiveDate) -> String {
        format!("{} {}", date.day(), self.months[date.month0() as usize])
    }

    /// Canonical key for the current date on the process-local clock
    pub fn today(&self) -> String {
        self.key_for(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TURKISH_MONTHS;

    fn matcher() -> DateMatcher {
        DateMatcher::new(&TURKISH_MONTHS)
    }

    #[test]
    fn test_parse_valid_dates() {
        let m = matcher();
        assert_eq!(m.parse("7 haziran").unwrap(), "7 haziran");
        assert_eq!(m.parse("1 ocak").unwrap(), "1 ocak");
        assert_eq!(m.parse("31 aralık").unwrap(), "31 aralık");
        assert_eq!(m.parse("15 şubat").unwrap(), "15 şubat");
        assert_eq!(m.parse("9 ağustos").unwrap(), "9 ağustos");
    }

    #[test]
    fn test_parse_normalizes_casing_and_whitespace() {
        let m = matcher();
        assert_eq!(m.parse("7 HAZIRAN").unwrap(), "7 haziran");
        assert_eq!(m.parse("7 Haziran").unwrap(), "7 haziran");
        assert_eq!(m.parse("  7 haziran  ").unwrap(), "7 haziran");
        assert_eq!(m.parse("7   haziran").unwrap(), "7 haziran");
        assert_eq!(m.parse("7\thaziran").unwrap(), "7 haziran");
    }

    #[test]
    fn test_parse_keeps_leading_zero() {
        let m = matcher();
        assert_eq!(m.parse("07 haziran").unwrap(), "07 haziran");
        assert_eq!(m.parse("01 ocak").unwrap(), "01 ocak");
    }

    #[test]
    fn test_parse_rejects_bad_structure() {
        let m = matcher();
        assert!(m.parse("").is_err());
        assert!(m.parse("haziran").is_err());
        assert!(m.parse("7").is_err());
        assert!(m.parse("7haziran").is_err());
        assert!(m.parse("7 haziran 1990").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_day() {
        let m = matcher();
        assert!(m.parse("0 ocak").is_err());
        assert!(m.parse("00 ocak").is_err());
        assert!(m.parse("32 haziran").is_err());
        assert!(m.parse("123 ocak").is_err());
        assert!(m.parse("+7 ocak").is_err());
        assert!(m.parse("yedi haziran").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_month() {
        let m = matcher();
        assert_eq!(m.parse("7 june"), Err(InvalidDateFormat));
        assert!(m.parse("7 hazira").is_err());
        assert!(m.parse("7 hazirann").is_err());
    }

    #[test]
    fn test_parse_rejects_capital_dotless_i_months() {
        let m = matcher();
        // Lower-casing maps ASCII I to dotted i, which never equals the
        // table spellings with ı.
        assert_eq!(m.parse("13 MAYIS"), Err(InvalidDateFormat));
        assert_eq!(m.parse("5 KASIM"), Err(InvalidDateFormat));
        assert_eq!(m.parse("31 ARALIK"), Err(InvalidDateFormat));
        assert_eq!(m.parse("7 HAZİRAN"), Err(InvalidDateFormat)); // dotted İ
    }

    #[test]
    fn test_key_for() {
        let m = matcher();
        let d = |y, mo, da| NaiveDate::from_ymd_opt(y, mo, da).unwrap();
        assert_eq!(m.key_for(d(2024, 6, 7)), "7 haziran");
        assert_eq!(m.key_for(d(2024, 1, 1)), "1 ocak");
        assert_eq!(m.key_for(d(2024, 12, 31)), "31 aralık");
    }

    #[test]
    fn test_key_for_every_month_round_trips_through_parse() {
        let m = matcher();
        for month in 1..=12 {
            let key = m.key_for(NaiveDate::from_ymd_opt(2024, month, 5).unwrap());
            assert_eq!(m.parse(&key).unwrap(), key);
        }
    }

    #[test]
    fn test_today_is_parseable() {
        let m = matcher();
        let today = m.today();
        assert_eq!(m.parse(&today).unwrap(), today);
    }
}
