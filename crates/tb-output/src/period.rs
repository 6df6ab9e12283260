//! Accounting period normalization.
//!
//! Accepted inputs are `MM/YY`, `YYYYMM` and `YYYY-MM`. Anything else falls
//! back to the month of `today`, which callers must surface as a loss of
//! fidelity.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// How the normalized period was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    /// Input was already `MM/YY`.
    Given,
    /// Input was `YYYYMM` or `YYYY-MM`.
    Reformatted,
    /// Input was unusable; the current month was substituted.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedPeriod {
    pub month: u32,
    pub year: i32,
    pub source: PeriodSource,
}

impl NormalizedPeriod {
    /// `MM/YY`.
    pub fn label(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year.rem_euclid(100))
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }

    /// Midnight of the period's last day as `YYYY-MM-DD HH:MM:SS`.
    pub fn entry_date(&self) -> Option<String> {
        let midnight = self.last_day()?.and_hms_opt(0, 0, 0)?;
        Some(midnight.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    pub fn is_fallback(&self) -> bool {
        self.source == PeriodSource::Fallback
    }
}

/// Parse `input`, returning `None` when it matches no accepted format.
pub fn parse_period(input: &str) -> Option<NormalizedPeriod> {
    let input = input.trim();
    let bytes = input.as_bytes();
    let all_digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
    let (month, year, source) = match bytes.len() {
        5 if bytes[2] == b'/' && all_digits(&bytes[..2]) && all_digits(&bytes[3..]) => (
            input[..2].parse().ok()?,
            2000 + input[3..].parse::<i32>().ok()?,
            PeriodSource::Given,
        ),
        6 if all_digits(bytes) => (
            input[4..].parse().ok()?,
            input[..4].parse().ok()?,
            PeriodSource::Reformatted,
        ),
        7 if bytes[4] == b'-' && all_digits(&bytes[..4]) && all_digits(&bytes[5..]) => (
            input[5..].parse().ok()?,
            input[..4].parse().ok()?,
            PeriodSource::Reformatted,
        ),
        _ => return None,
    };
    (1..=12).contains(&month).then_some(NormalizedPeriod {
        month,
        year,
        source,
    })
}

/// Parse `input`, substituting the month of `today` when it is unusable.
pub fn normalize_period(input: &str, today: NaiveDate) -> NormalizedPeriod {
    parse_period(input).unwrap_or(NormalizedPeriod {
        month: today.month(),
        year: today.year(),
        source: PeriodSource::Fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    #[test]
    fn yyyymm_is_reformatted() {
        let period = normalize_period("202504", today());
        assert_eq!(period.label(), "04/25");
        assert_eq!(period.source, PeriodSource::Reformatted);
        assert_eq!(period.entry_date().as_deref(), Some("2025-04-30 00:00:00"));
    }

    #[test]
    fn accepted_formats() {
        assert_eq!(normalize_period("04/25", today()).source, PeriodSource::Given);
        assert_eq!(normalize_period("2025-04", today()).label(), "04/25");
        assert_eq!(normalize_period(" 12/24 ", today()).label(), "12/24");
    }

    #[test]
    fn leap_years_and_year_end() {
        let feb = normalize_period("02/24", today());
        assert_eq!(feb.entry_date().as_deref(), Some("2024-02-29 00:00:00"));
        let feb = normalize_period("202502", today());
        assert_eq!(feb.entry_date().as_deref(), Some("2025-02-28 00:00:00"));
        let dec = normalize_period("2025-12", today());
        assert_eq!(dec.entry_date().as_deref(), Some("2025-12-31 00:00:00"));
    }

    #[test]
    fn unusable_input_falls_back_to_today() {
        for input in ["", "April 2025", "13/25", "202513", "2025/04", "25-04"] {
            let period = normalize_period(input, today());
            assert!(period.is_fallback(), "{input} should fall back");
            assert_eq!(period.label(), "10/26");
        }
        assert!(parse_period("00/25").is_none());
    }
}
