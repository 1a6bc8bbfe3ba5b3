//! Calendar day enumeration over inclusive date ranges

use super::error::{PricingError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days. A missing `to` means a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: None }
    }

    /// Builds a range from timestamps, ignoring the time of day.
    pub fn from_datetimes(from: NaiveDateTime, to: Option<NaiveDateTime>) -> Self {
        Self {
            from: from.date(),
            to: to.map(|dt| dt.date()),
        }
    }

    /// Parses `YYYY-MM-DD` endpoints.
    pub fn parse(from: &str, to: Option<&str>) -> Result<Self> {
        let from = parse_day(from)?;
        let to = to.map(parse_day).transpose()?;
        Ok(Self { from, to })
    }

    pub fn end(&self) -> NaiveDate {
        self.to.unwrap_or(self.from)
    }

    /// Number of days covered, or an error for an inverted range.
    pub fn len_days(&self) -> Result<usize> {
        self.validate()?;
        Ok((self.end() - self.from).num_days() as usize + 1)
    }

    fn validate(&self) -> Result<()> {
        if self.from > self.end() {
            return Err(PricingError::InvalidRange {
                from: self.from,
                to: self.end(),
            });
        }
        Ok(())
    }
}

pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| PricingError::InvalidDate(value.to_string()))
}

/// Expands a range into every calendar day it covers, both endpoints
/// included, in ascending order.
pub fn enumerate(range: &DateRange) -> Result<Vec<NaiveDate>> {
    let len = range.len_days()?;
    let mut days = Vec::with_capacity(len);
    let mut current = range.from;
    while current <= range.end() {
        days.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_enumerate_inclusive_range() {
        let range = DateRange::new(day(2025, 2, 27), Some(day(2025, 3, 2)));
        let days = enumerate(&range).unwrap();

        assert_eq!(
            days,
            vec![
                day(2025, 2, 27),
                day(2025, 2, 28),
                day(2025, 3, 1),
                day(2025, 3, 2)
            ]
        );
    }

    #[test]
    fn test_enumerate_count_and_order() {
        for span in [0u64, 1, 6, 30, 365] {
            let from = day(2024, 12, 20);
            let to = from.checked_add_days(Days::new(span)).unwrap();
            let days = enumerate(&DateRange::new(from, Some(to))).unwrap();

            assert_eq!(days.len() as u64, span + 1);
            assert_eq!(days.first(), Some(&from));
            assert_eq!(days.last(), Some(&to));
            for pair in days.windows(2) {
                assert_eq!((pair[1] - pair[0]).num_days(), 1);
            }
        }
    }

    #[test]
    fn test_enumerate_single_day() {
        let days = enumerate(&DateRange::single(day(2025, 7, 4))).unwrap();
        assert_eq!(days, vec![day(2025, 7, 4)]);

        let same = DateRange::new(day(2025, 7, 4), Some(day(2025, 7, 4)));
        assert_eq!(enumerate(&same).unwrap(), vec![day(2025, 7, 4)]);
    }

    #[test]
    fn test_enumerate_inverted_range_fails() {
        let range = DateRange::new(day(2025, 3, 5), Some(day(2025, 3, 1)));
        let err = enumerate(&range).unwrap_err();

        assert_eq!(
            err,
            PricingError::InvalidRange {
                from: day(2025, 3, 5),
                to: day(2025, 3, 1)
            }
        );
    }

    #[test]
    fn test_from_datetimes_ignores_time_of_day() {
        let from = day(2025, 3, 1).and_hms_opt(23, 59, 0).unwrap();
        let to = day(2025, 3, 2).and_hms_opt(0, 1, 0).unwrap();
        let range = DateRange::from_datetimes(from, Some(to));

        assert_eq!(
            enumerate(&range).unwrap(),
            vec![day(2025, 3, 1), day(2025, 3, 2)]
        );
    }

    #[test]
    fn test_parse() {
        let range = DateRange::parse("2025-03-01", Some("2025-03-03")).unwrap();
        assert_eq!(range.len_days().unwrap(), 3);

        assert!(matches!(
            DateRange::parse("03/01/2025", None),
            Err(PricingError::InvalidDate(_))
        ));
    }
}
