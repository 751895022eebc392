use std::fmt::{Debug, Display, Formatter};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::prelude::*;

/// Calendar date range, both ends inclusive.
///
/// `start <= end` always holds: a reversed window cannot be constructed.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start <= end, "invalid window: start {start} is after end {end}");
        Ok(Self { start, end })
    }

    /// Window of `n_days` days ending at `today`, inclusive.
    pub fn last_days(today: NaiveDate, n_days: u64) -> Result<Self> {
        ensure!(n_days != 0, "a window must span at least one day");
        let start = today
            .checked_sub_days(Days::new(n_days - 1))
            .with_context(|| format!("{n_days} days before {today} is out of range"))?;
        Self::try_new(start, today)
    }

    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        (self.start <= date) && (date <= self.end)
    }

    #[must_use]
    pub const fn n_days(self) -> u64 {
        self.end.signed_duration_since(self.start).num_days().unsigned_abs() + 1
    }

    /// Adjacent window of the same length which ends the day before this one starts.
    pub fn previous(self) -> Result<Self> {
        let end = self
            .start
            .pred_opt()
            .with_context(|| format!("there is no day before {}", self.start))?;
        Self::last_days(end, self.n_days())
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl Debug for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() -> Result {
        let window = DateWindow::try_new(date(10), date(12))?;
        assert!(!window.contains(date(9)));
        assert!(window.contains(date(10)));
        assert!(window.contains(date(11)));
        assert!(window.contains(date(12)));
        assert!(!window.contains(date(13)));
        Ok(())
    }

    #[test]
    fn test_reversed_window_is_an_error() {
        let error = DateWindow::try_new(date(12), date(10)).unwrap_err();
        assert!(error.to_string().contains("invalid window"));
    }

    #[test]
    fn test_single_day_window() -> Result {
        let window = DateWindow::try_new(date(10), date(10))?;
        assert_eq!(window.n_days(), 1);
        assert_eq!(window.previous()?, DateWindow::try_new(date(9), date(9))?);
        Ok(())
    }

    #[test]
    fn test_previous() -> Result {
        let window = DateWindow::try_new(date(8), date(14))?;
        assert_eq!(window.previous()?, DateWindow::try_new(date(1), date(7))?);
        Ok(())
    }

    #[test]
    fn test_last_days() -> Result {
        assert_eq!(DateWindow::last_days(date(14), 7)?, DateWindow::try_new(date(8), date(14))?);
        assert!(DateWindow::last_days(date(14), 0).is_err());
        Ok(())
    }

    #[test]
    fn test_n_days_across_months() -> Result {
        let window = DateWindow::try_new(date(30), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())?;
        assert_eq!(window.n_days(), 4);
        assert_eq!(window.previous()?.to_string(), "2024-05-26..=2024-05-29");
        Ok(())
    }
}
