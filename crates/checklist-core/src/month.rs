use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of day slots every month view exposes. The grid deliberately shows
/// 31 slots even for shorter months; history entries simply never exist for
/// days a month does not have.
pub const DAYS_IN_MONTH: u32 = 31;

/// The (year, month) pair the whole grid views at once.
///
/// The month is a zero-based index (0 = January) to match the month-picker
/// surface. Changing the view never alters any task's history, only which
/// slice of it the date keys select.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewedMonth {
    year: i32,
    month: u32,
}

impl ViewedMonth {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!(month < 12, "month index out of range: {month}");
        Self { year, month }
    }

    /// View of the real-world current month.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.year(), today.month0())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index, 0..=11.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Key joining a day slot of this view to task history: `YYYY-MM-DD`
    /// with zero-padded month and day.
    pub fn date_key(&self, day: u32) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month + 1, day)
    }

    /// View shifted by `delta` whole months, rolling over year boundaries in
    /// either direction.
    pub fn shifted(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(delta);
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32,
        }
    }

    /// Same year, different month. Indices outside 0..=11 are ignored.
    pub fn with_month(self, month: u32) -> Self {
        if month < 12 {
            Self { month, ..self }
        } else {
            self
        }
    }

    /// True when `day` names `date` under this view.
    pub fn contains(&self, day: u32, date: NaiveDate) -> bool {
        date.day() == day && date.month0() == self.month && date.year() == self.year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_keys_are_zero_padded() {
        let march = ViewedMonth::new(2024, 2);
        assert_eq!(march.date_key(5), "2024-03-05");
        assert_eq!(march.date_key(31), "2024-03-31");
        let december = ViewedMonth::new(2024, 11);
        assert_eq!(december.date_key(1), "2024-12-01");
    }

    #[test]
    fn shifting_rolls_over_year_boundaries() {
        let december = ViewedMonth::new(2024, 11);
        assert_eq!(december.shifted(1), ViewedMonth::new(2025, 0));
        let january = ViewedMonth::new(2024, 0);
        assert_eq!(january.shifted(-1), ViewedMonth::new(2023, 11));
    }

    #[test]
    fn shifting_by_many_months_lands_on_the_right_year() {
        let march = ViewedMonth::new(2024, 2);
        assert_eq!(march.shifted(0), march);
        assert_eq!(march.shifted(12), ViewedMonth::new(2025, 2));
        assert_eq!(march.shifted(-15), ViewedMonth::new(2022, 11));
    }

    #[test]
    fn with_month_jumps_within_the_year() {
        let march = ViewedMonth::new(2024, 2);
        assert_eq!(march.with_month(6), ViewedMonth::new(2024, 6));
    }

    #[test]
    fn with_month_ignores_out_of_range_indices() {
        let march = ViewedMonth::new(2024, 2);
        assert_eq!(march.with_month(12), march);
    }

    #[test]
    fn contains_requires_all_three_fields_to_match() {
        let march = ViewedMonth::new(2024, 2);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(march.contains(5, date));
        assert!(!march.contains(6, date));
        assert!(!ViewedMonth::new(2024, 3).contains(5, date));
        assert!(!ViewedMonth::new(2023, 2).contains(5, date));
    }
}
