//! Inclusive season ranges and the precondition check applied before any
//! provider request is issued.

use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

use crate::constants::{FIRST_SUPPORTED_SEASON, SEASON_COMPLETE_MONTH};
use crate::error::AppError;

/// A validated, inclusive range of seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeasonRange {
    start: i32,
    end: i32,
}

impl SeasonRange {
    /// Validates `start..=end` against today's date.
    pub fn new(start: i32, end: i32) -> Result<Self, AppError> {
        Self::with_latest(start, end, latest_completed_season(Local::now().date_naive()))
    }

    /// Validates `start..=end` against an explicit latest completed season.
    pub fn with_latest(start: i32, end: i32, latest: i32) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::invalid_range(
                start,
                end,
                "end season precedes start season",
            ));
        }
        if start < FIRST_SUPPORTED_SEASON {
            return Err(AppError::invalid_range(
                start,
                end,
                format!("seasons before {FIRST_SUPPORTED_SEASON} are not supported"),
            ));
        }
        if end > latest {
            return Err(AppError::invalid_range(
                start,
                end,
                format!("season {end} is not complete (latest completed season is {latest})"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, season: i32) -> bool {
        (self.start..=self.end).contains(&season)
    }

    /// Seasons in ascending order.
    pub fn seasons(&self) -> impl Iterator<Item = i32> + use<> {
        self.start..=self.end
    }

    /// Number of seasons in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for SeasonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The most recent season whose games are all played as of `today`.
pub fn latest_completed_season(today: NaiveDate) -> i32 {
    if today.month() >= SEASON_COMPLETE_MONTH {
        today.year()
    } else {
        today.year() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_range() {
        let range = SeasonRange::with_latest(2021, 2023, 2023).unwrap();
        assert_eq!(range.seasons().collect::<Vec<_>>(), vec![2021, 2022, 2023]);
        assert_eq!(range.len(), 3);
        assert!(range.contains(2022));
        assert!(!range.contains(2024));
        assert_eq!(range.to_string(), "2021-2023");
    }

    #[test]
    fn test_single_season_range() {
        let range = SeasonRange::with_latest(2022, 2022, 2023).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.to_string(), "2022");
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = SeasonRange::with_latest(2023, 2022, 2023).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_unsupported_seasons_are_rejected() {
        assert!(SeasonRange::with_latest(1997, 2000, 2023).is_err());
        assert!(SeasonRange::with_latest(2022, 2024, 2023).is_err());
    }

    #[test]
    fn test_latest_completed_season() {
        let october = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();
        let november = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(latest_completed_season(october), 2023);
        assert_eq!(latest_completed_season(november), 2024);
        assert_eq!(latest_completed_season(march), 2024);
    }
}
