//! Calendar periods and window selector definitions.
//!
//! This module defines [`Period`], a calendar month that orders chronologically,
//! and the two enumerated window selectors the dashboard offers:
//! [`TrailingWindow`] for monthly tables and charts, [`AdWindow`] for
//! ad-platform tiles backed by daily series.

use chrono::{Datelike, Month, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KpiError, Result};

/// Days per month used when converting an [`AdWindow`] into a daily span.
pub const DAYS_PER_WINDOW_MONTH: usize = 30;

/// Earliest year a [`Period`] can hold. Matches the range of [`NaiveDate`].
pub const MIN_YEAR: i32 = -262_144;

/// Latest year a [`Period`] can hold. Matches the range of [`NaiveDate`].
pub const MAX_YEAR: i32 = 262_143;

/// A calendar month.
///
/// Ordering is chronological: by year, then by month number. Month names are
/// never compared lexically. Years are limited to [`MIN_YEAR`]..=[`MAX_YEAR`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, returning `None` when `month` is outside `1..=12` or
    /// `year` is outside the supported range.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 && year >= MIN_YEAR && year <= MAX_YEAR {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Returns the period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the period containing today's date according to the system clock (UTC).
    #[must_use]
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns the period `months` away from this one (negative moves backwards).
    ///
    /// Saturates at the first and last supported periods.
    #[must_use]
    pub const fn offset(&self, months: i32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        let year = index.div_euclid(12);
        if year < MIN_YEAR as i64 {
            Self {
                year: MIN_YEAR,
                month: 1,
            }
        } else if year > MAX_YEAR as i64 {
            Self {
                year: MAX_YEAR,
                month: 12,
            }
        } else {
            Self {
                year: year as i32,
                month: index.rem_euclid(12) as u32 + 1,
            }
        }
    }

    /// The month before this one.
    #[must_use]
    pub const fn previous(&self) -> Self {
        self.offset(-1)
    }

    /// The same month one year earlier.
    #[must_use]
    pub const fn year_ago(&self) -> Self {
        self.offset(-12)
    }

    /// First calendar day of the period.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of calendar days in the period, accounting for leap years.
    #[must_use]
    pub fn days_in_period(&self) -> u32 {
        match self.first_day() {
            Some(start) => start
                .checked_add_months(Months::new(1))
                .map_or(31, |end| (end - start).num_days() as u32),
            None => 30,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Month::try_from(self.month as u8) {
            Ok(month) => write!(f, "{} {}", month.name(), self.year),
            Err(_) => write!(f, "{}-{:02}", self.year, self.month),
        }
    }
}

/// Parses `"January 2024"`, `"Jan 2024"`, `"2024-01"` and `"2024-01-15"`.
impl FromStr for Period {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        if let Some((year, month)) = s.split_once('-') {
            if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
                return Self::new(year, month)
                    .ok_or_else(|| KpiError::Parse(format!("period out of range in '{s}'")));
            }
        }

        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(year), None) => {
                let month = name
                    .trim_end_matches(',')
                    .parse::<Month>()
                    .map_err(|_| KpiError::Parse(format!("unknown month name in '{s}'")))?;
                let year = year
                    .parse::<i32>()
                    .map_err(|e| KpiError::Parse(format!("invalid year in '{s}': {e}")))?;
                Self::new(year, month.number_from_month())
                    .ok_or_else(|| KpiError::Parse(format!("year out of range in '{s}'")))
            }
            _ => Err(KpiError::Parse(format!("unrecognized period label '{s}'"))),
        }
    }
}

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    month: u32,
}

impl TryFrom<PeriodParts> for Period {
    type Error = KpiError;

    fn try_from(parts: PeriodParts) -> Result<Self> {
        Self::new(parts.year, parts.month).ok_or_else(|| {
            KpiError::Parse(format!(
                "period out of range: year {}, month {}",
                parts.year, parts.month
            ))
        })
    }
}

/// Trailing window for monthly tables and trend charts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TrailingWindow {
    /// Last 3 months.
    Three,
    /// Last 6 months.
    Six,
    /// Last 12 months.
    #[default]
    Twelve,
    /// Last 24 months.
    TwentyFour,
}

impl TrailingWindow {
    /// All selectable windows, shortest first.
    pub const ALL: [Self; 4] = [Self::Three, Self::Six, Self::Twelve, Self::TwentyFour];

    /// Number of periods covered.
    #[must_use]
    pub const fn months(&self) -> usize {
        match self {
            Self::Three => 3,
            Self::Six => 6,
            Self::Twelve => 12,
            Self::TwentyFour => 24,
        }
    }
}

impl TryFrom<u32> for TrailingWindow {
    type Error = KpiError;

    fn try_from(months: u32) -> Result<Self> {
        match months {
            3 => Ok(Self::Three),
            6 => Ok(Self::Six),
            12 => Ok(Self::Twelve),
            24 => Ok(Self::TwentyFour),
            other => Err(KpiError::InvalidParameter(format!(
                "trailing window must be 3, 6, 12 or 24 months, got {other}"
            ))),
        }
    }
}

impl From<TrailingWindow> for u32 {
    fn from(window: TrailingWindow) -> Self {
        window.months() as Self
    }
}

/// Window for ad-platform tiles, applied to daily series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AdWindow {
    /// Last month.
    One,
    /// Last 3 months.
    #[default]
    Three,
    /// Last 6 months.
    Six,
    /// Last 9 months.
    Nine,
    /// Last 12 months.
    Twelve,
}

impl AdWindow {
    /// Number of months covered.
    #[must_use]
    pub const fn months(&self) -> usize {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Six => 6,
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }

    /// Number of daily entries covered.
    #[must_use]
    pub const fn days(&self) -> usize {
        self.months() * DAYS_PER_WINDOW_MONTH
    }
}

impl TryFrom<u32> for AdWindow {
    type Error = KpiError;

    fn try_from(months: u32) -> Result<Self> {
        match months {
            1 => Ok(Self::One),
            3 => Ok(Self::Three),
            6 => Ok(Self::Six),
            9 => Ok(Self::Nine),
            12 => Ok(Self::Twelve),
            other => Err(KpiError::InvalidParameter(format!(
                "ad window must be 1, 3, 6, 9 or 12 months, got {other}"
            ))),
        }
    }
}

impl From<AdWindow> for u32 {
    fn from(window: AdWindow) -> Self {
        window.months() as Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        let expected = Period::new(2024, 3).unwrap();
        assert_eq!("March 2024".parse::<Period>().unwrap(), expected);
        assert_eq!("Mar 2024".parse::<Period>().unwrap(), expected);
        assert_eq!("2024-03".parse::<Period>().unwrap(), expected);
        assert_eq!("2024-03-17".parse::<Period>().unwrap(), expected);
        assert_eq!("  march 2024 ".parse::<Period>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("Smarch 2024".parse::<Period>().is_err());
        assert!("2024-13".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
        assert!("March".parse::<Period>().is_err());
    }

    #[test]
    fn test_parse_rejects_years_outside_date_range() {
        assert!("January 300000000".parse::<Period>().is_err());
        assert!("300000000-01".parse::<Period>().is_err());
        assert!("January -300000000".parse::<Period>().is_err());
        assert!(serde_json::from_str::<Period>(r#"{"year": 300000000, "month": 1}"#).is_err());
        assert!(serde_json::from_str::<Period>(r#"{"year": 2024, "month": 0}"#).is_err());

        let last = format!("December {MAX_YEAR}").parse::<Period>().unwrap();
        assert_eq!(last.days_in_period(), 31);
    }

    #[test]
    fn test_offset_saturates_at_supported_range() {
        let first = Period::new(MIN_YEAR, 1).unwrap();
        let last = Period::new(MAX_YEAR, 12).unwrap();
        assert_eq!(first.previous(), first);
        assert_eq!(first.year_ago(), first);
        assert_eq!(last.offset(1), last);
        assert_eq!(last.offset(i32::MAX), last);
        assert_eq!(first.offset(i32::MIN), first);
        assert_eq!(last.previous(), Period::new(MAX_YEAR, 11).unwrap());
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let period = Period::new(2024, 7).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"year":2024,"month":7}"#);
        assert_eq!(serde_json::from_str::<Period>(&json).unwrap(), period);
    }

    #[test]
    fn test_chronological_order() {
        // Lexically "April" < "January", chronologically it is the reverse.
        let jan = "January 2024".parse::<Period>().unwrap();
        let apr = "April 2024".parse::<Period>().unwrap();
        let dec = "December 2023".parse::<Period>().unwrap();
        assert!(dec < jan);
        assert!(jan < apr);
    }

    #[test]
    fn test_offsets_cross_year_boundaries() {
        let jan = Period::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), Period::new(2023, 12).unwrap());
        assert_eq!(jan.year_ago(), Period::new(2023, 1).unwrap());
        assert_eq!(jan.offset(13), Period::new(2025, 2).unwrap());
    }

    #[test]
    fn test_days_in_period() {
        assert_eq!(Period::new(2024, 2).unwrap().days_in_period(), 29);
        assert_eq!(Period::new(2023, 2).unwrap().days_in_period(), 28);
        assert_eq!(Period::new(2024, 12).unwrap().days_in_period(), 31);
        assert_eq!(Period::new(2024, 4).unwrap().days_in_period(), 30);
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::new(2024, 7).unwrap().to_string(), "July 2024");
    }

    #[test]
    fn test_window_serde() {
        let window: TrailingWindow = serde_json::from_str("6").unwrap();
        assert_eq!(window, TrailingWindow::Six);
        assert!(serde_json::from_str::<TrailingWindow>("5").is_err());
        assert_eq!(serde_json::to_string(&AdWindow::Nine).unwrap(), "9");
        assert_eq!(AdWindow::One.days(), 30);
    }
}
