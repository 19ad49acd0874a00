//! Period math: ISO week numbers, period keys, and navigation
//!
//! A budget record is addressed by a period key - `2025_W07` for weekly
//! records, `2025_03` for monthly ones. The same formatting is used on both
//! the read and the write path so a record can never be orphaned by a
//! mismatched key.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Error, Result};

/// Weeks selectable in a year. Period navigation wraps at this boundary.
///
/// ISO years can have 53 weeks; navigation deliberately treats every year as
/// 52 weeks so stepping back from week 1 always lands on week 52. Week 53
/// records remain addressable directly.
pub const WEEKS_PER_YEAR: u32 = 52;

/// ISO week number for a date (week 1 contains the year's first Thursday).
///
/// Shifts the date to the Thursday of its week, then counts seven-day blocks
/// from Jan 1 of the shifted date's own year. The shift is what makes
/// year-boundary weeks come out right: Dec 29-31 can land in week 1 of the
/// next year, Jan 1-3 in week 52/53 of the previous one.
pub fn iso_week(date: NaiveDate) -> u32 {
    // Monday = 1 .. Sunday = 7
    let weekday = date.weekday().number_from_monday() as i64;
    let thursday = if weekday <= 4 {
        date.checked_add_days(Days::new((4 - weekday) as u64))
    } else {
        date.checked_sub_days(Days::new((weekday - 4) as u64))
    }
    // Only fails at the far edges of the representable date range
    .unwrap_or(date);

    // ceil(ordinal / 7) using the Thursday's own year as the baseline
    (thursday.ordinal() + 6) / 7
}

/// Identifies one weekly budget record: `(year, week 1..=53)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// Validated constructor. Week 53 is accepted - some ISO years have one.
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(Error::InvalidPeriod(format!(
                "week must be 1..=53, got {}",
                week
            )));
        }
        Ok(Self { year, week })
    }

    /// The key for the week containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let week = iso_week(date);
        // The ISO week can belong to the adjacent calendar year
        let year = if week == 1 && date.month() == 12 {
            date.year() + 1
        } else if week >= 52 && date.month() == 1 {
            date.year() - 1
        } else {
            date.year()
        };
        Self { year, week }
    }

    /// Storage key, e.g. `2025_W07`. Stable format shared by reads and writes.
    pub fn doc_id(&self) -> String {
        format!("{}_W{:02}", self.year, self.week)
    }

    /// One week earlier; wraps from week 1 to week 52 of the previous year.
    pub fn prev(&self) -> Self {
        if self.week == 1 {
            Self {
                year: self.year - 1,
                week: WEEKS_PER_YEAR,
            }
        } else {
            Self {
                year: self.year,
                week: self.week - 1,
            }
        }
    }

    /// One week later; wraps from week 52 to week 1 of the next year.
    pub fn next(&self) -> Self {
        if self.week >= WEEKS_PER_YEAR {
            Self {
                year: self.year + 1,
                week: 1,
            }
        } else {
            Self {
                year: self.year,
                week: self.week + 1,
            }
        }
    }

    /// Approximate first day of this week: Jan 1 plus `(week-1) * 7` days.
    ///
    /// Not calendar-exact; used only for bucketing weeks into display months.
    pub fn approximate_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, 1, 1)
            .and_then(|jan1| jan1.checked_add_days(Days::new(((self.week - 1) * 7) as u64)))
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.doc_id())
    }
}

/// Identifies one monthly budget record: `(year, month 1..=12)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod(format!(
                "month must be 1..=12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Storage key, e.g. `2025_03`.
    pub fn doc_id(&self) -> String {
        format!("{}_{:02}", self.year, self.month)
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.doc_id())
    }
}
