//! Sunday-first calendar weeks.

use chrono::{Datelike, Days, Months, NaiveDate};

pub const DAYS_IN_WEEK: usize = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years a request date may fall in. Week and month arithmetic on any date
/// in this range stays within chrono's calendar.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// A calendar week starting on a Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    /// Returns the week that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_sunday());
        Self {
            start: date - Days::new(offset),
        }
    }

    /// Returns the Sunday the week starts on.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the Saturday the week ends on.
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(DAYS_IN_WEEK as u64 - 1)
    }

    /// Returns the week following this one.
    pub fn next(&self) -> Self {
        Self {
            start: self.start + Days::new(DAYS_IN_WEEK as u64),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }
}

/// The seven calendar dates of a grid, where position `i` is `start + i` days.
pub fn week_days(start: NaiveDate) -> [NaiveDate; DAYS_IN_WEEK] {
    std::array::from_fn(|offset| start + Days::new(offset as u64))
}

/// Returns every week overlapping the calendar month `day` falls in,
/// from the week holding the 1st to the week holding the last day.
pub fn weeks_in_month(day: NaiveDate) -> Vec<Week> {
    let first = day - Days::new(u64::from(day.day0()));
    let last = first + Months::new(1) - Days::new(1);

    let last_week = Week::containing(last);
    let mut week = Week::containing(first);
    let mut weeks = Vec::new();
    while week <= last_week {
        weeks.push(week);
        week = week.next();
    }
    weeks
}

/// Parses a `YYYY-MM-DD` date with a year from 1 to 9999.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| YEARS.contains(&date.year()))
}

/// Parses a `YYYY-MM` month into its first day.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    parse_date(&format!("{}-01", value.trim()))
}
