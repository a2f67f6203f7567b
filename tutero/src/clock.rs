//! Source of "today" for day-rollover detection

use chrono::{Datelike, Local, NaiveDate};

/// Anything that can say which calendar day it is.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date. Useful for tests and for back-filling accounts.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Lower-cased month abbreviation, day of month and year of a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayParts {
    pub month: String,
    pub day: u32,
    pub year: i32,
}

impl DayParts {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.format("%b").to_string().to_lowercase(),
            day: date.day(),
            year: date.year(),
        }
    }

    /// Compact `{month}{day}` token, e.g. `jan5`.
    pub fn stamp(&self) -> String {
        format!("{}{}", self.month, self.day)
    }
}
