//! April-March fiscal years.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::NumberingError;

/// Month (1-based) on which a new fiscal year starts.
const FISCAL_YEAR_START_MONTH: u32 = 4;

/// A fiscal year running from April 1 to March 31.
///
/// Identified by its two-digit start year; the label is `"YY-YY"`, for example
/// `"23-24"` for April 2023 through March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiscalYear {
    start: u8,
}

impl FiscalYear {
    /// Fiscal year that contains `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let start_year = if date.month() < FISCAL_YEAR_START_MONTH {
            date.year() - 1
        } else {
            date.year()
        };
        Self {
            start: start_year.rem_euclid(100) as u8,
        }
    }

    /// Two-digit suffix of the calendar year the fiscal year starts in.
    pub fn start_suffix(&self) -> u8 {
        self.start
    }

    /// Two-digit suffix of the calendar year the fiscal year ends in.
    pub fn end_suffix(&self) -> u8 {
        (self.start + 1) % 100
    }

    /// The `"YY-YY"` label.
    pub fn label(&self) -> String {
        format!("{:02}-{:02}", self.start_suffix(), self.end_suffix())
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for FiscalYear {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NumberingError::InvalidFiscalYear(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(start) || !two_digits(end) {
            return Err(invalid());
        }
        let start: u8 = start.parse().map_err(|_| invalid())?;
        let end: u8 = end.parse().map_err(|_| invalid())?;

        let year = FiscalYear { start };
        if year.end_suffix() != end {
            return Err(invalid());
        }
        Ok(year)
    }
}
