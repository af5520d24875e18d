//! Deadline domain model.
//!
//! # Responsibility
//! - Define the record persisted for each tracked deadline.
//! - Validate ids, names and month/day input before a record exists.
//!
//! # Invariants
//! - `id` is assigned once by the store and never re-derived from content.
//! - Records created through `with_id` have a name that is non-empty after
//!   trimming.
//! - `date` carries no time component; only the calendar day is stored.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a deadline.
pub type DeadlineId = Uuid;

/// Validation errors for deadline construction and input parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// `Uuid::nil()` is reserved and never identifies a record.
    NilId,
    /// Month outside `1..=12`.
    InvalidMonth(u32),
    /// Day outside the calendar range of the given month and year.
    InvalidDay { year: i32, month: u32, day: u32 },
}

impl Display for DeadlineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "deadline name must not be empty"),
            Self::NilId => write!(f, "deadline id must not be nil"),
            Self::InvalidMonth(month) => write!(f, "month {month} is outside 1..=12"),
            Self::InvalidDay { year, month, day } => {
                write!(f, "day {day} is not valid for {year:04}-{month:02}")
            }
        }
    }
}

impl Error for DeadlineValidationError {}

/// One tracked deadline.
///
/// Serialized as `{ "id", "name", "date" }` with `date` in `YYYY-MM-DD`
/// form, so reading it back never depends on the reader's timezone.
/// Deserialization checks shape only; blank names written by older builds
/// stay loadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: DeadlineId,
    pub name: String,
    pub date: NaiveDate,
}

impl Deadline {
    /// Creates a deadline with a caller-provided id.
    ///
    /// The name is trimmed before storing.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `EmptyName` when `name` is blank.
    pub fn with_id(
        id: DeadlineId,
        name: impl AsRef<str>,
        date: NaiveDate,
    ) -> Result<Self, DeadlineValidationError> {
        let deadline = Self {
            id,
            name: normalize_name(name.as_ref())?,
            date,
        };
        deadline.validate()?;
        Ok(deadline)
    }

    /// Checks the invariants enforced when a record is created.
    pub fn validate(&self) -> Result<(), DeadlineValidationError> {
        if self.id.is_nil() {
            return Err(DeadlineValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(DeadlineValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Trims a user-supplied name, rejecting blank input.
pub fn normalize_name(name: &str) -> Result<String, DeadlineValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DeadlineValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Resolves separately entered month and day in `year`.
///
/// # Errors
/// - `InvalidMonth` when `month` is outside `1..=12`.
/// - `InvalidDay` when `day` does not exist in that month (Feb 30, Apr 31,
///   Feb 29 outside leap years).
pub fn resolve_month_day(
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate, DeadlineValidationError> {
    if !(1..=12).contains(&month) {
        return Err(DeadlineValidationError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DeadlineValidationError::InvalidDay { year, month, day })
}

/// Resolves month and day in the same year as `today`.
pub fn resolve_month_day_in_year_of(
    today: NaiveDate,
    month: u32,
    day: u32,
) -> Result<NaiveDate, DeadlineValidationError> {
    resolve_month_day(today.year(), month, day)
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, resolve_month_day, DeadlineValidationError};
    use chrono::NaiveDate;

    #[test]
    fn normalize_name_trims_and_rejects_blank() {
        assert_eq!(normalize_name("  Launch ").unwrap(), "Launch");
        assert_eq!(
            normalize_name(" \t ").unwrap_err(),
            DeadlineValidationError::EmptyName
        );
    }

    #[test]
    fn resolve_month_day_checks_calendar_ranges() {
        assert_eq!(
            resolve_month_day(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            resolve_month_day(2025, 2, 29).unwrap_err(),
            DeadlineValidationError::InvalidDay {
                year: 2025,
                month: 2,
                day: 29
            }
        );
        assert_eq!(
            resolve_month_day(2025, 13, 1).unwrap_err(),
            DeadlineValidationError::InvalidMonth(13)
        );
        assert!(resolve_month_day(2025, 4, 31).is_err());
        assert!(resolve_month_day(2025, 1, 0).is_err());
    }
}
