use chrono::{Datelike, Months, NaiveDate};

/// Earliest year a calendar literal may name.
pub const MIN_YEAR: i32 = 1900;
/// Latest year a calendar literal may name.
pub const MAX_YEAR: i32 = 2100;

const MONTHS: [(&str, &str); 12] = [("january", "jan"),
                                    ("february", "feb"),
                                    ("march", "mar"),
                                    ("april", "apr"),
                                    ("may", "may"),
                                    ("june", "jun"),
                                    ("july", "jul"),
                                    ("august", "aug"),
                                    ("september", "sep"),
                                    ("october", "oct"),
                                    ("november", "nov"),
                                    ("december", "dec")];

/// Returns the month number (1 through 12) for a full or abbreviated month
/// name, ignoring case. `Sept` is accepted as well.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::dates::month_from_name;
///
/// assert_eq!(month_from_name("Feb"), Some(2));
/// assert_eq!(month_from_name("DECEMBER"), Some(12));
/// assert_eq!(month_from_name("Febru"), None);
/// ```
#[must_use]
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS.iter()
          .position(|(full, short)| *full == lower || *short == lower)
          .and_then(|index| u32::try_from(index + 1).ok())
}

/// Capitalized full month name for display.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = ["January",
                               "February",
                               "March",
                               "April",
                               "May",
                               "June",
                               "July",
                               "August",
                               "September",
                               "October",
                               "November",
                               "December"];
    month.checked_sub(1)
         .and_then(|index| NAMES.get(index as usize))
         .copied()
         .unwrap_or("?")
}

/// Gregorian leap-year rule.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
#[must_use]
pub const fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Why a calendar literal does not name a real day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateProblem {
    /// The year is outside the supported window.
    YearOutOfRange {
        /// The year as written.
        year: i32,
    },
    /// The day does not exist in that month.
    DayOutOfRange {
        /// Month number.
        month: u32,
        /// Day as written.
        day:   u32,
        /// Year as written.
        year:  i32,
    },
}

impl DateProblem {
    /// A one-line summary, e.g. `February 30, 2025 does not exist`.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::YearOutOfRange { year } => {
                format!("year {year} is outside the supported range {MIN_YEAR}-{MAX_YEAR}")
            },
            Self::DayOutOfRange { month, day, year } => {
                format!("{} {day}, {year} does not exist", month_name(*month))
            },
        }
    }

    /// Details naming the valid range, with leap-year context for February.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::YearOutOfRange { .. } => format!("Use a year between {MIN_YEAR} and {MAX_YEAR}"),
            Self::DayOutOfRange { month: 2, year, .. } => {
                let days = days_in_month(2, *year);
                let leap = if is_leap_year(*year) {
                    "leap year"
                } else {
                    "not a leap year"
                };
                format!("February has {days} days in {year} ({leap})")
            },
            Self::DayOutOfRange { month, year, .. } => {
                format!("{} has {} days", month_name(*month), days_in_month(*month, *year))
            },
        }
    }
}

/// Resolves a calendar literal to a date.
///
/// # Errors
/// Returns the [`DateProblem`] describing why the day does not exist.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::dates::{DateProblem, validate_date};
///
/// assert!(validate_date(2, 29, 2024).is_ok());
///
/// let problem = validate_date(2, 30, 2025).unwrap_err();
/// assert_eq!(problem.detail(), "February has 28 days in 2025 (not a leap year)");
/// ```
pub fn validate_date(month: u32, day: u32, year: i32) -> Result<NaiveDate, DateProblem> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DateProblem::YearOutOfRange { year });
    }
    if day == 0 || day > days_in_month(month, year) {
        return Err(DateProblem::DayOutOfRange { month, day, year });
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateProblem::DayOutOfRange { month, day, year })
}

/// Adds whole calendar months, clamping to the end of shorter months
/// (`Jan 31 + 1 month` is the last day of February).
#[must_use]
pub fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Formats a date as `Feb 14, 2026`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    let short = month_name(date.month()).get(..3).unwrap_or("?");
    format!("{short} {}, {}", date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2025));
    }

    #[test]
    fn month_end_clamps() {
        let jan31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(add_months(jan31, 1), NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(add_months(jan31, -2), NaiveDate::from_ymd_opt(2024, 11, 30));
    }

    #[test]
    fn april_has_thirty_days() {
        let problem = validate_date(4, 31, 2025).unwrap_err();
        assert_eq!(problem.detail(), "April has 30 days");
        assert_eq!(problem.message(), "April 31, 2025 does not exist");
    }

    #[test]
    fn formats_short_month() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        assert_eq!(format_date(date), "Feb 14, 2026");
    }
}
