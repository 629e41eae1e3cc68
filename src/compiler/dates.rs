//! Relative date resolution

use chrono::{Datelike, Days, Months, NaiveDate};
use crate::request::RelativeDate;

/// Resolve a relative date against `today`
///
/// Quarters are calendar quarters (Jan, Apr, Jul, Oct). "End of previous X"
/// is the day before the current period starts.
pub fn resolve_relative(date: RelativeDate, today: NaiveDate) -> NaiveDate {
    let month_start = today - Days::new(u64::from(today.day0()));
    let quarter_start = month_start - Months::new(today.month0() % 3);
    let year_start = today - Days::new(u64::from(today.ordinal0()));

    match date {
        RelativeDate::Today => today,
        RelativeDate::StartOfMonth => month_start,
        RelativeDate::StartOfPreviousMonth => month_start - Months::new(1),
        RelativeDate::EndOfPreviousMonth => month_start - Days::new(1),
        RelativeDate::StartOfQuarter => quarter_start,
        RelativeDate::StartOfPreviousQuarter => quarter_start - Months::new(3),
        RelativeDate::EndOfPreviousQuarter => quarter_start - Days::new(1),
        RelativeDate::StartOfYear => year_start,
        RelativeDate::StartOfPreviousYear => year_start - Months::new(12),
        RelativeDate::EndOfPreviousYear => year_start - Days::new(1),
    }
}
