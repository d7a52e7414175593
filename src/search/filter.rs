use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};

use super::request::DateWindow;
use super::results::ResultRecord;

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Restricts records to the window at month granularity.
///
/// An open window borrows the input unchanged. Otherwise records with an
/// unknown date are dropped, a missing start means no lower limit, and a
/// missing end means "through the current month".
pub fn filter_by_window<'a>(
    records: &'a [ResultRecord],
    window: &DateWindow,
    today: NaiveDate,
) -> Cow<'a, [ResultRecord]> {
    if window.is_open() {
        return Cow::Borrowed(records);
    }

    let lower = window.start.map(first_of_month);
    let upper = first_of_month(window.end.unwrap_or(today));

    let kept = records
        .iter()
        .filter(|r| {
            r.published_date
                .first_of_month()
                .is_some_and(|d| lower.is_none_or(|lo| d >= lo) && d <= upper)
        })
        .cloned()
        .collect();
    Cow::Owned(kept)
}
