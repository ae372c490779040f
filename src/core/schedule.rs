//! Day schedule derivation.
//!
//! Turns a trip's date range, plus whatever days already exist, into the
//! current day sequence. Pure: same inputs always produce the same output.

use crate::core::error::ScheduleError;
use crate::core::trip::TripDay;
use chrono::{Days, NaiveDate};

/// Derives the ordered day schedule for `[start, end]` (both inclusive),
/// reconciling against `existing` by index.
///
/// Days at indices that already exist keep their activities, budget,
/// transportation and checklist and get their date rewritten; indices past
/// the existing sequence become fresh empty days with a zero budget in
/// `currency`. Existing days past the new range are dropped.
pub fn derive_schedule(
    start: NaiveDate,
    end: NaiveDate,
    existing: Vec<TripDay>,
    currency: &str,
) -> Result<Vec<TripDay>, ScheduleError> {
    if start > end {
        return Err(ScheduleError::InvalidRange { start, end });
    }

    // Inclusive of both endpoints: a single-day range yields one day.
    let total_days = (end - start).num_days() as usize + 1;

    let mut existing = existing.into_iter();
    let days = (0..total_days)
        .map(|index| {
            let date = start + Days::new(index as u64);
            match existing.next() {
                Some(mut day) => {
                    day.date = date;
                    day
                }
                None => TripDay::empty(date, index, currency),
            }
        })
        .collect();

    Ok(days)
}
