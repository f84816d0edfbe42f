//! Single-player trend views: spike-drop and the weekly-by-day series.

use chrono::NaiveDate;

use super::{bucket_by_day, clamp_gain, trailing_dates, SeriesPoint};
use crate::profile::Snapshot;
use crate::types::Xp;

/// Number of trailing days in the weekly series.
pub const WEEKLY_DAYS: u64 = 7;

/// Trim back-filled leading values from a time-ordered sequence.
///
/// A newly tracked player's first snapshots are copies of one observation.
/// When the sequence opens with a run of two or more identical values, the
/// run is discarded and the trend starts at the first differing value. A
/// single opening value is a real baseline and is kept.
///
/// Returns an empty slice when there are fewer than two items or when the
/// value never changes.
pub fn spike_drop<T>(items: &[T], value: impl Fn(&T) -> Xp) -> &[T] {
    let Some(first) = items.first() else {
        return &[];
    };
    if items.len() < 2 {
        return &[];
    }

    let initial = value(first);
    let run = items.iter().take_while(|item| value(*item) == initial).count();
    match run {
        n if n == items.len() => &[],
        1 => items,
        n => &items[n..],
    }
}

/// Daily XP gains for the seven days ending at `today`, oldest first.
///
/// Snapshots are ordered by capture time, spike-dropped on total XP, then
/// bucketed per day (latest wins). Each bucket's gain is measured against
/// the highest value seen before it, starting from the first value of the
/// trend. Days without a bucket report 0. A lower reading than the running
/// base is clamped to 0 and does not lower the base for later days.
pub fn weekly_gains(snapshots: &[Snapshot], today: NaiveDate) -> Vec<SeriesPoint> {
    let dates = trailing_dates(today, WEEKLY_DAYS);
    let mut series: Vec<SeriesPoint> = dates
        .iter()
        .map(|&date| SeriesPoint { date, value: 0 })
        .collect();

    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.captured_at);

    let trend = spike_drop(&ordered, |s| s.total_xp());
    let Some(first) = trend.first() else {
        return series;
    };

    let mut base = first.total_xp();
    for (date, snapshot) in bucket_by_day(trend, |s| s.captured_at) {
        if date > today {
            break;
        }
        let xp = snapshot.total_xp();
        let gain = clamp_gain(xp - base, "weekly_gains");
        base = base.max(xp);
        if let Some(point) = series.iter_mut().find(|p| p.date == date) {
            point.value = gain;
        }
    }

    series
}
