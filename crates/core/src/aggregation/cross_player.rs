//! Views across every tracked player: daily totals and top gainers.

use chrono::NaiveDate;
use serde::Serialize;

use super::{bucket_by_day, clamp_gain, group_by_player, trailing_dates, SeriesPoint};
use crate::format::humanize_xp;
use crate::profile::Snapshot;
use crate::types::{DbId, Xp};

/// Number of trailing days in the cross-player daily total.
pub const DAILY_TOTAL_DAYS: u64 = 8;

/// One row of the top-gainers list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopGainer {
    pub player_id: DbId,
    pub name: String,
    /// Total XP at the player's last snapshot in the window.
    pub xp: Xp,
    pub gained: Xp,
    pub xp_display: String,
    pub gained_display: String,
}

/// Total XP gained by all players on each of the eight days ending at `today`.
///
/// Each player's snapshots inside the window are bucketed per day. A
/// player's first bucket in the window seeds their baseline and adds
/// nothing; later buckets add `max(0, bucket - base)`. Snapshots outside
/// the window are ignored.
pub fn daily_totals(snapshots: &[Snapshot], today: NaiveDate) -> Vec<SeriesPoint> {
    let dates = trailing_dates(today, DAILY_TOTAL_DAYS);
    let mut series: Vec<SeriesPoint> = dates
        .iter()
        .map(|&date| SeriesPoint { date, value: 0 })
        .collect();
    let (Some(&start), Some(&end)) = (dates.first(), dates.last()) else {
        return series;
    };

    for (_, history) in group_by_player(snapshots) {
        let mut base: Option<Xp> = None;
        for (date, snapshot) in bucket_by_day(&history, |s| s.captured_at) {
            if date < start || date > end {
                continue;
            }
            let xp = snapshot.total_xp();
            let Some(previous) = base else {
                base = Some(xp);
                continue;
            };
            let gain = clamp_gain(xp - previous, "daily_totals");
            base = Some(previous.max(xp));
            if let Some(point) = series.iter_mut().find(|p| p.date == date) {
                point.value += gain;
            }
        }
    }

    series
}

/// Players with the largest XP gain across the window, best first.
///
/// Gain is the last snapshot's total XP minus the first's. Players who
/// gained nothing are left out. Ties keep the order in which players first
/// appear in `snapshots`. At most `limit` rows are returned.
pub fn top_gainers(snapshots: &[Snapshot], limit: usize) -> Vec<TopGainer> {
    let mut rows: Vec<TopGainer> = group_by_player(snapshots)
        .into_iter()
        .filter_map(|(player_id, history)| {
            let first = history.first()?;
            let last = history.last()?;
            let gained = last.total_xp() - first.total_xp();
            (gained > 0).then(|| TopGainer {
                player_id,
                name: last.profile.name.clone(),
                xp: last.total_xp(),
                gained,
                xp_display: humanize_xp(last.total_xp()),
                gained_display: humanize_xp(gained),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.gained.cmp(&a.gained));
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::test_support::{at, snapshot};

    fn oct(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    // -- daily_totals --

    #[test]
    fn eight_days_oldest_first() {
        let series = daily_totals(&[], oct(10));
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].date, oct(3));
        assert_eq!(series[7].date, oct(10));
    }

    #[test]
    fn first_appearance_seeds_baseline() {
        let snaps = vec![
            snapshot(1, at(8, 12), 1_000),
            snapshot(1, at(9, 12), 1_500),
            snapshot(2, at(9, 10), 50_000),
            snapshot(2, at(10, 10), 50_200),
        ];
        let series = daily_totals(&snaps, oct(10));
        let values: Vec<_> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, [0, 0, 0, 0, 0, 0, 500, 200]);
    }

    #[test]
    fn regression_adds_nothing_to_total() {
        let snaps = vec![
            snapshot(1, at(8, 12), 1_000),
            snapshot(1, at(9, 12), 900),
            snapshot(1, at(10, 12), 1_100),
            snapshot(2, at(8, 12), 10),
            snapshot(2, at(9, 12), 40),
        ];
        let series = daily_totals(&snaps, oct(10));
        assert_eq!(series[6].value, 30);
        assert_eq!(series[7].value, 100);
    }

    #[test]
    fn snapshots_before_window_do_not_seed() {
        let snaps = vec![snapshot(1, at(1, 12), 10), snapshot(1, at(9, 12), 500)];
        let series = daily_totals(&snaps, oct(10));
        assert!(series.iter().all(|p| p.value == 0));
    }

    #[test]
    fn same_day_snapshots_use_latest() {
        let snaps = vec![
            snapshot(1, at(9, 1), 100),
            snapshot(1, at(10, 1), 150),
            snapshot(1, at(10, 23), 400),
        ];
        let series = daily_totals(&snaps, oct(10));
        assert_eq!(series[7].value, 300);
    }

    // -- top_gainers --

    #[test]
    fn gainers_sorted_descending_and_limited() {
        let snaps = vec![
            snapshot(1, at(1, 0), 1_000),
            snapshot(2, at(1, 0), 1_000),
            snapshot(3, at(1, 0), 1_000),
            snapshot(1, at(1, 12), 2_000),
            snapshot(2, at(1, 12), 1_001_000),
            snapshot(3, at(1, 12), 501_000),
        ];
        let rows = top_gainers(&snaps, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player_id, 2);
        assert_eq!(rows[0].gained, 1_000_000);
        assert_eq!(rows[0].gained_display, "1.0M");
        assert_eq!(rows[1].player_id, 3);
        assert!(rows.windows(2).all(|w| w[0].gained >= w[1].gained));
    }

    #[test]
    fn non_positive_gains_are_excluded() {
        let snaps = vec![
            snapshot(1, at(1, 0), 1_000),
            snapshot(1, at(1, 12), 1_000),
            snapshot(2, at(1, 0), 5_000),
            snapshot(2, at(1, 12), 4_000),
            snapshot(3, at(1, 0), 7_000),
        ];
        assert!(top_gainers(&snaps, 10).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let snaps = vec![
            snapshot(9, at(1, 0), 0),
            snapshot(4, at(1, 0), 0),
            snapshot(9, at(1, 5), 100),
            snapshot(4, at(1, 5), 100),
        ];
        let ids: Vec<_> = top_gainers(&snaps, 10).iter().map(|r| r.player_id).collect();
        assert_eq!(ids, [9, 4]);
    }

    #[test]
    fn raw_values_survive_display_rounding() {
        let snaps = vec![snapshot(1, at(1, 0), 0), snapshot(1, at(1, 5), 1_234_567)];
        let row = &top_gainers(&snaps, 1)[0];
        assert_eq!(row.gained, 1_234_567);
        assert_eq!(row.gained_display, "1.2M");
    }
}
