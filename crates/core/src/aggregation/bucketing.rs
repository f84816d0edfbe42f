//! Daily bucketing and per-player grouping.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::profile::Snapshot;
use crate::types::{DbId, Timestamp};

/// Group items by the UTC calendar date of their timestamp, keeping the
/// item with the latest timestamp for each date.
///
/// When two items share the exact same timestamp, the one later in the
/// input wins. Earlier timestamps never replace a bucket.
pub fn bucket_by_day<T>(
    items: &[T],
    captured_at: impl Fn(&T) -> Timestamp,
) -> BTreeMap<NaiveDate, &T> {
    let mut buckets: BTreeMap<NaiveDate, &T> = BTreeMap::new();
    for item in items {
        let ts = captured_at(item);
        buckets
            .entry(ts.date_naive())
            .and_modify(|current| {
                if captured_at(*current) <= ts {
                    *current = item;
                }
            })
            .or_insert(item);
    }
    buckets
}

/// Split a mixed snapshot list into per-player histories.
///
/// Players appear in order of their first snapshot in the input; each
/// history is sorted by capture time, ties kept in input order.
pub fn group_by_player<'a>(
    snapshots: impl IntoIterator<Item = &'a Snapshot>,
) -> Vec<(DbId, Vec<&'a Snapshot>)> {
    let mut groups: Vec<(DbId, Vec<&'a Snapshot>)> = Vec::new();
    let mut index: HashMap<DbId, usize> = HashMap::new();
    for snapshot in snapshots {
        let slot = *index.entry(snapshot.player_id).or_insert_with(|| {
            groups.push((snapshot.player_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(snapshot);
    }
    for (_, history) in &mut groups {
        history.sort_by_key(|s| s.captured_at);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::test_support::{at, snapshot};

    #[test]
    fn keeps_latest_snapshot_per_day() {
        let snaps = vec![
            snapshot(1, at(1, 8), 100),
            snapshot(1, at(1, 20), 300),
            snapshot(1, at(1, 12), 200),
            snapshot(1, at(2, 1), 400),
        ];
        let buckets = bucket_by_day(&snaps, |s| s.captured_at);
        let values: Vec<_> = buckets.values().map(|s| s.total_xp()).collect();
        assert_eq!(values, [300, 400]);
    }

    #[test]
    fn later_insert_replaces_bucket_earlier_insert_does_not() {
        let mut snaps = vec![snapshot(1, at(1, 10), 100)];
        snaps.push(snapshot(1, at(1, 11), 150));
        let buckets = bucket_by_day(&snaps, |s| s.captured_at);
        assert_eq!(buckets.values().next().unwrap().total_xp(), 150);

        snaps.push(snapshot(1, at(1, 9), 999));
        let buckets = bucket_by_day(&snaps, |s| s.captured_at);
        assert_eq!(buckets.values().next().unwrap().total_xp(), 150);
    }

    #[test]
    fn duplicate_timestamp_last_in_input_wins() {
        let snaps = vec![snapshot(1, at(3, 10), 100), snapshot(1, at(3, 10), 101)];
        let buckets = bucket_by_day(&snaps, |s| s.captured_at);
        assert_eq!(buckets.values().next().unwrap().total_xp(), 101);
    }

    #[test]
    fn bucketing_is_idempotent() {
        let snaps = vec![snapshot(1, at(1, 8), 100), snapshot(1, at(1, 9), 200)];
        let once: Vec<_> = bucket_by_day(&snaps, |s| s.captured_at)
            .into_values()
            .cloned()
            .collect();
        let twice: Vec<_> = bucket_by_day(&once, |s| s.captured_at)
            .into_values()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn groups_players_in_first_seen_order() {
        let snaps = vec![
            snapshot(7, at(2, 0), 20),
            snapshot(3, at(1, 0), 10),
            snapshot(7, at(1, 0), 5),
        ];
        let groups = group_by_player(&snaps);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 7);
        assert_eq!(groups[0].1[0].total_xp(), 5);
        assert_eq!(groups[1].0, 3);
    }

    #[test]
    fn groups_a_filtered_borrow_without_copying() {
        let snaps = vec![
            snapshot(1, at(1, 0), 10),
            snapshot(2, at(2, 0), 20),
            snapshot(1, at(3, 0), 30),
        ];
        let groups = group_by_player(snaps.iter().filter(|s| s.captured_at >= at(2, 0)));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 2);
        assert!(std::ptr::eq(groups[1].1[0], &snaps[2]));
    }
}
