use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use folio::heat::{aggregate_in, build_grid_between, build_grid_in, classify};
use folio::model::CommitRecord;
use proptest::prelude::*;

/// 2011-01-01T00:00:00Z to 2030-01-01T00:00:00Z
const TS_RANGE: std::ops::Range<i64> = 1_293_840_000..1_893_456_000;

fn record_strategy() -> impl Strategy<Value = CommitRecord> {
    ("[0-9]{1,10}", TS_RANGE, "[0-9a-f]{40}").prop_map(|(repository, timestamp, hash)| {
        CommitRecord {
            repository,
            timestamp,
            hash,
        }
    })
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..7000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2010, 1, 1).unwrap() + Days::new(offset)
    })
}

proptest! {
    /// Every record lands in exactly one day and one month bucket.
    #[test]
    fn prop_counts_are_conserved(records in proptest::collection::vec(record_strategy(), 0..200)) {
        let summary = aggregate_in(&records, &Utc).expect("aggregate");
        let days: u64 = summary.days_count.values().map(|&c| c as u64).sum();
        let months: u64 = summary.months_count.values().map(|b| b.count as u64).sum();

        prop_assert_eq!(summary.commits_count, records.len() as u64);
        prop_assert_eq!(days, summary.commits_count);
        prop_assert_eq!(months, summary.commits_count);
        prop_assert_eq!(summary.older_commit.is_some(), !records.is_empty());
    }

    #[test]
    fn prop_extrema_bound_every_record(records in proptest::collection::vec(record_strategy(), 1..100)) {
        let summary = aggregate_in(&records, &Utc).expect("aggregate");
        let older = summary.older_commit.expect("older").timestamp;
        let newer = summary.newer_commit.expect("newer").timestamp;
        prop_assert!(records.iter().all(|r| older <= r.timestamp && r.timestamp <= newer));
    }

    /// Whole weeks, Sunday to Saturday, each date exactly once.
    #[test]
    fn prop_grid_covers_range_in_whole_weeks(a in date_strategy(), b in date_strategy()) {
        let grid = build_grid_between(a, b, |_| 0).expect("grid");
        let (first, last) = if a <= b { (a, b) } else { (b, a) };

        let start = grid.first_date().expect("first");
        let end = grid.last_date().expect("last");
        prop_assert_eq!(start.weekday(), Weekday::Sun);
        prop_assert_eq!(end.weekday(), Weekday::Sat);
        prop_assert!(start <= first && last <= end);
        prop_assert!((first - start).num_days() < 7);
        prop_assert!((end - last).num_days() < 7);

        let dates: Vec<_> = grid.days().map(|d| d.date).collect();
        prop_assert!(dates.windows(2).all(|w| w[1] == w[0] + Days::new(1)));
        prop_assert_eq!(dates.len(), grid.weeks.len() * 7);
    }

    #[test]
    fn prop_grid_keeps_every_commit(records in proptest::collection::vec(record_strategy(), 1..100)) {
        let summary = aggregate_in(&records, &Utc).expect("aggregate");
        let grid = build_grid_in(&summary, &Utc).expect("grid");
        let total: u64 = grid.days().map(|d| d.count as u64).sum();
        prop_assert_eq!(total, summary.commits_count);
    }

    #[test]
    fn prop_classify_is_bounded_and_monotonic(
        counts in proptest::collection::vec(1u32..5000, 0..50),
        a in 0u32..6000,
        b in 0u32..6000,
        levels in 1u8..10,
    ) {
        prop_assert_eq!(classify(0, &counts, levels), 0);

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let level_lo = classify(lo, &counts, levels);
        let level_hi = classify(hi, &counts, levels);
        prop_assert!(level_lo <= level_hi);
        prop_assert!(level_hi <= levels);
        if lo > 0 {
            prop_assert!(level_lo >= 1);
        }
    }
}
