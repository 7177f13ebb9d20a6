use super::aggregate::local_time;
use crate::error::{FolioError, Result};
use crate::model::CommitSummary;
use crate::util::{day_key, month_name};
use chrono::{Datelike, Days, Local, NaiveDate, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub count: u32,
    /// 0 = Sunday
    pub day_of_week: u8,
    pub week_index: usize,
}

/// Seven consecutive days, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week(pub [DayCell; 7]);

impl Week {
    pub fn first_day(&self) -> NaiveDate {
        self.0[0].date
    }

    pub fn days(&self) -> &[DayCell; 7] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBoundary {
    pub year: i32,
    pub week_index: usize,
    /// Weekday of January 1st, which rarely falls on a column edge.
    pub start_day_of_week: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBoundary {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub week_index: usize,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub weeks: Vec<Week>,
    pub year_boundaries: Vec<YearBoundary>,
    pub month_boundaries: Vec<MonthBoundary>,
}

impl CalendarGrid {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|w| w.0.iter())
    }

    /// Non-zero day counts, the basis for intensity scaling.
    pub fn positive_counts(&self) -> Vec<u32> {
        self.days().map(|d| d.count).filter(|&c| c > 0).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(Week::first_day)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.0[6].date)
    }
}

pub fn build_grid(summary: &CommitSummary) -> Result<CalendarGrid> {
    build_grid_in(summary, &Local)
}

/// Lay the summary's date range out as Sunday-first weeks, in `tz`.
pub fn build_grid_in<Tz: TimeZone>(summary: &CommitSummary, tz: &Tz) -> Result<CalendarGrid> {
    let (Some(older), Some(newer)) = (&summary.older_commit, &summary.newer_commit) else {
        return Ok(CalendarGrid::default());
    };

    let first = local_time(older.timestamp, tz)?.date_naive();
    let last = local_time(newer.timestamp, tz)?.date_naive();
    build_grid_between(first, last, |date| {
        summary.days_count.get(&day_key(date)).copied().unwrap_or(0)
    })
}

/// Weeks covering `first..=last`, widened to whole weeks.
///
/// Fails when widening would step outside the representable calendar.
pub fn build_grid_between(
    first: NaiveDate,
    last: NaiveDate,
    count_for: impl Fn(NaiveDate) -> u32,
) -> Result<CalendarGrid> {
    let (first, last) = if first <= last { (first, last) } else { (last, first) };
    let start = week_start(first)?;
    let end = week_end(last)?;

    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let weeks: Vec<Week> = dates
        .chunks_exact(7)
        .enumerate()
        .map(|(week_index, chunk)| {
            Week(std::array::from_fn(|i| DayCell {
                date: chunk[i],
                count: count_for(chunk[i]),
                day_of_week: i as u8,
                week_index,
            }))
        })
        .collect();

    let year_boundaries = year_boundaries(&weeks);
    let month_boundaries = month_boundaries(&weeks);
    Ok(CalendarGrid {
        weeks,
        year_boundaries,
        month_boundaries,
    })
}

fn week_start(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        .ok_or_else(|| FolioError::InvalidDate(format!("No Sunday on or before {date}")))
}

fn week_end(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(6 - date.weekday().num_days_from_sunday())))
        .ok_or_else(|| FolioError::InvalidDate(format!("No Saturday on or after {date}")))
}

fn year_boundaries(weeks: &[Week]) -> Vec<YearBoundary> {
    let mut boundaries = Vec::new();
    let mut current = None;

    for (week_index, week) in weeks.iter().enumerate() {
        let year = week.first_day().year();
        if current != Some(year) {
            let start_day_of_week = NaiveDate::from_ymd_opt(year, 1, 1)
                .map(|jan1| jan1.weekday().num_days_from_sunday() as u8)
                .unwrap_or(0);
            boundaries.push(YearBoundary {
                year,
                week_index,
                start_day_of_week,
            });
            current = Some(year);
        }
    }
    boundaries
}

fn month_boundaries(weeks: &[Week]) -> Vec<MonthBoundary> {
    let mut boundaries = Vec::new();
    let mut current = None;

    for (week_index, week) in weeks.iter().enumerate() {
        let first = week.first_day();
        let key = (first.year(), first.month());
        if current != Some(key) {
            boundaries.push(MonthBoundary {
                year: key.0,
                month: key.1,
                week_index,
                label: month_name(key.1),
            });
            current = Some(key);
        }
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommitRecord;
    use chrono::{Utc, Weekday};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midday(date: NaiveDate) -> i64 {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp()
    }

    fn summary_between(first: NaiveDate, last: NaiveDate) -> CommitSummary {
        let rec = |d: NaiveDate| CommitRecord {
            repository: "r".to_string(),
            timestamp: midday(d),
            hash: day_key(d),
        };
        let mut summary = CommitSummary {
            commits_count: 2,
            repositories_count: 1,
            older_commit: Some(rec(first)),
            newer_commit: Some(rec(last)),
            ..CommitSummary::default()
        };
        summary.days_count.insert(day_key(first), 1);
        *summary.days_count.entry(day_key(last)).or_insert(0) += 1;
        summary
    }

    #[test]
    fn single_week_range() {
        // 2023-01-01 is a Sunday.
        let grid = build_grid_in(&summary_between(date(2023, 1, 1), date(2023, 1, 7)), &Utc).unwrap();

        assert_eq!(grid.weeks.len(), 1);
        assert!(grid.days().all(|d| d.week_index == 0));
        assert_eq!(
            grid.year_boundaries,
            vec![YearBoundary {
                year: 2023,
                week_index: 0,
                start_day_of_week: 0
            }]
        );
        assert_eq!(grid.month_boundaries.len(), 1);
        assert_eq!(grid.month_boundaries[0].label, "Jan");
    }

    #[test]
    fn range_is_widened_to_whole_weeks() {
        // Wednesday to the following Tuesday.
        let grid = build_grid_in(&summary_between(date(2023, 3, 8), date(2023, 3, 14)), &Utc).unwrap();

        assert_eq!(grid.weeks.len(), 2);
        assert_eq!(grid.first_date().unwrap().weekday(), Weekday::Sun);
        assert_eq!(grid.last_date().unwrap().weekday(), Weekday::Sat);
        assert_eq!(grid.first_date(), Some(date(2023, 3, 5)));
        assert_eq!(grid.last_date(), Some(date(2023, 3, 18)));
    }

    #[test]
    fn counts_default_to_zero() {
        let grid = build_grid_in(&summary_between(date(2023, 3, 8), date(2023, 3, 14)), &Utc).unwrap();
        let counts: Vec<u32> = grid.days().map(|d| d.count).collect();

        assert_eq!(counts.iter().sum::<u32>(), 2);
        assert_eq!(grid.weeks[0].0[3].count, 1);
        assert_eq!(grid.weeks[1].0[2].count, 1);
        assert_eq!(grid.positive_counts(), vec![1, 1]);
    }

    #[test]
    fn year_boundary_carries_jan_first_weekday() {
        // 2024-01-01 is a Monday.
        let grid = build_grid_in(&summary_between(date(2023, 12, 20), date(2024, 1, 20)), &Utc).unwrap();

        let years: Vec<i32> = grid.year_boundaries.iter().map(|b| b.year).collect();
        assert_eq!(years, vec![2023, 2024]);

        let boundary = grid.year_boundaries[1];
        assert_eq!(boundary.start_day_of_week, 1);
        // The week holding Jan 1st starts on Dec 31st; the boundary lands on the next one.
        assert_eq!(grid.weeks[boundary.week_index].first_day(), date(2024, 1, 7));
    }

    #[test]
    fn month_boundaries_follow_week_starts() {
        let grid = build_grid_in(&summary_between(date(2023, 1, 1), date(2023, 3, 31)), &Utc).unwrap();
        let labels: Vec<&str> = grid.month_boundaries.iter().map(|b| b.label).collect();
        // The last column starts on Mar 26th, so April gets no label.
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(grid.month_boundaries[1].month, 2);
    }

    #[test]
    fn missing_extrema_give_empty_grid() {
        let grid = build_grid_in(&CommitSummary::default(), &Utc).unwrap();
        assert!(grid.is_empty());
        assert!(grid.year_boundaries.is_empty());
        assert!(grid.month_boundaries.is_empty());
    }

    #[test]
    fn grid_is_deterministic() {
        let summary = summary_between(date(2020, 2, 3), date(2022, 9, 9));
        assert_eq!(build_grid_in(&summary, &Utc).unwrap(), build_grid_in(&summary, &Utc).unwrap());
    }

    #[test]
    fn calendar_edge_is_an_error() {
        // The week of the last representable date cannot be completed.
        let max_day = NaiveDate::MAX;
        assert_ne!(max_day.weekday(), Weekday::Sat);
        let record = CommitRecord {
            repository: "r".to_string(),
            timestamp: max_day.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp(),
            hash: "h".to_string(),
        };
        let summary = crate::heat::aggregate_in(&[record], &Utc).unwrap();

        assert!(matches!(build_grid_in(&summary, &Utc), Err(FolioError::InvalidDate(_))));
        assert!(build_grid_between(max_day, max_day, |_| 0).is_err());
    }
}
