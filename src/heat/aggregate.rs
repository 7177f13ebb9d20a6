use crate::error::{FolioError, Result};
use crate::model::{CommitRecord, CommitSummary};
use crate::util::{day_key, month_key};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::HashSet;

/// Aggregate records by calendar month and day in the local time zone.
pub fn aggregate(records: &[CommitRecord]) -> Result<CommitSummary> {
    aggregate_in(records, &Local)
}

/// Aggregate records by calendar month and day in `tz`.
///
/// Input order does not matter. Ties on the extrema keep the first record seen.
pub fn aggregate_in<Tz: TimeZone>(records: &[CommitRecord], tz: &Tz) -> Result<CommitSummary> {
    let mut summary = CommitSummary::default();
    let mut repositories: HashSet<&str> = HashSet::new();

    for record in records {
        let local = local_time(record.timestamp, tz)?;

        let month = summary.months_count.entry(month_key(&local)).or_default();
        month.count += 1;
        *month.repositories.entry(record.repository.clone()).or_insert(0) += 1;

        *summary.days_count.entry(day_key(local.date_naive())).or_insert(0) += 1;

        repositories.insert(record.repository.as_str());

        if summary
            .older_commit
            .as_ref()
            .map_or(true, |older| record.timestamp < older.timestamp)
        {
            summary.older_commit = Some(record.clone());
        }
        if summary
            .newer_commit
            .as_ref()
            .map_or(true, |newer| record.timestamp > newer.timestamp)
        {
            summary.newer_commit = Some(record.clone());
        }
    }

    summary.commits_count = records.len() as u64;
    summary.repositories_count = repositories.len() as u64;
    Ok(summary)
}

pub(crate) fn local_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Result<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(tz))
        .ok_or_else(|| FolioError::InvalidDate(format!("Invalid timestamp: {timestamp}")))
}
