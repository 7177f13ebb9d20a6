use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One commit extracted from a scanned repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Checksum of the repository directory, never the path itself.
    pub repository: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub count: u32,
    pub repositories: BTreeMap<String, u32>,
}

/// Aggregated commit activity, written to `commits.json`.
///
/// Maps are ordered so the emitted JSON diffs cleanly between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub commits_count: u64,
    pub repositories_count: u64,
    pub months_count: BTreeMap<String, MonthBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub older_commit: Option<CommitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newer_commit: Option<CommitRecord>,
    pub days_count: BTreeMap<String, u32>,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.commits_count == 0
    }

    /// Commit counts of every day with at least one commit.
    pub fn positive_counts(&self) -> Vec<u32> {
        self.days_count.values().copied().filter(|&c| c > 0).collect()
    }
}

/// Lower bound on commit timestamps; commits at or before it are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(pub i64);

impl Cutoff {
    pub fn admits(&self, timestamp: i64) -> bool {
        timestamp > self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_omits_extrema() {
        let json = serde_json::to_value(CommitSummary::default()).unwrap();
        assert_eq!(json["commitsCount"], 0);
        assert!(json.get("olderCommit").is_none());
        assert!(json.get("newerCommit").is_none());
        assert!(json["daysCount"].as_object().unwrap().is_empty());
    }

    #[test]
    fn summary_reads_back_without_extrema() {
        let raw = r#"{"commitsCount":0,"repositoriesCount":0,"monthsCount":{},"daysCount":{}}"#;
        let summary: CommitSummary = serde_json::from_str(raw).unwrap();
        assert!(summary.is_empty());
        assert!(summary.older_commit.is_none());
    }

    #[test]
    fn cutoff_is_exclusive() {
        let cutoff = Cutoff(100);
        assert!(!cutoff.admits(100));
        assert!(cutoff.admits(101));
    }
}
