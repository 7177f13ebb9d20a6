//! `folio.toml` loading.
//!
//! The loaded [`Config`] is the single context object handed to every
//! pipeline stage; nothing reads configuration from globals.

use crate::chart::ChartConfig;
use crate::error::{FolioError, Result};
use crate::model::Cutoff;
use chrono::{Local, NaiveDate, TimeZone};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Project root every relative path resolves against. Not read from the file.
    #[serde(skip)]
    pub root: PathBuf,
    pub paths: PathsConfig,
    pub commits: CommitsConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Hand-maintained CSV inputs, and the collected `commits.csv`.
    pub data_dir: PathBuf,
    /// Where JSON artifacts are written.
    pub json_dir: PathBuf,
    /// Base directory thumbnail paths are relative to.
    pub assets_dir: PathBuf,
    /// Directory scanned for git repositories.
    pub scan_root: PathBuf,
    pub heatmap: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            json_dir: PathBuf::from("src/assets/json"),
            assets_dir: PathBuf::from("src"),
            scan_root: PathBuf::from(".."),
            heatmap: PathBuf::from("src/assets/images/commits.svg"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBackend {
    #[default]
    Gix,
    Git,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitsConfig {
    /// Case-insensitive substrings matched against `Name <email>`. Empty collects nothing.
    pub identities: Vec<String>,
    /// Commits on or before this local date are dropped.
    pub since: Option<NaiveDate>,
    pub max_depth: usize,
    pub backend: LogBackend,
    /// Locale forced on `git` child processes.
    pub locale: String,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            identities: Vec::new(),
            since: NaiveDate::from_ymd_opt(2011, 1, 1),
            max_depth: 3,
            backend: LogBackend::Gix,
            locale: "en_GB".to_string(),
        }
    }
}

impl CommitsConfig {
    pub fn cutoff(&self) -> Option<Cutoff> {
        let date = self.since?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| Cutoff(dt.timestamp()))
    }
}

impl Config {
    /// Load `explicit`, or `<root>/folio.toml` when present, or defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let candidate = root.join(CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };

        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::parse(&content).map_err(|message| FolioError::Config { path, message })?
            }
            None => Self::default(),
        };
        config.root = root.to_path_buf();
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.chart.levels == 0 {
            return Err("chart.levels must be at least 1".to_string());
        }
        Ok(config)
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.resolve(&self.paths.data_dir).join(name)
    }

    pub fn json_file(&self, name: &str) -> PathBuf {
        self.resolve(&self.paths.json_dir).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.commits.max_depth, 3);
        assert_eq!(config.commits.backend, LogBackend::Gix);
        assert_eq!(config.chart.levels, 5);
        assert_eq!(config.paths.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [commits]
            identities = ["jdoe", "jane@example.com"]
            since = "2015-06-01"
            max_depth = 5
            backend = "git"

            [chart]
            levels = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.commits.identities.len(), 2);
        assert_eq!(config.commits.since, NaiveDate::from_ymd_opt(2015, 6, 1));
        assert_eq!(config.commits.max_depth, 5);
        assert_eq!(config.commits.backend, LogBackend::Git);
        assert_eq!(config.chart.levels, 6);
        assert_eq!(config.chart.cell_size, 20.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("[commits]\nmaxdepth = 2\n").unwrap_err();
        assert!(err.contains("maxdepth"));
    }

    #[test]
    fn zero_levels_are_rejected() {
        let err = Config::parse("[chart]\nlevels = 0\n").unwrap_err();
        assert!(err.contains("chart.levels"));
    }

    #[test]
    fn missing_since_disables_cutoff() {
        let commits = CommitsConfig {
            since: None,
            ..CommitsConfig::default()
        };
        assert!(commits.cutoff().is_none());
        assert!(CommitsConfig::default().cutoff().is_some());
    }
}
