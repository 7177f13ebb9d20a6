use super::repo::{GitCli, GixLog, LogEntry, LogReader};
use crate::config::{CommitsConfig, LogBackend};
use crate::model::{CommitRecord, Cutoff};
use crate::util::repository_id;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Case-insensitive substring allowlist over `Name <email>` author strings.
///
/// Only catches the variants it is told about; an unlisted spelling of a
/// name silently drops that commit. An empty allowlist admits nobody.
#[derive(Debug, Clone, Default)]
pub struct IdentityFilter {
    needles: Vec<String>,
}

impl IdentityFilter {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = identities
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { needles }
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    pub fn matches(&self, author: &str) -> bool {
        let author = author.to_lowercase();
        self.needles.iter().any(|n| author.contains(n.as_str()))
    }
}

/// Walks a directory tree looking for repository roots and collects their commits.
pub struct Scanner<R> {
    reader: R,
    identities: IdentityFilter,
    cutoff: Option<Cutoff>,
    progress: bool,
}

impl<R: LogReader> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            identities: IdentityFilter::default(),
            cutoff: None,
            progress: false,
        }
    }

    pub fn with_identities(mut self, identities: IdentityFilter) -> Self {
        self.identities = identities;
        self
    }

    pub fn with_cutoff(mut self, cutoff: Option<Cutoff>) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Collect commits from every repository at most `max_depth` levels below `root`.
    ///
    /// Never fails: unreadable directories and broken repositories contribute
    /// nothing. Symlinked directories are not followed and each canonical
    /// directory is visited once.
    pub fn scan(&self, root: &Path, max_depth: usize) -> Vec<CommitRecord> {
        let pb = if self.progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut records = Vec::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut stack: Vec<(PathBuf, usize)> = vec![(root.to_path_buf(), 0)];

        while let Some((dir, depth)) = stack.pop() {
            if depth > max_depth {
                debug!(dir = %dir.display(), depth, "maximum depth reached");
                continue;
            }

            let canonical = match dir.canonicalize() {
                Ok(p) => p,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "cannot resolve directory");
                    continue;
                }
            };
            if !visited.insert(canonical) {
                continue;
            }

            pb.set_message(format!("Scanning {}...", dir.display()));
            pb.tick();

            if self.reader.is_repository_root(&dir) {
                records.extend(self.extract(&dir));
                continue;
            }

            let mut children = child_dirs(&dir);
            children.sort();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        pb.finish_and_clear();
        records
    }

    fn extract(&self, dir: &Path) -> Vec<CommitRecord> {
        let entries = match self.reader.read_log(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(repo = %dir.display(), error = %e, "skipping unreadable repository");
                return Vec::new();
            }
        };

        let repository = repository_id(dir);
        let records: Vec<CommitRecord> = entries
            .into_iter()
            .filter(|entry| self.admits(entry))
            .map(|entry| CommitRecord {
                repository: repository.clone(),
                timestamp: entry.timestamp,
                hash: entry.hash,
            })
            .collect();

        debug!(repo = %dir.display(), commits = records.len(), "repository scanned");
        records
    }

    fn admits(&self, entry: &LogEntry) -> bool {
        let after_cutoff = self.cutoff.map_or(true, |c| c.admits(entry.timestamp));
        after_cutoff && self.identities.matches(&entry.author)
    }
}

impl Scanner<Box<dyn LogReader>> {
    pub fn from_config(config: &CommitsConfig) -> Self {
        let reader: Box<dyn LogReader> = match config.backend {
            LogBackend::Gix => Box::new(GixLog),
            LogBackend::Git => Box::new(GitCli::new(config.locale.clone())),
        };
        let identities = IdentityFilter::new(&config.identities);
        if identities.is_empty() {
            warn!("commits.identities is empty; no commit will be collected");
        }
        Scanner::new(reader)
            .with_identities(identities)
            .with_cutoff(config.cutoff())
    }
}

/// Real (non-symlink) subdirectories of `dir`; empty when unreadable.
fn child_dirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect()
}
