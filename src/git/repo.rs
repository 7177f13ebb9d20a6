use crate::error::{FolioError, Result};
use gix::ObjectId;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A commit as read from a repository log, before identity filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: i64,
    pub hash: String,
    /// `Name <email>`
    pub author: String,
}

/// Source of commit logs for the directory scanner.
pub trait LogReader {
    /// True when `dir` is the top level of a repository, not merely inside one.
    fn is_repository_root(&self, dir: &Path) -> bool;

    /// Every commit reachable from `HEAD`, timestamped with its author date.
    fn read_log(&self, dir: &Path) -> Result<Vec<LogEntry>>;
}

impl<R: LogReader + ?Sized> LogReader for Box<R> {
    fn is_repository_root(&self, dir: &Path) -> bool {
        (**self).is_repository_root(dir)
    }

    fn read_log(&self, dir: &Path) -> Result<Vec<LogEntry>> {
        (**self).read_log(dir)
    }
}

/// Reads commit objects in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct GixLog;

impl GixLog {
    fn open(dir: &Path) -> Result<gix::Repository> {
        Ok(gix::open_opts(dir, gix::open::Options::isolated())?)
    }
}

impl LogReader for GixLog {
    fn is_repository_root(&self, dir: &Path) -> bool {
        Self::open(dir).is_ok()
    }

    fn read_log(&self, dir: &Path) -> Result<Vec<LogEntry>> {
        let repo = Self::open(dir)?;
        let mut head = repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut entries = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = repo.find_commit(commit_id)?;
            let author = commit.author()?;
            let timestamp = author
                .time()
                .map_err(|e| FolioError::Parse(format!("Invalid author time in {commit_id}: {e}")))?
                .seconds;

            entries.push(LogEntry {
                timestamp,
                hash: commit_id.to_string(),
                author: format!("{} <{}>", author.name, author.email),
            });

            for pid in commit.parent_ids() {
                stack.push_back(pid.detach());
            }
        }

        Ok(entries)
    }
}

/// Shells out to `git`, pinning the child's locale so output is stable.
#[derive(Debug, Clone)]
pub struct GitCli {
    locale: String,
}

impl GitCli {
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into() }
    }

    fn git(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(dir)
            .env("LANG", &self.locale)
            .env("LC_ALL", &self.locale);
        cmd
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.git(dir).args(args).output()?;
        if !output.status.success() {
            return Err(FolioError::GitCommand {
                path: dir.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("en_GB")
    }
}

impl LogReader for GitCli {
    fn is_repository_root(&self, dir: &Path) -> bool {
        let Ok(toplevel) = self.run(dir, &["rev-parse", "--show-toplevel"]) else {
            return false;
        };
        let toplevel = PathBuf::from(toplevel.trim());
        match (toplevel.canonicalize(), dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn read_log(&self, dir: &Path) -> Result<Vec<LogEntry>> {
        let stdout = self.run(dir, &["log", "--format=%at%x09%H%x09%aN <%ae>"])?;
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_log_line)
            .collect()
    }
}

fn parse_log_line(line: &str) -> Result<LogEntry> {
    let mut fields = line.splitn(3, '\t');
    let (Some(ts), Some(hash), Some(author)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(FolioError::Parse(format!("Malformed log line: {line:?}")));
    };
    let timestamp = ts
        .trim()
        .parse::<i64>()
        .map_err(|e| FolioError::Parse(format!("Invalid timestamp {ts:?}: {e}")))?;
    Ok(LogEntry {
        timestamp,
        hash: hash.to_string(),
        author: author.to_string(),
    })
}
