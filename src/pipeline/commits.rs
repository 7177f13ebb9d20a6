use super::io::{read_commits, read_json, write_commits, write_json, write_text};
use crate::chart::{layout, render_svg, RevealSchedule};
use crate::config::Config;
use crate::error::Result;
use crate::git::Scanner;
use crate::heat::{aggregate, build_grid};
use crate::model::CommitSummary;
use std::path::Path;
use tracing::info;

pub const COMMITS_CSV: &str = "commits.csv";
pub const COMMITS_JSON: &str = "commits.json";

/// Scan for repositories and write `commits.csv`. Returns the record count.
pub fn collect(config: &Config, progress: bool) -> Result<usize> {
    let root = config.resolve(&config.paths.scan_root);
    info!(root = %root.display(), max_depth = config.commits.max_depth, "scanning for repositories");

    let records = Scanner::from_config(&config.commits)
        .with_progress(progress)
        .scan(&root, config.commits.max_depth);

    write_commits(&config.data_file(COMMITS_CSV), &records)?;
    Ok(records.len())
}

/// Aggregate `commits.csv` into `commits.json`. Returns the commit count.
pub fn count(config: &Config) -> Result<usize> {
    let records = read_commits(&config.data_file(COMMITS_CSV))?;
    let summary = aggregate(&records)?;
    write_json(&config.json_file(COMMITS_JSON), &summary)?;
    Ok(summary.commits_count as usize)
}

pub fn load_summary(config: &Config) -> Result<CommitSummary> {
    read_json(&config.json_file(COMMITS_JSON))
}

/// Render `commits.json` as an SVG heatmap at `out`. Returns the number of weeks.
pub fn heatmap(config: &Config, out: &Path, reduced_motion: bool) -> Result<usize> {
    let summary = load_summary(config)?;
    let grid = build_grid(&summary)?;
    let chart = layout(&grid, &config.chart);
    let reveal = RevealSchedule::plan(&chart, None, reduced_motion);

    write_text(out, &render_svg(&chart, &reveal))?;
    Ok(chart.weeks)
}
