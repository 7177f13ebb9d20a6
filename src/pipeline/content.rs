//! Site content transforms: trainings, investigations, projects, awards,
//! thumbnail sizes and colours.

use super::io::{field, read_json, read_rows, write_json, Row};
use super::swatch::dominant_color;
use crate::config::Config;
use crate::error::{FolioError, Result};
use crate::util::thumbnail_path;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Billable hours per training day.
const HOURS_PER_DAY: u64 = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSummary {
    pub hours_count: u64,
    pub countries_count: usize,
    pub customers_count: usize,
    pub category_count: BTreeMap<String, u32>,
    /// `YYYY-MM-01` of each training's start date.
    pub months_count: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older_training: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer_training: Option<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardSummary {
    pub awards_count: usize,
    pub countries_count: usize,
    pub projects_count: usize,
}

fn distinct(rows: &[Row], key: &str) -> usize {
    rows.iter().map(|r| field(r, key)).collect::<BTreeSet<_>>().len()
}

fn count_by(rows: &[Row], key: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(field(row, key).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Leading integer of `raw`, so "3 days" and "2.5" read as 3 and 2.
fn leading_int(raw: &str) -> Option<u64> {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn summarize_trainings(rows: &[Row]) -> Result<TrainingSummary> {
    let mut hours_count = 0;
    let mut months_count = BTreeMap::new();
    let mut older: Option<(NaiveDate, &Row)> = None;
    let mut newer: Option<(NaiveDate, &Row)> = None;

    for row in rows {
        let duration = field(row, "duration");
        let days = leading_int(duration)
            .ok_or_else(|| FolioError::Parse(format!("Invalid training duration: {duration:?}")))?;
        hours_count += days * HOURS_PER_DAY;

        let raw = field(row, "date_start");
        let start = parse_date(raw).ok_or_else(|| FolioError::InvalidDate(raw.to_string()))?;
        let key = format!("{}-{:02}-01", start.year(), start.month());
        *months_count.entry(key).or_insert(0) += 1;

        if older.map_or(true, |(d, _)| start < d) {
            older = Some((start, row));
        }
        if newer.map_or(true, |(d, _)| start > d) {
            newer = Some((start, row));
        }
    }

    Ok(TrainingSummary {
        hours_count,
        countries_count: distinct(rows, "country"),
        customers_count: distinct(rows, "customer"),
        category_count: count_by(rows, "category"),
        months_count,
        older_training: older.map(|(_, r)| r.clone()),
        newer_training: newer.map(|(_, r)| r.clone()),
    })
}

pub fn summarize_awards(rows: &[Row]) -> AwardSummary {
    AwardSummary {
        awards_count: rows.len(),
        countries_count: distinct(rows, "country"),
        projects_count: distinct(rows, "project"),
    }
}

/// Fill in a thumbnail path derived from the URL where none is given.
pub fn with_thumbnails(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter()
        .map(|mut row| {
            if field(&row, "thumbnail").is_empty() {
                let thumbnail = thumbnail_path(field(&row, "url"));
                row.insert("thumbnail".to_string(), Value::String(thumbnail));
            }
            row
        })
        .collect()
}

pub fn trainings(config: &Config) -> Result<usize> {
    let rows = read_rows(&config.data_file("trainings.csv"))?;
    let summary = summarize_trainings(&rows)?;
    write_json(&config.json_file("trainings.json"), &summary)?;
    Ok(rows.len())
}

pub fn investigations(config: &Config) -> Result<usize> {
    let rows = read_rows(&config.data_file("investigations.csv"))?;
    write_json(&config.json_file("investigations.json"), &rows)?;
    Ok(rows.len())
}

pub fn projects(config: &Config) -> Result<usize> {
    let rows = with_thumbnails(read_rows(&config.data_file("projects.csv"))?);
    write_json(&config.json_file("projects.json"), &rows)?;
    Ok(rows.len())
}

pub fn awards(config: &Config) -> Result<usize> {
    let rows = read_rows(&config.data_file("awards.csv"))?;
    let summary = summarize_awards(&rows);
    write_json(&config.json_file("awards.json"), &summary)?;
    Ok(summary.awards_count)
}

/// Add `width`/`height` to every project whose thumbnail can be read.
///
/// Returns the number of projects that got dimensions.
pub fn sizes(config: &Config) -> Result<usize> {
    let path = config.json_file("projects.json");
    let mut projects: Vec<Row> = read_json(&path)?;
    let assets = config.resolve(&config.paths.assets_dir);

    let mut sized = 0;
    for project in &mut projects {
        let thumbnail = field(project, "thumbnail");
        if thumbnail.is_empty() {
            continue;
        }
        let image = assets.join(thumbnail);
        match imagesize::size(&image) {
            Ok(dim) => {
                project.insert("width".to_string(), Value::from(dim.width as u64));
                project.insert("height".to_string(), Value::from(dim.height as u64));
                sized += 1;
            }
            Err(e) => {
                if image.exists() {
                    warn!(image = %image.display(), error = %e, "cannot read thumbnail size");
                } else {
                    info!(image = %image.display(), "thumbnail missing, skipped");
                }
            }
        }
    }

    write_json(&path, &projects)?;
    Ok(sized)
}

/// Add a dominant `color` to every project with a readable thumbnail and no
/// colour of its own.
///
/// Returns the number of projects that got a colour.
pub fn colors(config: &Config) -> Result<usize> {
    let path = config.json_file("projects.json");
    let mut projects: Vec<Row> = read_json(&path)?;
    let assets = config.resolve(&config.paths.assets_dir);

    let mut colored = 0;
    for project in &mut projects {
        let thumbnail = field(project, "thumbnail");
        if !field(project, "color").is_empty() || thumbnail.is_empty() {
            continue;
        }
        let image = assets.join(thumbnail);
        if !image.exists() {
            info!(image = %image.display(), "thumbnail missing, skipped");
            continue;
        }
        match dominant_color(&image) {
            Ok(Some(color)) => {
                project.insert("color".to_string(), Value::String(color));
                colored += 1;
            }
            Ok(None) => debug!(image = %image.display(), "no swatch fits thumbnail"),
            Err(e) => warn!(error = %e, "cannot extract thumbnail colour"),
        }
    }

    write_json(&path, &projects)?;
    Ok(colored)
}
