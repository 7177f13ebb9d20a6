use crate::error::{FolioError, Result};
use crate::model::CommitRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A CSV row keyed by column name. Keys serialize in sorted order.
pub type Row = Map<String, Value>;

const COMMIT_COLUMNS: [&str; 3] = ["repository", "timestamp", "hash"];

fn csv_error(path: &Path, source: csv::Error) -> FolioError {
    FolioError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Rows of a headered CSV file, every value kept as a string.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    reader
        .deserialize::<BTreeMap<String, String>>()
        .map(|row| {
            let row = row.map_err(|e| csv_error(path, e))?;
            Ok(row.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
        })
        .collect()
}

pub fn read_commits(path: &Path) -> Result<Vec<CommitRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    reader
        .deserialize::<CommitRecord>()
        .map(|r| r.map_err(|e| csv_error(path, e)))
        .collect()
}

/// Write `repository,timestamp,hash` rows; the header is written even when empty.
pub fn write_commits(path: &Path, records: &[CommitRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    writer
        .write_record(COMMIT_COLUMNS)
        .map_err(|e| csv_error(path, e))?;
    for record in records {
        writer.serialize(record).map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// String value of `key`, empty when absent.
pub fn field<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or("")
}
