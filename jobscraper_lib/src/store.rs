//! CSV and JSON persistence for scraped records.
//!
//! Both formats are rewritten in full: in append mode the existing file is
//! read, merged with the new batch through [`combine_unique`], and the
//! result overwrites the file.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::merge::{combine_unique, DedupPolicy};
use crate::record::JobRecord;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported store format for {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// How a save treats an existing destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveMode {
    /// Merge with whatever the destination already holds.
    #[default]
    Append,
    /// Replace the destination with the new batch.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Csv,
    Json,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Column names across all records, in first-seen order.
pub fn columns(records: &[JobRecord]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !cols.iter().any(|c| c == key) {
                cols.push(key.to_string());
            }
        }
    }
    cols
}

// -- CSV --

/// Writes a header row followed by one row per record. Absent fields become empty cells.
pub fn write_csv<W: Write>(records: &[JobRecord], writer: W) -> Result<(), StoreError> {
    let cols = columns(records);
    let mut wtr = csv::Writer::from_writer(writer);
    if !cols.is_empty() {
        wtr.write_record(&cols)?;
    }
    for record in records {
        wtr.write_record(cols.iter().map(|c| record.get(c).unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads header + rows. Empty cells load as absent fields.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<JobRecord>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let record: JobRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, value)| !value.is_empty())
            .collect();
        records.push(record);
    }
    Ok(records)
}

// -- JSON --

/// Writes an array of objects with one-space indentation. Non-ASCII text is kept as is.
pub fn write_json<W: Write>(records: &[JobRecord], writer: W) -> Result<(), StoreError> {
    let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b" "));
    records.serialize(&mut ser)?;
    ser.into_inner().flush()?;
    Ok(())
}

/// Reads an array of objects, keeping each object's key order. `null` loads
/// as an absent field; other non-string values keep their JSON text.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<JobRecord>, StoreError> {
    let mut raw = String::new();
    BufReader::new(reader).read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let Value::Array(items) = serde_json::from_str::<Value>(&raw)? else {
        return Err(StoreError::InvalidDocument(
            "expected a JSON array of objects".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::Null => None,
                    Value::String(s) => Some((key, s)),
                    other => Some((key, other.to_string())),
                })
                .collect()),
            _ => Err(StoreError::InvalidDocument(format!(
                "element {} is not an object",
                idx
            ))),
        })
        .collect()
}

// -- Files --

/// Loads a store file, picking the format from its extension. A missing file is an empty store.
pub fn load(path: &Path) -> Result<Vec<JobRecord>, StoreError> {
    let format = StoreFormat::from_path(path)?;
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    match format {
        StoreFormat::Csv => read_csv(BufReader::new(file)),
        StoreFormat::Json => read_json(file),
    }
}

/// Writes `records` to `path`, replacing any previous content.
pub fn write(records: &[JobRecord], path: &Path) -> Result<(), StoreError> {
    let format = StoreFormat::from_path(path)?;
    let file = BufWriter::new(File::create(path)?);
    match format {
        StoreFormat::Csv => write_csv(records, file),
        StoreFormat::Json => write_json(records, file),
    }
}

/// Saves a batch to `path`. Returns the number of records now in the file.
pub fn save(
    records: &[JobRecord],
    path: &Path,
    mode: SaveMode,
    policy: DedupPolicy,
) -> Result<usize, StoreError> {
    // Validate before touching the filesystem.
    StoreFormat::from_path(path)?;

    if mode == SaveMode::Append && path.exists() {
        let existing = load(path)?;
        let merged = combine_unique(&[records, &existing], policy);
        tracing::debug!(
            "Merged {} new and {} stored records into {} for {}",
            records.len(),
            existing.len(),
            merged.len(),
            path.display()
        );
        write(&merged, path)?;
        return Ok(merged.len());
    }

    write(records, path)?;
    Ok(records.len())
}
