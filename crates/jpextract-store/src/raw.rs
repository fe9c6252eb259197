//! Raw extract CSV files: one per (date chunk, court, case type, extract type).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder, TimestampMillisecondBuilder};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use jpextract_core::cases::{ColumnKind, column_kind, raw_schema};
use jpextract_core::{CaseType, Extract, ExtractTable, ExtractType, RawFileName};
use tracing::{debug, info, warn};

use crate::StoreError;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Write an extract table as CSV. Null cells are written as empty fields.
pub fn write_raw_csv(path: &Path, table: &ExtractTable) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist one retrieved extract under `dir`, named for its dimensions.
///
/// The file is written under a temporary name and renamed into place, so a
/// run killed mid-write never leaves a truncated file the cleaner would pick up.
pub fn persist_extract(
    dir: &Path,
    extract: &Extract,
    case_type: CaseType,
    extract_type: ExtractType,
) -> Result<PathBuf, StoreError> {
    let name = RawFileName {
        dates: extract.dates,
        court: extract.court,
        case_type,
        extract: extract_type,
    };
    let path = dir.join(name.file_name());
    let partial = path.with_extension("csv.partial");

    write_raw_csv(&partial, &extract.table)?;
    fs::rename(&partial, &path)?;

    info!(
        path = %path.display(),
        rows = extract.table.num_rows(),
        "wrote raw extract"
    );
    Ok(path)
}

/// Load a raw extract CSV with column types inferred from the header alone.
///
/// Values that do not parse as their column's type become null; the load
/// itself only fails on I/O or CSV framing errors.
pub fn load_raw_csv(path: &Path) -> Result<RecordBatch, StoreError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let schema = Arc::new(raw_schema(&header));

    let mut builders: Vec<ColumnBuilder> = header
        .iter()
        .map(|name| ColumnBuilder::new(column_kind(name)))
        .collect();

    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        for (i, builder) in builders.iter_mut().enumerate() {
            builder.append(record.get(i));
        }
        rows += 1;
    }

    for (name, builder) in header.iter().zip(&builders) {
        if builder.invalid > 0 {
            warn!(
                file = %path.display(),
                column = %name,
                invalid = builder.invalid,
                "unparseable values loaded as null"
            );
        }
    }

    let columns: Vec<ArrayRef> = builders.into_iter().map(ColumnBuilder::finish).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
    debug!(file = %path.display(), rows, columns = batch.num_columns(), "loaded raw extract");
    Ok(batch)
}

enum Builder {
    Float(Float64Builder),
    DateTime(TimestampMillisecondBuilder),
    Text(StringBuilder),
}

struct ColumnBuilder {
    builder: Builder,
    invalid: usize,
}

impl ColumnBuilder {
    fn new(kind: ColumnKind) -> Self {
        let builder = match kind {
            ColumnKind::Float => Builder::Float(Float64Builder::new()),
            ColumnKind::DateTime => Builder::DateTime(TimestampMillisecondBuilder::new()),
            ColumnKind::Text => Builder::Text(StringBuilder::new()),
        };
        Self {
            builder,
            invalid: 0,
        }
    }

    fn append(&mut self, value: Option<&str>) {
        match &mut self.builder {
            Builder::Text(b) => b.append_option(value.filter(|v| !v.is_empty())),
            Builder::Float(b) => {
                let value = value.map(str::trim).filter(|v| !v.is_empty());
                let parsed = value.and_then(parse_float);
                if value.is_some() && parsed.is_none() {
                    self.invalid += 1;
                }
                b.append_option(parsed);
            }
            Builder::DateTime(b) => {
                let value = value.map(str::trim).filter(|v| !v.is_empty());
                let parsed = value.and_then(parse_timestamp_millis);
                if value.is_some() && parsed.is_none() {
                    self.invalid += 1;
                }
                b.append_option(parsed);
            }
        }
    }

    fn finish(self) -> ArrayRef {
        match self.builder {
            Builder::Float(mut b) => Arc::new(b.finish()),
            Builder::DateTime(mut b) => Arc::new(b.finish()),
            Builder::Text(mut b) => Arc::new(b.finish()),
        }
    }
}

/// Parse a currency or rate value, tolerating `$` and thousands separators.
fn parse_float(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned.trim().parse().ok()
}

/// Parse a date or date-time as wall-clock milliseconds since the epoch.
fn parse_timestamp_millis(s: &str) -> Option<i64> {
    let naive = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().timestamp_millis())
}
