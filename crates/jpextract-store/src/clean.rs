//! Concatenate raw extracts into one table sorted by (filed date, case number).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, new_null_array};
use arrow::compute::{SortColumn, SortOptions, concat_batches, lexsort_to_indices, take};
use arrow::datatypes::{FieldRef, Schema, SchemaRef, TimestampMillisecondType};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::DateTime;
use jpextract_core::cases::{FILED_DATE, SORT_KEY};
use jpextract_core::{CaseType, DateRange, ExtractType, RawFileName, cleaned_file_name};
use tracing::{debug, info};

use crate::{StoreError, load_raw_csv};

/// Result of cleaning one (case type, extract type) pair.
pub struct Cleaned {
    pub batch: RecordBatch,
    pub files: usize,
    /// Earliest and latest filed dates, if any row has one.
    pub filed: Option<DateRange>,
}

impl Cleaned {
    /// Output file name under the naming convention for cleaned extracts.
    pub fn file_name(&self, case_type: CaseType, extract: ExtractType) -> Result<String, StoreError> {
        let filed = self
            .filed
            .ok_or_else(|| StoreError::Other("no filed dates to name the output after".into()))?;
        Ok(cleaned_file_name(case_type, extract, filed))
    }
}

/// Raw extract files in `dir` holding `case_type` / `extract`, in name order.
pub fn find_raw_files(
    dir: &Path,
    case_type: CaseType,
    extract: ExtractType,
) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        match RawFileName::parse(name) {
            Ok(raw) if raw.matches(case_type, extract) => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => debug!(file = name, error = %e, "not a raw extract file"),
        }
    }
    files.sort();
    Ok(files)
}

/// Load, concatenate, and sort every raw file in `dir` for the given pair.
pub fn clean_dir(
    dir: &Path,
    case_type: CaseType,
    extract: ExtractType,
) -> Result<Cleaned, StoreError> {
    let files = find_raw_files(dir, case_type, extract)?;
    if files.is_empty() {
        return Err(StoreError::NoInputFiles {
            dir: dir.to_path_buf(),
            case_type: case_type.name(),
            extract: extract.name(),
        });
    }
    info!(files = files.len(), case_type = %case_type, extract = %extract, "loading raw extracts");

    let batches = files
        .iter()
        .map(|path| load_raw_csv(path))
        .collect::<Result<Vec<_>, _>>()?;
    let combined = concat_tables(&batches)?;
    let batch = sort_by_case_key(&combined)?;
    let filed = filed_range(&batch)?;

    info!(rows = batch.num_rows(), columns = batch.num_columns(), "cleaned extracts");
    Ok(Cleaned {
        batch,
        files: files.len(),
        filed,
    })
}

/// Concatenate tables whose headers may differ.
///
/// The result's columns are the union of all inputs' columns in order of
/// first appearance; a column missing from an input is null for its rows.
pub fn concat_tables(batches: &[RecordBatch]) -> Result<RecordBatch, StoreError> {
    if batches.is_empty() {
        return Err(StoreError::Other("no tables to concatenate".into()));
    }

    let mut seen = HashSet::new();
    let mut fields: Vec<FieldRef> = Vec::new();
    for batch in batches {
        for field in batch.schema().fields() {
            if seen.insert(field.name().clone()) {
                fields.push(field.clone());
            }
        }
    }
    let schema: SchemaRef = Arc::new(Schema::new(fields));

    let aligned = batches
        .iter()
        .map(|b| align_to(b, &schema))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &aligned)?)
}

fn align_to(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch, StoreError> {
    let rows = batch.num_rows();
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| match batch.column_by_name(field.name()) {
            Some(col) => col.clone(),
            None => new_null_array(field.data_type(), rows),
        })
        .collect();
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        schema.clone(),
        columns,
        &options,
    )?)
}

/// Sort rows by `FiledDate` then `CaseNumber`, and move those two columns
/// to the front. Rows with null keys sort last.
pub fn sort_by_case_key(batch: &RecordBatch) -> Result<RecordBatch, StoreError> {
    let schema = batch.schema();
    let key_idx = SORT_KEY
        .iter()
        .map(|name| {
            schema
                .index_of(name)
                .map_err(|_| StoreError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sort_columns: Vec<SortColumn> = key_idx
        .iter()
        .map(|&i| SortColumn {
            values: batch.column(i).clone(),
            options: Some(SortOptions {
                descending: false,
                nulls_first: false,
            }),
        })
        .collect();
    let indices = lexsort_to_indices(&sort_columns, None)?;
    let columns = batch
        .columns()
        .iter()
        .map(|c| take(c.as_ref(), &indices, None))
        .collect::<Result<Vec<_>, _>>()?;
    let sorted = RecordBatch::try_new(schema.clone(), columns)?;

    let order: Vec<usize> = key_idx
        .iter()
        .copied()
        .chain((0..schema.fields().len()).filter(|i| !key_idx.contains(i)))
        .collect();
    Ok(sorted.project(&order)?)
}

/// Earliest and latest `FiledDate` in a cleaned table.
pub fn filed_range(batch: &RecordBatch) -> Result<Option<DateRange>, StoreError> {
    let col = batch
        .column_by_name(FILED_DATE)
        .ok_or_else(|| StoreError::MissingColumn(FILED_DATE.into()))?;
    let filed = col
        .as_primitive_opt::<TimestampMillisecondType>()
        .ok_or_else(|| StoreError::Other(format!("{FILED_DATE} is not a timestamp column")))?;

    let to_date = |ms: i64| DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive());
    let (Some(min), Some(max)) = (
        arrow::compute::min(filed).and_then(to_date),
        arrow::compute::max(filed).and_then(to_date),
    ) else {
        return Ok(None);
    };
    Ok(Some(DateRange::new(min, max).map_err(|e| StoreError::Other(e.to_string()))?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray, TimestampMillisecondArray};
    use chrono::NaiveDate;
    use jpextract_core::{
        CivilCaseType, CivilExtractType, CourtId, Extract, ExtractTable,
    };
    use tempfile::TempDir;

    use crate::persist_extract;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn eviction() -> CaseType {
        CivilCaseType::Eviction.into()
    }

    fn cases_entered() -> ExtractType {
        CivilExtractType::CasesEntered.into()
    }

    /// Persist an eviction CASES_ENTERED extract with the given header and rows.
    fn persist(
        dir: &Path,
        court: CourtId,
        dates: (NaiveDate, NaiveDate),
        header: &[&str],
        rows: &[&[&str]],
    ) -> PathBuf {
        let mut table = ExtractTable::new(header.iter().copied());
        for row in rows {
            table.push_row(court, row.iter().map(|v| Some(v.to_string())).collect());
        }
        let extract = Extract {
            court,
            dates: DateRange::new(dates.0, dates.1).unwrap(),
            table,
        };
        persist_extract(dir, &extract, eviction(), cases_entered()).unwrap()
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let header = ["CaseNumber", "FiledDate", "LateFees"];
        persist(
            tmp.path(),
            CourtId::Precinct1Place1,
            (d(2024, 2, 1), d(2024, 2, 29)),
            &header,
            &[&["B-2", "02/03/2024", "10"], &["A-9", "02/01/2024", "5"]],
        );
        persist(
            tmp.path(),
            CourtId::Precinct1Place2,
            (d(2024, 1, 1), d(2024, 1, 31)),
            &header,
            &[
                &["C-1", "01/15/2024", "1"],
                &["B-1", "01/15/2024", "2"],
                &["A-1", "01/31/2024", "3"],
            ],
        );
        // Different extract type in the same directory.
        let other = Extract {
            court: CourtId::Precinct1Place1,
            dates: DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap(),
            table: {
                let mut t = ExtractTable::new(header);
                t.push_row(CourtId::Precinct1Place1, vec![Some("Z-1".into()), None, None]);
                t
            },
        };
        persist_extract(
            tmp.path(),
            &other,
            eviction(),
            CivilExtractType::JudgmentsEntered.into(),
        )
        .unwrap();
        fs::write(tmp.path().join("notes.txt"), "not an extract").unwrap();
        tmp
    }

    fn strings(batch: &RecordBatch, name: &str) -> Vec<String> {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn finds_only_matching_files() {
        let tmp = fixture();
        let files = find_raw_files(tmp.path(), eviction(), cases_entered()).unwrap();
        assert_eq!(files.len(), 2);
        let judgments =
            find_raw_files(tmp.path(), eviction(), CivilExtractType::JudgmentsEntered.into())
                .unwrap();
        assert_eq!(judgments.len(), 1);
    }

    #[test]
    fn clean_concatenates_and_sorts() {
        let tmp = fixture();
        let cleaned = clean_dir(tmp.path(), eviction(), cases_entered()).unwrap();
        let batch = &cleaned.batch;

        assert_eq!(cleaned.files, 2);
        assert_eq!(batch.num_rows(), 5);
        assert_eq!(batch.schema().field(0).name(), "FiledDate");
        assert_eq!(batch.schema().field(1).name(), "CaseNumber");

        let filed = batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .unwrap();
        for i in 1..filed.len() {
            assert!(filed.value(i - 1) <= filed.value(i), "filed dates out of order at {i}");
        }
        assert_eq!(
            strings(batch, "CaseNumber"),
            vec!["B-1", "C-1", "A-1", "A-9", "B-2"]
        );
        assert_eq!(
            cleaned.filed,
            Some(DateRange::new(d(2024, 1, 15), d(2024, 2, 3)).unwrap())
        );
        assert_eq!(
            cleaned.file_name(eviction(), cases_entered()).unwrap(),
            "EVICTION-20240115-20240203-CASES_ENTERED.parquet"
        );
    }

    #[test]
    fn empty_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let err = clean_dir(tmp.path(), eviction(), cases_entered()).err().unwrap();
        assert!(matches!(err, StoreError::NoInputFiles { .. }));
    }

    #[test]
    fn differing_headers_are_unioned() {
        let tmp = TempDir::new().unwrap();
        persist(
            tmp.path(),
            CourtId::Precinct1Place1,
            (d(2024, 1, 1), d(2024, 1, 31)),
            &["CaseNumber", "FiledDate"],
            &[&["A", "01/02/2024"]],
        );
        persist(
            tmp.path(),
            CourtId::Precinct1Place1,
            (d(2024, 2, 1), d(2024, 2, 29)),
            &["CaseNumber", "FiledDate", "JudgmentAmount"],
            &[&["B", "02/02/2024", "1500.00"]],
        );
        let cleaned = clean_dir(tmp.path(), eviction(), cases_entered()).unwrap();
        let batch = cleaned.batch;
        assert_eq!(batch.num_rows(), 2);
        let amount = batch.column_by_name("JudgmentAmount").unwrap();
        assert!(amount.is_null(0));
        assert!(!amount.is_null(1));
        assert_eq!(batch.column_by_name("CourtId").unwrap().null_count(), 0);
    }

    #[test]
    fn missing_sort_key_is_an_error() {
        let tmp = TempDir::new().unwrap();
        persist(
            tmp.path(),
            CourtId::Precinct1Place1,
            (d(2024, 1, 1), d(2024, 1, 31)),
            &["CaseNumber"],
            &[&["A"]],
        );
        let err = clean_dir(tmp.path(), eviction(), cases_entered()).err().unwrap();
        assert!(matches!(err, StoreError::MissingColumn(ref c) if c == "FiledDate"));
    }

    #[test]
    fn concatenation_preserves_row_total() {
        let tmp = TempDir::new().unwrap();
        let mut expected = 0;
        for (month, count) in [(1u32, 3usize), (2, 1), (3, 4)] {
            let rows: Vec<Vec<String>> = (0..count)
                .map(|i| vec![format!("{month}-{i}"), format!("{month:02}/{:02}/2023", i + 1)])
                .collect();
            let refs: Vec<Vec<&str>> = rows
                .iter()
                .map(|r| r.iter().map(String::as_str).collect())
                .collect();
            let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
            let end = jpextract_core::chunk::last_day_of_month(d(2023, month, 1));
            persist(
                tmp.path(),
                CourtId::Precinct3Place1,
                (d(2023, month, 1), end),
                &["CaseNumber", "FiledDate"],
                &slices,
            );
            expected += count;
        }
        let cleaned = clean_dir(tmp.path(), eviction(), cases_entered()).unwrap();
        assert_eq!(cleaned.batch.num_rows(), expected);
        assert_eq!(
            cleaned.filed,
            Some(DateRange::new(d(2023, 1, 1), d(2023, 3, 4)).unwrap())
        );
    }
}
