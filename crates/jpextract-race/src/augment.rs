//! Race probability augmentation of a cleaned case table.

use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Float64Array, StringArray, UInt64Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, Field};
use arrow::record_batch::RecordBatch;
use jpextract_core::schema::{cases, race};
use tracing::{debug, info};

use crate::names::extract_first_defendant_name;
use crate::{RaceError, RaceModel};

/// ZIP codes are passed to the model as five-digit ZCTAs.
const ZCTA_LEN: usize = 5;

/// Estimate race probabilities for every record of `batch` with both a
/// defendant name and a ZIP code.
///
/// Records missing either are left out. Each output row carries the source
/// row's position as `row_index`, plus the case key columns when the source
/// has them, so results join back onto the cleaned table.
pub fn calculate_race_probs(
    batch: &RecordBatch,
    name_col: &str,
    zip_col: &str,
    model: &dyn RaceModel,
) -> Result<RecordBatch, RaceError> {
    let names = utf8_column(batch, name_col)?;
    let zips = utf8_column(batch, zip_col)?;
    let names = names.as_string::<i32>();
    let zips = zips.as_string::<i32>();

    debug!(records = batch.num_rows(), "parsing names");
    let mut indices = Vec::new();
    let mut first_names = Vec::new();
    let mut last_names = Vec::new();
    let mut zctas = Vec::new();
    for (row, (name, zip)) in names.iter().zip(zips.iter()).enumerate() {
        let (Some(name), Some(zip)) = (name, zip) else {
            continue;
        };
        let parsed = extract_first_defendant_name(name);
        indices.push(row as u64);
        first_names.push(parsed.first);
        last_names.push(parsed.last);
        zctas.push(zip.trim().chars().take(ZCTA_LEN).collect::<String>());
    }
    let skipped = batch.num_rows() - indices.len();
    if skipped > 0 {
        info!(skipped, "records without a name or ZIP left out");
    }

    debug!(records = indices.len(), "calculating race probabilities");
    let probs = model.probabilities(&first_names, &last_names, &zctas)?;
    let categories = model.categories();
    if probs.len() != indices.len() {
        return Err(RaceError::RowCountMismatch {
            expected: indices.len(),
            actual: probs.len(),
        });
    }
    debug!("finished calculating race probabilities");

    let indices = UInt64Array::from(indices);
    let mut key_fields: Vec<Field> = Vec::new();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(indices.clone())];
    let schema = batch.schema();
    for key in [cases::FILED_DATE, cases::CASE_NUMBER] {
        if let Ok(i) = schema.index_of(key) {
            key_fields.push(schema.field(i).clone());
            columns.push(take(batch.column(i).as_ref(), &indices, None)?);
        }
    }
    columns.push(Arc::new(non_empty(&first_names)));
    columns.push(Arc::new(non_empty(&last_names)));
    for (c, _) in categories.iter().enumerate() {
        let values: Float64Array = probs
            .iter()
            .map(|row| row.get(c).copied().flatten())
            .collect();
        columns.push(Arc::new(values));
    }

    let schema = race::race_schema(&key_fields, categories);
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

fn utf8_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, RaceError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| RaceError::MissingColumn(name.to_string()))?;
    Ok(cast(column, &DataType::Utf8)?)
}

fn non_empty(values: &[String]) -> StringArray {
    values
        .iter()
        .map(|v| (!v.is_empty()).then_some(v.as_str()))
        .collect()
}
