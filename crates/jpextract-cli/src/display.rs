//! Terminal display for Parquet outputs.
//!
//! Prints a schema summary followed by the leading rows, either as a grid or,
//! for a single row, as a vertical card that stays readable with the wide
//! extract tables.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use arrow::util::pretty::pretty_format_batches;
use jpextract_store::read_parquet;

pub fn show(path: &Path, rows: usize) -> anyhow::Result<()> {
    let batches = read_parquet(path)?;
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();

    println!("=== {} ===", path.display());
    if let Some(first) = batches.first() {
        for field in first.schema().fields() {
            println!("  {:<32} {}", field.name(), field.data_type());
        }
    }
    println!();

    let head = head(&batches, rows);
    if rows == 1 && total > 0 {
        print_card(&head[0])?;
    } else if !head.is_empty() {
        println!("{}", pretty_format_batches(&head)?);
    }
    println!("{} of {} rows", rows.min(total), total);
    Ok(())
}

/// The first `rows` rows, as zero-copy slices of `batches`.
fn head(batches: &[RecordBatch], rows: usize) -> Vec<RecordBatch> {
    let mut remaining = rows;
    let mut out = Vec::new();
    for batch in batches {
        if remaining == 0 {
            break;
        }
        let n = remaining.min(batch.num_rows());
        if n > 0 {
            out.push(batch.slice(0, n));
        }
        remaining -= n;
    }
    out
}

fn print_card(batch: &RecordBatch) -> anyhow::Result<()> {
    let options = FormatOptions::default().with_null("-");
    let schema = batch.schema();
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let formatter = ArrayFormatter::try_new(column.as_ref(), &options)?;
        println!("  {:<32} {}", field.name(), formatter.value(0));
    }
    Ok(())
}
