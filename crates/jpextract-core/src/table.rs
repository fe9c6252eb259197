//! Uniform row-and-column form of one extract response.

use crate::{CourtId, DateRange};

/// Synthetic leading column carrying the requesting court's numeric code.
pub const COURT_COLUMN: &str = "CourtId";

/// Rows of text cells under a header whose first column is [`COURT_COLUMN`].
///
/// A table is only ever built from a response that had at least one row;
/// "no data" is represented by the absence of a table, never an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ExtractTable {
    /// Start a table whose header is `CourtId` followed by `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = std::iter::once(COURT_COLUMN.to_string())
            .chain(fields.into_iter().map(Into::into))
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one record for `court`.
    ///
    /// Short records are padded with nulls. Values past the header width are
    /// dropped; the number dropped is returned so callers can report it.
    pub fn push_row(&mut self, court: CourtId, values: Vec<Option<String>>) -> usize {
        let width = self.columns.len() - 1;
        let dropped = values.len().saturating_sub(width);

        let mut row = Vec::with_capacity(self.columns.len());
        row.push(Some(court.wire().to_string()));
        row.extend(values.into_iter().take(width));
        row.resize(self.columns.len(), None);
        self.rows.push(row);
        dropped
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column name`), if both exist and the cell is non-null.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

/// One item of the retriever's output: a court's rows for one month chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extract {
    pub court: CourtId,
    pub dates: DateRange,
    pub table: ExtractTable,
}
