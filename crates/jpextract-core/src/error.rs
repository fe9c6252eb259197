use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("unknown {kind} code: {value:?}")]
    Unknown { kind: &'static str, value: String },

    #[error("{extract} is a {extract_category} extract but {case_type} is a {case_category} case type")]
    CategoryMismatch {
        extract: &'static str,
        extract_category: &'static str,
        case_type: &'static str,
        case_category: &'static str,
    },

    #[error("date range starts {from} after it ends {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("extract request {from}..={to} spans more than one calendar month")]
    SpansMonths { from: NaiveDate, to: NaiveDate },

    #[error("unrecognised raw file name: {0}")]
    FileName(String),
}
