//! Storage layer: raw extract CSVs, typed loading, the cleaner, and Parquet I/O.

mod error;
pub use error::StoreError;

pub mod clean;
pub mod parquet_io;
pub mod raw;

pub use clean::{Cleaned, clean_dir, concat_tables, find_raw_files, sort_by_case_key};
pub use parquet_io::{read_parquet, write_parquet};
pub use raw::{load_raw_csv, persist_extract, write_raw_csv};
