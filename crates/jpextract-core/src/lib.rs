pub mod chunk;
pub mod codes;
mod error;
pub mod naming;
pub mod request;
pub mod schema;
pub mod table;

pub use chunk::{DateRange, MonthChunks};
pub use codes::{
    CaseCategory, CaseType, CivilCaseType, CivilExtractType, CourtId, CriminalCaseType,
    CriminalExtractType, ExtractFormat, ExtractType,
};
pub use error::CodeError;
pub use naming::{RawFileName, cleaned_file_name};
pub use request::{ExtractParams, ExtractRequest};
pub use schema::{cases, race};
pub use table::{COURT_COLUMN, Extract, ExtractTable};
