//! One call against the extract endpoint.

use serde::Serialize;

use crate::{CaseCategory, CaseType, CodeError, CourtId, DateRange, ExtractFormat, ExtractType};

/// Date format the endpoint expects for `fdate` / `tdate`.
pub const WIRE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Immutable description of one extract API call.
///
/// Construction checks that the extract type and case type come from the
/// same category and that the dates lie within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractRequest {
    extract: ExtractType,
    court: CourtId,
    case_type: CaseType,
    format: ExtractFormat,
    dates: DateRange,
}

/// Query parameters exactly as the endpoint names them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractParams {
    #[serde(rename = "extractCaseType")]
    pub extract_case_type: &'static str,
    pub extract: u8,
    pub court: u16,
    pub casetype: &'static str,
    pub format: &'static str,
    pub fdate: String,
    pub tdate: String,
}

impl ExtractRequest {
    pub fn new(
        extract: ExtractType,
        court: CourtId,
        case_type: CaseType,
        format: ExtractFormat,
        dates: DateRange,
    ) -> Result<Self, CodeError> {
        if extract.category() != case_type.category() {
            return Err(CodeError::CategoryMismatch {
                extract: extract.name(),
                extract_category: extract.category().name(),
                case_type: case_type.name(),
                case_category: case_type.category().name(),
            });
        }
        if !dates.is_single_month() {
            return Err(CodeError::SpansMonths {
                from: dates.from(),
                to: dates.to(),
            });
        }
        Ok(Self {
            extract,
            court,
            case_type,
            format,
            dates,
        })
    }

    pub fn category(&self) -> CaseCategory {
        self.extract.category()
    }

    pub fn extract(&self) -> ExtractType {
        self.extract
    }

    pub fn court(&self) -> CourtId {
        self.court
    }

    pub fn case_type(&self) -> CaseType {
        self.case_type
    }

    pub fn format(&self) -> ExtractFormat {
        self.format
    }

    pub fn dates(&self) -> DateRange {
        self.dates
    }

    pub fn params(&self) -> ExtractParams {
        ExtractParams {
            extract_case_type: self.category().wire(),
            extract: self.extract.code(),
            court: self.court.wire(),
            casetype: self.case_type.wire(),
            format: self.format.wire(),
            fdate: self.dates.from().format(WIRE_DATE_FORMAT).to_string(),
            tdate: self.dates.to().format(WIRE_DATE_FORMAT).to_string(),
        }
    }
}
