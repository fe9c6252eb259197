//! On-disk file names for raw and cleaned extracts.
//!
//! Raw file names encode every dimension of the request that produced them:
//! `raw-20240101-20240131-305-EV-CASES_ENTERED-CV.csv`. The cleaner selects
//! its inputs by parsing these names back.

use chrono::NaiveDate;

use crate::{CaseCategory, CaseType, CodeError, CourtId, DateRange, ExtractType};

const RAW_PREFIX: &str = "raw-";
const RAW_SUFFIX: &str = ".csv";
const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// The dimensions encoded in a raw extract file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFileName {
    pub dates: DateRange,
    pub court: CourtId,
    pub case_type: CaseType,
    pub extract: ExtractType,
}

impl RawFileName {
    pub fn file_name(&self) -> String {
        format!(
            "{RAW_PREFIX}{}-{}-{}-{}-{}-{}{RAW_SUFFIX}",
            self.dates.from().format(FILE_DATE_FORMAT),
            self.dates.to().format(FILE_DATE_FORMAT),
            self.court.wire(),
            self.case_type.file_code(),
            self.extract.name(),
            self.extract.category().wire(),
        )
    }

    pub fn parse(name: &str) -> Result<Self, CodeError> {
        let bad = || CodeError::FileName(name.to_string());

        let stem = name
            .strip_prefix(RAW_PREFIX)
            .and_then(|s| s.strip_suffix(RAW_SUFFIX))
            .ok_or_else(bad)?;
        let parts: Vec<&str> = stem.split('-').collect();
        let [from, to, court, case_code, extract, category] = parts.as_slice() else {
            return Err(bad());
        };

        let category: CaseCategory = category.parse().map_err(|_| bad())?;
        let from = NaiveDate::parse_from_str(from, FILE_DATE_FORMAT).map_err(|_| bad())?;
        let to = NaiveDate::parse_from_str(to, FILE_DATE_FORMAT).map_err(|_| bad())?;

        Ok(Self {
            dates: DateRange::new(from, to)?,
            court: court.parse()?,
            case_type: CaseType::parse_file_code(category, case_code)?,
            extract: ExtractType::parse(category, extract)?,
        })
    }

    /// Whether this file holds the given case type and extract type.
    pub fn matches(&self, case_type: CaseType, extract: ExtractType) -> bool {
        self.case_type == case_type && self.extract == extract
    }
}

/// Name of the cleaned, combined Parquet file covering `filed` dates.
pub fn cleaned_file_name(case_type: CaseType, extract: ExtractType, filed: DateRange) -> String {
    format!(
        "{}-{}-{}-{}.parquet",
        case_type.name(),
        filed.from().format(FILE_DATE_FORMAT),
        filed.to().format(FILE_DATE_FORMAT),
        extract.name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CivilCaseType, CivilExtractType, CriminalCaseType, CriminalExtractType};

    fn jan() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn raw_name_layout() {
        let name = RawFileName {
            dates: jan(),
            court: CourtId::Precinct1Place1,
            case_type: CivilCaseType::Eviction.into(),
            extract: CivilExtractType::CasesEntered.into(),
        };
        assert_eq!(name.file_name(), "raw-20240101-20240131-305-EV-CASES_ENTERED-CV.csv");
    }

    #[test]
    fn raw_name_parses_back() {
        let name = RawFileName {
            dates: jan(),
            court: CourtId::Precinct7Place2,
            case_type: CaseType::all(CaseCategory::Criminal),
            extract: CriminalExtractType::CasesDisposed.into(),
        };
        let file = name.file_name();
        assert_eq!(file, "raw-20240101-20240131-370-ALL-CASES_DISPOSED-CR.csv");
        assert_eq!(RawFileName::parse(&file).unwrap(), name);
    }

    #[test]
    fn unrelated_names_rejected() {
        for bad in [
            "notes.txt",
            "raw-20240101-20240131-305-EV-CASES_ENTERED-CV.parquet",
            "raw-20240101-305-EV-CASES_ENTERED-CV.csv",
            "raw-2024-01-01-20240131-305-EV-CASES_ENTERED-CV.csv",
            "raw-20240101-20240131-999-EV-CASES_ENTERED-CV.csv",
        ] {
            assert!(RawFileName::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn matches_case_and_extract_type() {
        let name = RawFileName {
            dates: jan(),
            court: CourtId::Precinct1Place1,
            case_type: CivilCaseType::Eviction.into(),
            extract: CivilExtractType::JudgmentsEntered.into(),
        };
        assert!(name.matches(
            CivilCaseType::Eviction.into(),
            CivilExtractType::JudgmentsEntered.into()
        ));
        assert!(!name.matches(
            CivilCaseType::Eviction.into(),
            CivilExtractType::CasesEntered.into()
        ));
        assert!(!name.matches(
            CriminalCaseType::CriminalCitation.into(),
            CivilExtractType::JudgmentsEntered.into()
        ));
    }

    #[test]
    fn cleaned_name_layout() {
        let name = cleaned_file_name(
            CivilCaseType::Eviction.into(),
            CivilExtractType::JudgmentsEntered.into(),
            jan(),
        );
        assert_eq!(name, "EVICTION-20240101-20240131-JUDGMENTS_ENTERED.parquet");
    }
}
