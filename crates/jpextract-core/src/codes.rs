//! Closed code tables for the Harris County Justice Courts public extract API.
//!
//! Every enumeration carries the exact wire value the remote endpoint expects
//! plus a SCREAMING_SNAKE name used in file names and logs. Parsing accepts
//! either form, so free-form operator input is validated here and nowhere else.

use crate::CodeError;

/// Declares a closed enumeration with an explicit wire value and name per variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $wire:ty as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($value:expr, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// The value the remote API expects for this variant.
            pub fn wire(&self) -> $wire {
                match self {
                    $( $name::$variant => $value, )+
                }
            }

            /// The SCREAMING_SNAKE name used in file names and logs.
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let label = normalize_label(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == label || v.wire().to_string().eq_ignore_ascii_case(s))
                    .ok_or_else(|| CodeError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

/// `judgments-entered`, `Judgments Entered` and `JUDGMENTS_ENTERED` all name the same variant.
fn normalize_label(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

pub const ALL_CIVIL_CASE_TYPES: &str = "ADMIN,BRSB,BOND,DD,CTA,DEBT,DCD,DLS,EV,FJ,HGL,ODL,OEPR,\
RR,SC,SSP,TAX,TOW,TURN,WRITG,WR,WRU,SEQ,WRJ";

pub const ALL_CRIMINAL_CASE_TYPES: &str = "CRCIT,CRCOM";

/// File-name stand-in for the comma-joined "all case types" wire value.
pub const ALL_CASE_TYPES_FILE_CODE: &str = "ALL";

wire_enum! {
    pub enum CaseCategory: &'static str as "case category" {
        Criminal => ("CR", "CRIMINAL"),
        Civil => ("CV", "CIVIL"),
    }
}

wire_enum! {
    pub enum CivilExtractType: u8 as "civil extract" {
        CasesEntered => (1, "CASES_ENTERED"),
        HearingsSet => (6, "HEARINGS_SET"),
        JudgmentsEntered => (3, "JUDGMENTS_ENTERED"),
    }
}

wire_enum! {
    pub enum CriminalExtractType: u8 as "criminal extract" {
        CasesEntered => (1, "CASES_ENTERED"),
        HearingsSet => (2, "HEARINGS_SET"),
        CasesDisposed => (5, "CASES_DISPOSED"),
        DscApplicationsPaid => (4, "DSC_APPLICATIONS_PAID"),
    }
}

wire_enum! {
    /// Justice of the Peace courts, one per precinct and place.
    pub enum CourtId: u16 as "court" {
        Precinct1Place1 => (305, "PRECINCT_1_PLACE_1"),
        Precinct1Place2 => (310, "PRECINCT_1_PLACE_2"),
        Precinct2Place1 => (315, "PRECINCT_2_PLACE_1"),
        Precinct2Place2 => (320, "PRECINCT_2_PLACE_2"),
        Precinct3Place1 => (325, "PRECINCT_3_PLACE_1"),
        Precinct3Place2 => (330, "PRECINCT_3_PLACE_2"),
        Precinct4Place1 => (335, "PRECINCT_4_PLACE_1"),
        Precinct4Place2 => (340, "PRECINCT_4_PLACE_2"),
        Precinct5Place1 => (345, "PRECINCT_5_PLACE_1"),
        Precinct5Place2 => (350, "PRECINCT_5_PLACE_2"),
        Precinct6Place1 => (355, "PRECINCT_6_PLACE_1"),
        Precinct6Place2 => (360, "PRECINCT_6_PLACE_2"),
        Precinct7Place1 => (365, "PRECINCT_7_PLACE_1"),
        Precinct7Place2 => (370, "PRECINCT_7_PLACE_2"),
        Precinct8Place1 => (375, "PRECINCT_8_PLACE_1"),
        Precinct8Place2 => (380, "PRECINCT_8_PLACE_2"),
    }
}

impl CourtId {
    pub fn precinct(&self) -> u8 {
        ((self.wire() - 305) / 10 + 1) as u8
    }

    pub fn place(&self) -> u8 {
        ((self.wire() - 305) / 5 % 2 + 1) as u8
    }
}

wire_enum! {
    pub enum CivilCaseType: &'static str as "civil case type" {
        AllCaseTypes => (ALL_CIVIL_CASE_TYPES, "ALL_CASE_TYPES"),
        Administrative => ("ADMIN", "ADMINISTRATIVE"),
        BillOfReview => ("BRSB", "BILL_OF_REVIEW"),
        BondForfeiture => ("BOND", "BOND_FORFEITURE"),
        CruellyTreatedAnimal => ("CTA", "CRUELLY_TREATED_ANIMAL"),
        DangerousDog => ("DD", "DANGEROUS_DOG"),
        DebtClaim => ("DEBT", "DEBT_CLAIM"),
        DogCausingDeathOrSeriousBodilyInjury => ("DCD", "DOG_CAUSING_DEATH_OR_SERIOUS_BODILY_INJURY"),
        DriversLicenseSuspensionHearing => ("DLS", "DRIVERS_LICENSE_SUSPENSION_HEARING"),
        Eviction => ("EV", "EVICTION"),
        ForeignJudgement => ("FJ", "FOREIGN_JUDGEMENT"),
        HandgunLicense => ("HGL", "HANDGUN_LICENSE"),
        OccupationalDriversLicense => ("ODL", "OCCUPATIONAL_DRIVERS_LICENSE"),
        OrderForEntryAndPropertyRetrieval => ("OEPR", "ORDER_FOR_ENTRY_AND_PROPERTY_RETRIEVAL"),
        RepairAndRemedy => ("RR", "REPAIR_AND_REMEDY"),
        SmallClaims => ("SC", "SMALL_CLAIMS"),
        StolenOrSeizedProperty => ("SSP", "STOLEN_OR_SEIZED_PROPERTY"),
        TaxSuit => ("TAX", "TAX_SUIT"),
        TowHearing => ("TOW", "TOW_HEARING"),
        Turnover => ("TURN", "TURNOVER"),
        WritOfGarnishment => ("WRITG", "WRIT_OF_GARNISHMENT"),
        WritOfReentry => ("WR", "WRIT_OF_REENTRY"),
        WritOfRestorationUtility => ("WRU", "WRIT_OF_RESTORATION_UTILITY"),
        WritOfSequestration => ("SEQ", "WRIT_OF_SEQUESTRATION"),
        WritToReviveJudgment => ("WRJ", "WRIT_TO_REVIVE_JUDGMENT"),
    }
}

wire_enum! {
    pub enum CriminalCaseType: &'static str as "criminal case type" {
        AllCaseTypes => (ALL_CRIMINAL_CASE_TYPES, "ALL_CASE_TYPES"),
        CriminalCitation => ("CRCIT", "CRIMINAL_CITATION"),
        CriminalComplaint => ("CRCOM", "CRIMINAL_COMPLAINT"),
    }
}

wire_enum! {
    pub enum ExtractFormat: &'static str as "extract format" {
        Tsv => ("tab", "TSV"),
        Csv => ("csv", "CSV"),
        Xml => ("xml", "XML"),
    }
}

// ── Category-spanning wrappers ──

/// An extract kind from either the civil or the criminal code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractType {
    Civil(CivilExtractType),
    Criminal(CriminalExtractType),
}

impl ExtractType {
    pub fn category(&self) -> CaseCategory {
        match self {
            Self::Civil(_) => CaseCategory::Civil,
            Self::Criminal(_) => CaseCategory::Criminal,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Civil(e) => e.wire(),
            Self::Criminal(e) => e.wire(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Civil(e) => e.name(),
            Self::Criminal(e) => e.name(),
        }
    }

    /// Parse an extract name or code within the given category's table.
    pub fn parse(category: CaseCategory, s: &str) -> Result<Self, CodeError> {
        match category {
            CaseCategory::Civil => s.parse().map(Self::Civil),
            CaseCategory::Criminal => s.parse().map(Self::Criminal),
        }
    }
}

impl From<CivilExtractType> for ExtractType {
    fn from(e: CivilExtractType) -> Self {
        Self::Civil(e)
    }
}

impl From<CriminalExtractType> for ExtractType {
    fn from(e: CriminalExtractType) -> Self {
        Self::Criminal(e)
    }
}

impl std::fmt::Display for ExtractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A case-type filter from either the civil or the criminal code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseType {
    Civil(CivilCaseType),
    Criminal(CriminalCaseType),
}

impl CaseType {
    /// The "every case type" sentinel for a category.
    pub fn all(category: CaseCategory) -> Self {
        match category {
            CaseCategory::Civil => Self::Civil(CivilCaseType::AllCaseTypes),
            CaseCategory::Criminal => Self::Criminal(CriminalCaseType::AllCaseTypes),
        }
    }

    pub fn category(&self) -> CaseCategory {
        match self {
            Self::Civil(_) => CaseCategory::Civil,
            Self::Criminal(_) => CaseCategory::Criminal,
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            Self::Civil(c) => c.wire(),
            Self::Criminal(c) => c.wire(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Civil(c) => c.name(),
            Self::Criminal(c) => c.name(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(
            self,
            Self::Civil(CivilCaseType::AllCaseTypes) | Self::Criminal(CriminalCaseType::AllCaseTypes)
        )
    }

    /// Short code safe to embed in a file name.
    pub fn file_code(&self) -> &'static str {
        if self.is_all() {
            ALL_CASE_TYPES_FILE_CODE
        } else {
            self.wire()
        }
    }

    pub fn parse(category: CaseCategory, s: &str) -> Result<Self, CodeError> {
        match category {
            CaseCategory::Civil => s.parse().map(Self::Civil),
            CaseCategory::Criminal => s.parse().map(Self::Criminal),
        }
    }

    /// Inverse of [`file_code`](Self::file_code).
    pub fn parse_file_code(category: CaseCategory, code: &str) -> Result<Self, CodeError> {
        if code == ALL_CASE_TYPES_FILE_CODE {
            Ok(Self::all(category))
        } else {
            Self::parse(category, code)
        }
    }
}

impl From<CivilCaseType> for CaseType {
    fn from(c: CivilCaseType) -> Self {
        Self::Civil(c)
    }
}

impl From<CriminalCaseType> for CaseType {
    fn from(c: CriminalCaseType) -> Self {
        Self::Criminal(c)
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
