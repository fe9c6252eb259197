/// Arrow schemas for case extract data.
///
/// Column types are a pure function of the column name, so a schema can be
/// built from a header alone without looking at any data.
pub mod cases {
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

    pub const FILED_DATE: &str = "FiledDate";
    pub const CASE_NUMBER: &str = "CaseNumber";

    /// Sort key of a cleaned table, in order.
    pub const SORT_KEY: [&str; 2] = [FILED_DATE, CASE_NUMBER];

    const FLOAT_SUFFIXES: &[&str] = &["Fees", "Costs", "Rate", "Amount"];
    const DATE_SUFFIX: &str = "Date";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ColumnKind {
        Float,
        DateTime,
        Text,
    }

    impl ColumnKind {
        pub fn data_type(&self) -> DataType {
            match self {
                Self::Float => DataType::Float64,
                Self::DateTime => DataType::Timestamp(TimeUnit::Millisecond, None),
                Self::Text => DataType::Utf8,
            }
        }
    }

    /// Currency/rate suffixes are floats, a `Date` suffix is a timestamp,
    /// everything else is text.
    pub fn column_kind(name: &str) -> ColumnKind {
        if FLOAT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            ColumnKind::Float
        } else if name.ends_with(DATE_SUFFIX) {
            ColumnKind::DateTime
        } else {
            ColumnKind::Text
        }
    }

    pub fn typed_field(name: &str) -> Field {
        Field::new(name, column_kind(name).data_type(), true)
    }

    /// Schema for a raw extract file with the given header.
    pub fn raw_schema<S: AsRef<str>>(header: &[S]) -> Schema {
        Schema::new(
            header
                .iter()
                .map(|name| typed_field(name.as_ref()))
                .collect::<Vec<_>>(),
        )
    }
}

/// Arrow schemas for race probability output.
pub mod race {
    use arrow::datatypes::{DataType, Field, Schema};

    pub const DEFENDANT_NAME: &str = "DefendantName";
    pub const DEFENDANT_ZIP: &str = "DefendantAddressZIP1";

    pub const ROW_INDEX: &str = "row_index";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";

    /// Schema for race probability records.
    ///
    /// `key_fields` are copied from the source table so results can be
    /// joined back on the case key as well as on `row_index`.
    pub fn race_schema(key_fields: &[Field], categories: &[String]) -> Schema {
        let mut fields = vec![Field::new(ROW_INDEX, DataType::UInt64, false)];
        fields.extend(key_fields.iter().cloned());
        fields.push(Field::new(FIRST_NAME, DataType::Utf8, true));
        fields.push(Field::new(LAST_NAME, DataType::Utf8, true));
        fields.extend(
            categories
                .iter()
                .map(|c| Field::new(c, DataType::Float64, true)),
        );
        Schema::new(fields)
    }
}
