//! Race probability model interface.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::RaceError;

/// Category columns produced by BIFSG-style surname/first-name/geography models.
pub const DEFAULT_CATEGORIES: &[&str] = &["white", "black", "api", "native", "multiple", "hispanic"];

/// A name-and-geography race probability model.
///
/// Inputs are parallel slices; the result has one row per input, each with
/// one probability per [`categories`](RaceModel::categories) entry. `None`
/// means the model had no estimate for that record.
pub trait RaceModel {
    fn categories(&self) -> &[String];

    fn probabilities(
        &self,
        first_names: &[String],
        last_names: &[String],
        zips: &[String],
    ) -> Result<Vec<Vec<Option<f64>>>, RaceError>;
}

/// Runs an external program as the model.
///
/// The program is invoked as `program [args..] <input.csv> <output.csv>`.
/// The input has the header `first_name,surname,zcta`; the output must have
/// a header naming every category and one row per input row, in order.
/// Empty, `nan` and `NA` cells are read as no estimate.
#[derive(Debug, Clone)]
pub struct CommandModel {
    program: String,
    args: Vec<String>,
    categories: Vec<String>,
}

impl CommandModel {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Replace the expected output categories. An empty list keeps the current ones.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        if !categories.is_empty() {
            self.categories = categories;
        }
        self
    }

    fn write_input(
        path: &Path,
        first_names: &[String],
        last_names: &[String],
        zips: &[String],
    ) -> Result<(), RaceError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["first_name", "surname", "zcta"])?;
        for ((first, last), zip) in first_names.iter().zip(last_names).zip(zips) {
            writer.write_record([first, last, zip])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_output(&self, path: &Path) -> Result<Vec<Vec<Option<f64>>>, RaceError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let columns = self
            .categories
            .iter()
            .map(|c| {
                headers
                    .iter()
                    .position(|h| h.trim() == c)
                    .ok_or_else(|| RaceError::MissingCategory(c.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let probs = columns
                .iter()
                .zip(&self.categories)
                .map(|(&i, category)| {
                    parse_probability(record.get(i).unwrap_or("")).ok_or_else(|| {
                        RaceError::BadProbability {
                            row,
                            column: category.clone(),
                            value: record.get(i).unwrap_or("").to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(probs);
        }
        Ok(rows)
    }
}

impl RaceModel for CommandModel {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn probabilities(
        &self,
        first_names: &[String],
        last_names: &[String],
        zips: &[String],
    ) -> Result<Vec<Vec<Option<f64>>>, RaceError> {
        if first_names.is_empty() {
            return Ok(Vec::new());
        }
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("names.csv");
        let output = dir.path().join("probabilities.csv");
        Self::write_input(&input, first_names, last_names, zips)?;

        info!(program = %self.program, records = first_names.len(), "running race model");
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(&input)
            .arg(&output)
            .output()?;
        if !result.status.success() {
            return Err(RaceError::ModelFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        debug!(path = %output.display(), "reading race model output");

        let rows = self.read_output(&output)?;
        if rows.len() != first_names.len() {
            return Err(RaceError::RowCountMismatch {
                expected: first_names.len(),
                actual: rows.len(),
            });
        }
        Ok(rows)
    }
}

/// `Some(None)` for a missing estimate, `None` for garbage.
fn parse_probability(value: &str) -> Option<Option<f64>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("na")
    {
        return Some(None);
    }
    value.parse::<f64>().ok().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// A shell script model: `$1` is the input, `$2` the output.
    fn script_model(script: &str) -> CommandModel {
        CommandModel::new("sh", vec!["-c".into(), script.into(), "model".into()])
    }

    #[test]
    fn parses_probability_cells() {
        assert_eq!(parse_probability("0.25"), Some(Some(0.25)));
        assert_eq!(parse_probability(" 1 "), Some(Some(1.0)));
        assert_eq!(parse_probability(""), Some(None));
        assert_eq!(parse_probability("NaN"), Some(None));
        assert_eq!(parse_probability("NA"), Some(None));
        assert_eq!(parse_probability("high"), None);
    }

    #[cfg(unix)]
    #[test]
    fn arguments_with_spaces_pass_through_intact() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("race models");
        std::fs::create_dir(&models).unwrap();
        let script = models.join("run model.sh");
        std::fs::write(
            &script,
            r#"[ "$1" = "--label" ] && [ "$2" = "two words" ] || exit 7
printf 'white,black,api,native,multiple,hispanic\n1,0,0,0,0,0\n' > "$4""#,
        )
        .unwrap();

        let model = CommandModel::new(
            "sh",
            vec![
                script.to_string_lossy().into_owned(),
                "--label".into(),
                "two words".into(),
            ],
        );
        assert_eq!(model.categories(), DEFAULT_CATEGORIES);
        let probs = model
            .probabilities(&strings(&["A"]), &strings(&["B"]), &strings(&["77002"]))
            .unwrap();
        assert_eq!(probs[0][0], Some(1.0));
    }

    #[cfg(unix)]
    #[test]
    fn runs_external_command() {
        // Echo each input row back with fixed probabilities, columns reordered.
        let model = script_model(
            r#"echo "hispanic,name,white,black,api,native,multiple" > "$2"
tail -n +2 "$1" | while IFS=, read first last zip; do
  echo "0.1,$last,0.5,0.2,0.1,,nan" >> "$2"
done"#,
        );
        let probs = model
            .probabilities(
                &strings(&["John", "Jane"]),
                &strings(&["Smith", "Doe"]),
                &strings(&["77002", "77004"]),
            )
            .unwrap();
        assert_eq!(probs.len(), 2);
        assert_eq!(
            probs[0],
            vec![Some(0.5), Some(0.2), Some(0.1), None, None, Some(0.1)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn input_file_has_expected_header() {
        let model = script_model(
            r#"[ "$(head -n 1 "$1")" = "first_name,surname,zcta" ] || exit 9
printf 'white,black,api,native,multiple,hispanic\n1,0,0,0,0,0\n' > "$2""#,
        );
        let probs = model
            .probabilities(&strings(&["A"]), &strings(&["B"]), &strings(&["77002"]))
            .unwrap();
        assert_eq!(probs[0][0], Some(1.0));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_an_error() {
        let model = script_model("echo boom >&2; exit 3");
        let err = model
            .probabilities(&strings(&["A"]), &strings(&["B"]), &strings(&["77002"]))
            .unwrap_err();
        match err {
            RaceError::ModelFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn missing_category_and_short_output_are_errors() {
        let model = script_model(r#"printf 'white,black\n0.5,0.5\n' > "$2""#);
        let err = model
            .probabilities(&strings(&["A"]), &strings(&["B"]), &strings(&["77002"]))
            .unwrap_err();
        assert!(matches!(err, RaceError::MissingCategory(c) if c == "api"));

        let model = script_model(r#"printf 'white\n0.5\n' > "$2""#)
            .with_categories(strings(&["white"]));
        let err = model
            .probabilities(
                &strings(&["A", "C"]),
                &strings(&["B", "D"]),
                &strings(&["77002", "77003"]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RaceError::RowCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn empty_input_skips_the_model() {
        let model = CommandModel::new("/nonexistent/model", Vec::new());
        assert!(model.probabilities(&[], &[], &[]).unwrap().is_empty());
    }
}
