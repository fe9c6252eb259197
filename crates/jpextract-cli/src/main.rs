//! `jpextract`: retrieve, clean, and race-augment Harris County Justice Court extracts.

mod display;
mod stages;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use jpextract_core::{CaseCategory, CourtId};
use jpextract_fetch::EXTRACT_URL;
use jpextract_race::DEFAULT_CATEGORIES;
use tracing::Level;

#[derive(Parser)]
#[command(name = "jpextract")]
#[command(about = "Harris County Justice Court public extract pipeline")]
#[command(version)]
struct Cli {
    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info", env = "JPEXTRACT_LOG_LEVEL")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve raw extracts month by month and court by court
    Download(DownloadArgs),

    /// Concatenate raw extracts into one sorted Parquet file
    Clean(CleanArgs),

    /// Estimate defendant race probabilities for a cleaned Parquet file
    Race(RaceArgs),

    /// Print the first rows of a Parquet file
    Show {
        file: PathBuf,
        /// Number of rows to print
        #[arg(long, short = 'n', default_value_t = 10)]
        rows: usize,
    },
}

#[derive(Args)]
struct DownloadArgs {
    /// First filed date, inclusive (YYYY-MM-DD)
    from: NaiveDate,
    /// Last filed date, inclusive (YYYY-MM-DD)
    to: NaiveDate,
    /// Case category: CIVIL (CV) or CRIMINAL (CR)
    #[arg(long, default_value = "CIVIL", env = "JPEXTRACT_CATEGORY")]
    category: CaseCategory,
    /// Extract type name or code within the category
    #[arg(long, default_value = "CASES_ENTERED")]
    extract: String,
    /// Case type name or code within the category
    #[arg(long, default_value = "EV")]
    case_type: String,
    /// Courts to include, by code or name (default: all sixteen)
    #[arg(long, value_delimiter = ',')]
    courts: Vec<CourtId>,
    /// Directory raw extract files are written to
    #[arg(long, default_value = "./data", env = "JPEXTRACT_DATA_DIR")]
    out_dir: PathBuf,
    /// Extract endpoint URL
    #[arg(long, default_value = EXTRACT_URL, env = "JPEXTRACT_BASE_URL")]
    base_url: String,
    /// Attempts per request, counting the first
    #[arg(long, default_value_t = 5, env = "JPEXTRACT_MAX_ATTEMPTS")]
    max_attempts: u32,
    /// Backoff factor between retries, in milliseconds
    #[arg(long, default_value_t = 100, env = "JPEXTRACT_BACKOFF_MS")]
    backoff_ms: u64,
    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 120, env = "JPEXTRACT_TIMEOUT_SECS")]
    timeout_secs: u64,
}

#[derive(Args)]
struct CleanArgs {
    /// Directory holding raw extract files
    #[arg(long, default_value = "./data", env = "JPEXTRACT_DATA_DIR")]
    data_dir: PathBuf,
    /// Directory the cleaned file is written to (default: the data directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Case category: CIVIL (CV) or CRIMINAL (CR)
    #[arg(long, default_value = "CIVIL", env = "JPEXTRACT_CATEGORY")]
    category: CaseCategory,
    /// Case type name or code within the category
    #[arg(long, default_value = "EV")]
    case_type: String,
    /// Extract type name or code within the category
    #[arg(long, default_value = "JUDGMENTS_ENTERED")]
    extract: String,
}

#[derive(Args)]
struct RaceArgs {
    /// Cleaned Parquet file
    #[arg(long)]
    input: PathBuf,
    /// Output Parquet file (default: the input name with a -race suffix)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Defendant name column
    #[arg(long, default_value = jpextract_core::race::DEFENDANT_NAME)]
    name_column: String,
    /// Defendant ZIP code column
    #[arg(long, default_value = jpextract_core::race::DEFENDANT_ZIP)]
    zip_column: String,
    /// Race model program, run without a shell; input and output CSV paths are appended
    #[arg(long, env = "JPEXTRACT_RACE_MODEL")]
    model_command: String,
    /// One argument for the model program, repeated in order
    #[arg(long = "model-arg", allow_hyphen_values = true)]
    model_args: Vec<String>,
    /// Probability columns the model writes
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()))]
    categories: Vec<String>,
}

/// Logging settings, passed explicitly instead of read from the environment.
struct LogConfig {
    level: Level,
}

impl LogConfig {
    fn init(&self) {
        tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    LogConfig {
        level: cli.log_level,
    }
    .init();
    tracing::debug!("jpextract v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Download(args) => stages::download(args).await,
        Command::Clean(args) => stages::clean(args),
        Command::Race(args) => stages::race(args),
        Command::Show { file, rows } => display::show(&file, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_defaults_to_civil_evictions() {
        let cli = Cli::try_parse_from(["jpextract", "download", "2024-01-01", "2024-03-31"]).unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.category, CaseCategory::Civil);
        assert_eq!(args.extract, "CASES_ENTERED");
        assert_eq!(args.case_type, "EV");
        assert!(args.courts.is_empty());
        assert_eq!(args.max_attempts, 5);
        assert_eq!(cli.log_level, Level::INFO);
    }

    #[test]
    fn courts_parse_by_code_or_name() {
        let cli = Cli::try_parse_from([
            "jpextract",
            "download",
            "2024-01-01",
            "2024-01-31",
            "--courts",
            "305,precinct-8-place-2",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.courts, [CourtId::Precinct1Place1, CourtId::Precinct8Place2]);
        assert_eq!(cli.log_level, Level::DEBUG);
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["jpextract", "download", "01/01/2024", "2024-01-31"]).is_err());
    }

    #[test]
    fn race_categories_default_to_model_columns() {
        let cli = Cli::try_parse_from([
            "jpextract",
            "race",
            "--input",
            "EVICTION-20240101-20240131-JUDGMENTS_ENTERED.parquet",
            "--model-command",
            "surgeo-cli",
        ])
        .unwrap();
        let Command::Race(args) = cli.command else {
            panic!("expected race");
        };
        assert_eq!(args.categories, DEFAULT_CATEGORIES);
        assert_eq!(args.name_column, "DefendantName");
        assert_eq!(args.zip_column, "DefendantAddressZIP1");
        assert!(args.model_args.is_empty());
    }

    #[test]
    fn model_program_and_args_keep_their_spaces() {
        let cli = Cli::try_parse_from([
            "jpextract",
            "race",
            "--input",
            "cases.parquet",
            "--model-command",
            "/opt/race models/run.sh",
            "--model-arg",
            "--flag",
            "--model-arg",
            "two words",
        ])
        .unwrap();
        let Command::Race(args) = cli.command else {
            panic!("expected race");
        };
        assert_eq!(args.model_command, "/opt/race models/run.sh");
        assert_eq!(args.model_args, ["--flag", "two words"]);
    }
}
