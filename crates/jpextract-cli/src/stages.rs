//! The three pipeline stages, each reading and writing files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use arrow::compute::concat_batches;
use futures::TryStreamExt;
use jpextract_core::{CaseType, DateRange, ExtractType};
use jpextract_fetch::{ExtractClient, ExtractQuery, FetchConfig, RetryPolicy};
use jpextract_race::{CommandModel, calculate_race_probs};
use jpextract_store::{clean_dir, persist_extract, read_parquet, write_parquet};
use tracing::info;

use crate::{CleanArgs, DownloadArgs, RaceArgs};

pub async fn download(args: DownloadArgs) -> anyhow::Result<()> {
    let extract = ExtractType::parse(args.category, &args.extract)?;
    let case_type = CaseType::parse(args.category, &args.case_type)?;
    let dates = DateRange::new(args.from, args.to)?;
    let query = ExtractQuery::new(dates, extract, case_type)?.with_courts(args.courts);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let config = FetchConfig {
        url: args.base_url,
        retry: RetryPolicy {
            max_attempts: args.max_attempts.max(1),
            backoff_factor: Duration::from_millis(args.backoff_ms),
            ..RetryPolicy::default()
        },
        timeout: Duration::from_secs(args.timeout_secs),
        ..FetchConfig::default()
    };
    let client = ExtractClient::new(config)?;

    info!(
        %dates,
        %extract,
        %case_type,
        courts = query.courts().len(),
        "retrieving extracts"
    );
    let stream = client.extracts(&query);
    futures::pin_mut!(stream);

    let (mut files, mut rows) = (0usize, 0usize);
    while let Some(item) = stream.try_next().await.context("retrieving extracts")? {
        persist_extract(&args.out_dir, &item, case_type, extract)?;
        files += 1;
        rows += item.table.num_rows();
    }
    info!(files, rows, "download complete");
    Ok(())
}

pub fn clean(args: CleanArgs) -> anyhow::Result<()> {
    let extract = ExtractType::parse(args.category, &args.extract)?;
    let case_type = CaseType::parse(args.category, &args.case_type)?;

    info!(%case_type, %extract, "concatenating raw extracts");
    let cleaned = clean_dir(&args.data_dir, case_type, extract)
        .with_context(|| format!("cleaning {}", args.data_dir.display()))?;

    let out_dir = args.out_dir.unwrap_or(args.data_dir);
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(cleaned.file_name(case_type, extract)?);
    write_parquet(&path, &cleaned.batch)?;
    info!(
        path = %path.display(),
        files = cleaned.files,
        rows = cleaned.batch.num_rows(),
        "done merging files"
    );
    Ok(())
}

pub fn race(args: RaceArgs) -> anyhow::Result<()> {
    if args.model_command.trim().is_empty() {
        bail!("--model-command is empty");
    }
    let model =
        CommandModel::new(args.model_command, args.model_args).with_categories(args.categories);

    info!(path = %args.input.display(), "loading cleaned cases");
    let batches = read_parquet(&args.input)?;
    let Some(first) = batches.first() else {
        bail!("{} holds no record batches", args.input.display());
    };
    let batch = concat_batches(&first.schema(), &batches)?;

    let race = calculate_race_probs(&batch, &args.name_column, &args.zip_column, &model)
        .context("calculating race probabilities")?;

    let output = args
        .output
        .unwrap_or_else(|| default_race_output(&args.input));
    write_parquet(&output, &race)?;
    info!(path = %output.display(), records = race.num_rows(), "done");
    Ok(())
}

/// `dir/NAME.parquet` becomes `dir/NAME-race.parquet`.
fn default_race_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}-race.parquet"))
}
