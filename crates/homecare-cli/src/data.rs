//! # Data Management Subcommands
//!
//! `export` writes the whole document to a JSON file, `import` replaces
//! the document with one read from a file, `reset` restores the sample
//! data and `clear` empties every collection. `reset` and `clear` destroy
//! the current data and refuse to run without `--yes`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;

use homecare_store::{export, export_file_name, KeyValueStore, Repository};

/// Arguments for `homecare export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file. Defaults to `homecare_report_<YYYYMMDD>_<HHMM>.json`
    /// in the current directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the document to standard output instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Arguments for `homecare import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// A JSON file previously written by `export`.
    pub file: PathBuf,
}

/// Confirmation shared by `reset` and `clear`.
#[derive(Args, Debug, Default)]
pub struct ConfirmArgs {
    /// Confirm that the current data may be discarded.
    #[arg(long)]
    pub yes: bool,
}

pub fn run_export<S: KeyValueStore>(args: &ExportArgs, repo: &Repository<S>) -> Result<u8> {
    let text = export(repo.state())?;
    if args.stdout {
        println!("{text}");
        return Ok(0);
    }
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export_file_name(&Local::now())));
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported document");
    println!(
        "Exported {} records to {}.",
        repo.state().record_count(),
        path.display()
    );
    Ok(0)
}

pub fn run_import<S: KeyValueStore>(args: &ImportArgs, repo: &mut Repository<S>) -> Result<u8> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let state = repo
        .import_at(&text, Utc::now())
        .with_context(|| format!("importing {}", args.file.display()))?;
    println!(
        "Imported {} records from {}.",
        state.record_count(),
        args.file.display()
    );
    Ok(0)
}

pub fn run_reset<S: KeyValueStore>(
    args: &ConfirmArgs,
    repo: &mut Repository<S>,
    today: NaiveDate,
) -> Result<u8> {
    if !args.yes {
        bail!("reset replaces all data with the sample data; pass --yes to confirm");
    }
    let state = repo.reset_at(today, Utc::now())?;
    println!("Restored sample data ({} records).", state.record_count());
    Ok(0)
}

pub fn run_clear<S: KeyValueStore>(args: &ConfirmArgs, repo: &mut Repository<S>) -> Result<u8> {
    if !args.yes {
        bail!("clear deletes every record; pass --yes to confirm");
    }
    repo.clear_at(Utc::now())?;
    println!("All records deleted.");
    Ok(0)
}
