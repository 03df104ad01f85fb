//! # homecare CLI entry point
//!
//! Parses command-line arguments, opens the stored document and dispatches
//! to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use homecare_cli::config::Config;
use homecare_cli::data::{
    run_clear, run_export, run_import, run_reset, ConfirmArgs, ExportArgs, ImportArgs,
};
use homecare_cli::records::{
    run_announce, run_expense, run_list, run_orphans, run_remove, run_search, run_upsert,
    AnnounceArgs, ExpenseArgs, ListArgs, RemoveArgs, SearchArgs, UpsertArgs,
};
use homecare_cli::reports::{
    run_attendance, run_finance, run_meals, run_report, run_schedule, run_summary, ReportArgs,
};
use homecare_cli::settings::{run_settings, SettingsArgs};
use homecare_store::Repository;

/// HomeCare: records and reports for a children's home.
///
/// Keeps every record in one local document that is created with sample
/// data on first use.
#[derive(Parser, Debug)]
#[command(name = "homecare", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the stored document.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dashboard: headcounts, funds, stock, costs and age bands.
    Summary(ReportArgs),

    /// Overview report across every collection.
    Report(ReportArgs),

    /// Funds, expenses and budget.
    Finance(ReportArgs),

    /// Meal costs per child, projected per week, month and year.
    Meals(ReportArgs),

    /// Today's attendance counts.
    Attendance(ReportArgs),

    /// Upcoming and completed schedule events.
    Schedule(ReportArgs),

    /// List the records of one collection.
    List(ListArgs),

    /// Create or replace a record from JSON.
    Upsert(UpsertArgs),

    /// Remove a record by id.
    Remove(RemoveArgs),

    /// Book an expense.
    Expense(ExpenseArgs),

    /// Post an announcement.
    Announce(AnnounceArgs),

    /// Search children, staff and donors.
    Search(SearchArgs),

    /// List records that name a child who is not on file.
    Orphans,

    /// Show or change application settings and the budget.
    Settings(SettingsArgs),

    /// Write the whole document to a JSON file.
    Export(ExportArgs),

    /// Replace the document with one read from a JSON file.
    Import(ImportArgs),

    /// Replace all data with the sample data.
    Reset(ConfirmArgs),

    /// Delete every record.
    Clear(ConfirmArgs),
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = Config::resolve(cli.data_dir);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "resolved configuration"
    );

    let today = Local::now().date_naive();
    let mut repo = Repository::open_at(config.state_store(), today, Utc::now())
        .with_context(|| format!("opening data in {}", config.data_dir.display()))?;

    match cli.command {
        Commands::Summary(args) => run_summary(&args, repo.state(), today),
        Commands::Report(args) => run_report(&args, repo.state(), today),
        Commands::Finance(args) => run_finance(&args, repo.state()),
        Commands::Meals(args) => run_meals(&args, repo.state()),
        Commands::Attendance(args) => run_attendance(&args, repo.state(), today),
        Commands::Schedule(args) => run_schedule(&args, repo.state(), today),
        Commands::List(args) => run_list(&args, repo.state(), today),
        Commands::Upsert(args) => run_upsert(&args, &mut repo),
        Commands::Remove(args) => run_remove(&args, &mut repo),
        Commands::Expense(args) => run_expense(&args, &mut repo, today),
        Commands::Announce(args) => run_announce(&args, &mut repo, today),
        Commands::Search(args) => run_search(&args, repo.state(), today),
        Commands::Orphans => run_orphans(repo.state()),
        Commands::Settings(args) => run_settings(&args, &mut repo),
        Commands::Export(args) => run_export(&args, &repo),
        Commands::Import(args) => run_import(&args, &mut repo),
        Commands::Reset(args) => run_reset(&args, &mut repo, today),
        Commands::Clear(args) => run_clear(&args, &mut repo),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("homecare CLI starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn cli_parse_report_flags() {
        let cli = Cli::try_parse_from(["homecare", "summary", "--charts"]).unwrap();
        if let Commands::Summary(args) = cli.command {
            assert!(args.charts);
            assert!(!args.json);
        } else {
            panic!("expected summary");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["homecare", "finance", "-vv", "--data-dir", "/tmp/hc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/hc")));
    }

    #[test]
    fn cli_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "homecare", "list", "health", "--child", "Amina K", "-q", "checkup",
        ])
        .unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.collection, "health");
            assert_eq!(args.child.as_deref(), Some("Amina K"));
            assert_eq!(args.query, "checkup");
            assert!(!args.json);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn cli_parse_screen_filters() {
        let cli = Cli::try_parse_from([
            "homecare",
            "list",
            "schedule",
            "--type",
            "Medical",
            "--date",
            "2025-01-03",
            "--status",
            "Scheduled",
        ])
        .unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.kind.as_deref(), Some("Medical"));
            assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 1, 3));
            assert_eq!(args.status.as_deref(), Some("Scheduled"));
            assert_eq!(args.category, None);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn cli_parse_upsert() {
        let record = r#"{"name":"Ruth A","role":"Cook"}"#;
        let cli = Cli::try_parse_from(["homecare", "upsert", "staff", record]).unwrap();
        if let Commands::Upsert(args) = cli.command {
            assert_eq!(args.collection, "staff");
            assert!(args.record.contains("Ruth A"));
        } else {
            panic!("expected upsert");
        }
    }

    #[test]
    fn cli_parse_expense_with_date() {
        let cli = Cli::try_parse_from([
            "homecare",
            "expense",
            "Gas refill",
            "900",
            "--date",
            "2025-01-05",
        ])
        .unwrap();
        if let Commands::Expense(args) = cli.command {
            assert_eq!(args.desc, "Gas refill");
            assert_eq!(args.amount, 900.0);
            assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 1, 5));
        } else {
            panic!("expected expense");
        }
    }

    #[test]
    fn cli_parse_rejects_a_bad_date() {
        let parsed = Cli::try_parse_from(["homecare", "announce", "Hello", "--date", "05/01/2025"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parse_clear_confirmation() {
        let cli = Cli::try_parse_from(["homecare", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear(ConfirmArgs { yes: false })));
        let cli = Cli::try_parse_from(["homecare", "clear", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear(ConfirmArgs { yes: true })));
    }

    #[test]
    fn cli_parse_export_output_conflicts_with_stdout() {
        let parsed = Cli::try_parse_from(["homecare", "export", "-o", "x.json", "--stdout"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parse_settings() {
        let cli = Cli::try_parse_from([
            "homecare",
            "settings",
            "--currency",
            "USD",
            "--budget",
            "5000",
        ])
        .unwrap();
        if let Commands::Settings(args) = cli.command {
            assert_eq!(args.currency.as_deref(), Some("USD"));
            assert_eq!(args.budget, Some(5000.0));
        } else {
            panic!("expected settings");
        }
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["homecare"]).is_err());
    }
}
