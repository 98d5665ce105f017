// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use clocking_domain::{DEFAULT_CATEGORY_ID, MigrationMode, RunOptions, parse_since};
use clocking_persistence::{TargetStore, Watermark};
use clocking_pipeline::{
    BackfillReport, Endpoints, Job, PipelineConfig, RunReport, run_all_at, run_backfill,
    run_job_at,
};
use color_eyre::eyre::Result;
use time::PrimitiveDateTime;
use time::macros::format_description;
use tracing::{info, level_filters::LevelFilter};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Incremental migration of the legacy `system-smartpro` database into
/// `clocking_reports`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Connection URL of the legacy source database.
    #[arg(
        long,
        global = true,
        env = "SOURCE_DATABASE_URL",
        default_value = "mysql://root@localhost/system-smartpro"
    )]
    source_url: String,

    /// Connection URL of the reporting target database.
    #[arg(
        long,
        global = true,
        env = "TARGET_DATABASE_URL",
        default_value = "mysql://root@localhost/clocking_reports"
    )]
    target_url: String,

    /// Category substituted for unknown category ids. Created if missing.
    #[arg(long, global = true, default_value_t = DEFAULT_CATEGORY_ID)]
    default_category_id: i64,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every job in dependency order, then the backfill pass.
    Run(RunArgs),

    /// Run a single job.
    Job {
        /// Job name, e.g. `users` or `clocking-activities`.
        job: Job,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run only the clocking backfill pass.
    Backfill,

    /// Show the stored watermark of every job.
    #[command(visible_alias = "watermarks")]
    Status,
}

#[derive(clap::Args, Debug, Clone)]
struct RunArgs {
    /// `incremental` or `full`.
    #[arg(long, default_value_t = MigrationMode::Incremental)]
    mode: MigrationMode,

    /// Cutoff overriding the stored watermark, e.g. `2024-01-01 00:00:00`.
    #[arg(long, value_parser = parse_since)]
    since: Option<PrimitiveDateTime>,

    /// Maximum number of source rows read per job.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,

    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn options(&self) -> Result<RunOptions> {
        let options: RunOptions = RunOptions {
            mode: self.mode,
            ..RunOptions::full()
        }
        .with_since(self.since)
        .with_dry_run(self.dry_run)
        .with_limit(self.limit)?;
        Ok(options)
    }
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            source_url: self.source_url.clone(),
            target_url: self.target_url.clone(),
        }
    }

    const fn config(&self) -> PipelineConfig {
        PipelineConfig {
            default_category_id: self.default_category_id,
        }
    }

    fn run(&self) -> Result<()> {
        let endpoints: Endpoints = self.endpoints();
        let config: PipelineConfig = self.config();
        match &self.command {
            Command::Run(run) => {
                let options: RunOptions = run.options()?;
                info!(mode = %options.mode, dry_run = options.dry_run, "Starting pipeline");
                let report: RunReport = run_all_at(&endpoints, &config, &options)?;
                print_report(&report);
            }
            Command::Job { job, run } => {
                let options: RunOptions = run.options()?;
                info!(%job, mode = %options.mode, dry_run = options.dry_run, "Starting job");
                let stats = run_job_at(&endpoints, *job, &config, &options)?;
                println!("{}", stats.summary());
            }
            Command::Backfill => {
                let mut target: TargetStore = endpoints.open_target()?;
                let report: BackfillReport = run_backfill(&mut target)?;
                println!("{report}");
            }
            Command::Status => {
                let mut target: TargetStore = endpoints.open_target()?;
                target.ensure_watermark_table()?;
                let watermarks: Vec<Watermark> = target.list_watermarks()?;
                if watermarks.is_empty() {
                    println!("no watermarks stored");
                }
                for watermark in &watermarks {
                    println!("{}", format_watermark(watermark)?);
                }
            }
        }
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    for stats in &report.jobs {
        println!("{}", stats.summary());
    }
    if let Some(backfill) = &report.backfill {
        println!("{backfill}");
    }
}

fn format_timestamp(ts: Option<PrimitiveDateTime>) -> Result<String> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(ts.map_or_else(|| Ok(String::from("-")), |ts| ts.format(format))?)
}

fn format_watermark(watermark: &Watermark) -> Result<String> {
    let last_id: String = watermark
        .last_id
        .map_or_else(|| String::from("-"), |id| id.to_string());
    Ok(format!(
        "{:<28} last_updated_at={} last_id={} saved_at={}",
        watermark.job_name,
        format_timestamp(watermark.last_updated_at)?,
        last_id,
        format_timestamp(watermark.updated_at)?,
    ))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    args.run()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_incremental() {
        let args = Args::try_parse_from(["clocking-migrate", "run"]).unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        let options = run.options().unwrap();
        assert_eq!(options, RunOptions::incremental());
        assert_eq!(args.default_category_id, DEFAULT_CATEGORY_ID);
    }

    #[test]
    fn test_job_flags_are_parsed() {
        let args = Args::try_parse_from([
            "clocking-migrate",
            "job",
            "clocking-activities",
            "--mode",
            "full",
            "--since",
            "2024-01-02 03:04:05",
            "--limit",
            "50",
            "--dry-run",
            "--default-category-id",
            "9",
        ])
        .unwrap();
        assert_eq!(args.config().default_category_id, 9);
        let Command::Job { job, run } = args.command else {
            panic!("expected job");
        };
        assert_eq!(job, Job::ClockingActivities);
        let options = run.options().unwrap();
        assert_eq!(options.mode, MigrationMode::Full);
        assert_eq!(options.since, Some(datetime!(2024-01-02 03:04:05)));
        assert_eq!(options.limit, Some(50));
        assert!(options.dry_run);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        for argv in [
            vec!["clocking-migrate", "job", "payroll"],
            vec!["clocking-migrate", "run", "--mode", "sometimes"],
            vec!["clocking-migrate", "run", "--limit", "0"],
            vec!["clocking-migrate", "run", "--since", "yesterday"],
        ] {
            assert!(Args::try_parse_from(argv.clone()).is_err(), "{argv:?}");
        }
    }

    #[test]
    fn test_watermark_line_shows_both_positions() {
        let line = format_watermark(&Watermark {
            job_name: String::from("ss_category_clocking"),
            last_updated_at: None,
            last_id: Some(42),
            updated_at: Some(datetime!(2024-03-01 12:00:00)),
        })
        .unwrap();
        assert!(line.starts_with("ss_category_clocking"));
        assert!(line.contains("last_updated_at=- last_id=42"));
        assert!(line.contains("saved_at=2024-03-01 12:00:00"));
    }
}
