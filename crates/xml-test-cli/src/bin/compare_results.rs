//! Compare two conformance reports, or the reports of two git branches

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use xml_report_diff::{compare_reports, BranchComparison, DiffError, ReportDiff};
use xml_test_cli::logging::init_logging;
use xml_test_harness::Report;

#[derive(Debug, Parser)]
#[command(name = "compare-results", version, about)]
struct Args {
    /// Old branch, or old report file with -r
    old: String,

    /// New branch, or new report file with -r
    new: String,

    /// Catalog file of the test suite, for branch mode
    #[arg(
        short,
        long = "catalog-file",
        value_name = "FILE",
        default_value = "../qt3tests/catalog.xml"
    )]
    catalog_file: PathBuf,

    /// Engine repository whose branches are compared
    #[arg(short, long = "git-repository", value_name = "DIR")]
    git_repository: Option<PathBuf>,

    /// Compare two existing report files
    #[arg(short, long)]
    reports: bool,

    /// Run the test suite even if a report for the branch exists
    #[arg(short, long)]
    force: bool,

    /// Directory holding the branch reports
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Command running the test suite in the repository
    #[arg(long, value_name = "ARG", num_args = 1.., allow_hyphen_values = true)]
    runner: Option<Vec<String>>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(LevelFilter::INFO);

    match compare(&args) {
        Ok(diff) => {
            print!("{diff}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn compare(args: &Args) -> Result<ReportDiff, DiffError> {
    match (&args.git_repository, args.reports) {
        (Some(_), true) => Err(DiffError::ConflictingModes),
        (None, false) => Err(DiffError::MissingMode),
        (None, true) => {
            let old = Report::read_from(args.old.as_ref())?;
            let new = Report::read_from(args.new.as_ref())?;
            Ok(compare_reports(&old, &new))
        }
        (Some(repository), false) => {
            // the suite runs inside the repository
            let catalog = match std::env::current_dir() {
                Ok(dir) => dir.join(&args.catalog_file),
                Err(_) => args.catalog_file.clone(),
            };

            let mut comparison = BranchComparison::new(repository, catalog);
            comparison.force = args.force;
            if let Some(dir) = &args.report_dir {
                comparison.report_dir = dir.clone();
            }
            if let Some(runner) = &args.runner {
                comparison.runner = runner.clone();
            }
            comparison.run(&args.old, &args.new)
        }
    }
}
