//! Run an XPath conformance test suite and summarize the results

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sxd_adapter::SxdEngine;
use xml_engine_traits::XPathEngine;
use xml_test_cli::logging::init_logging;
use xml_test_harness::{run_catalog, Catalog, ExclusionPolicy, RunOptions, Verbosity};

const VERBOSITY_HELP: &str = "\
Verbosity levels:
  0  silent
  1  print the summary (default)
  2  also log errors while executing test cases
  3  also log failed test cases
  4  debug output
  5  full trace, including every test case and expected result";

#[derive(Debug, Parser)]
#[command(name = "execute-tests", version, about, after_help = VERBOSITY_HELP)]
struct Args {
    /// Catalog file of the test suite
    catalog: PathBuf,

    /// Only run test cases whose `set.case` name contains this text
    testcase: Option<String>,

    /// Write a JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Verbosity, 0 to 5
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    verbose: u8,

    /// JSON file replacing the built-in exclusion lists
    #[arg(short = 'x', long, value_name = "FILE")]
    exclusions: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let verbosity = Verbosity::new(args.verbose);
    init_logging(verbosity.level_filter());

    if !args.catalog.exists() {
        eprintln!("Error: {} does not exist", args.catalog.display());
        return ExitCode::from(1);
    }

    match execute(&args, verbosity) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &Args, verbosity: Verbosity) -> anyhow::Result<()> {
    let policy = match &args.exclusions {
        Some(path) => ExclusionPolicy::load(path)?,
        None => ExclusionPolicy::default(),
    };
    let catalog = Catalog::load(&args.catalog)?;

    let engine = SxdEngine::new();
    tracing::debug!(
        engine = engine.engine_name(),
        test_sets = catalog.test_sets.len(),
        test_cases = catalog.test_case_count(),
        "running test suite"
    );

    let options = RunOptions {
        filter: args.testcase.clone(),
        verbosity,
        policy,
    };
    let report = run_catalog(&engine, &catalog, &options)?;

    if verbosity >= Verbosity::SUMMARY {
        println!("{}", report.summary);
    }
    if let Some(path) = &args.report {
        report
            .write_to(path)
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}
