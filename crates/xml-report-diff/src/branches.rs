//! Branch comparison: check out two git branches, run the suite on each
//! and compare the resulting reports

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};
use xml_test_harness::{Report, ReportError};

use crate::diff::{compare_reports, ReportDiff};

/// Command that runs the suite from a checkout; report and catalog
/// arguments are appended
pub const DEFAULT_RUNNER: &[&str] = &[
    "cargo",
    "run",
    "--release",
    "--quiet",
    "--bin",
    "execute-tests",
    "--",
];

/// Failures of the differ, each with its own exit code
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("You can only specify -g or -r, not both")]
    ConflictingModes,

    #[error("You must specify either -g or -r")]
    MissingMode,

    #[error("Error: {} not found or not a directory", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Could not change git branch to {branch}, aborting: {detail}")]
    Checkout { branch: String, detail: String },

    #[error("Error executing test suite: {detail}")]
    Suite { detail: String },

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl DiffError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DiffError::ConflictingModes | DiffError::MissingMode => 1,
            DiffError::RepositoryNotFound(_) => 2,
            DiffError::Checkout { .. } => 3,
            DiffError::Suite { .. } => 4,
            DiffError::Report(_) => 5,
        }
    }
}

/// Settings for comparing two branches of an engine repository
#[derive(Debug, Clone)]
pub struct BranchComparison {
    pub repository: PathBuf,
    pub catalog: PathBuf,
    /// Where `report_<branch>.json` files are kept
    pub report_dir: PathBuf,
    /// Program and leading arguments of the suite runner
    pub runner: Vec<String>,
    /// Run the suite even if a report already exists
    pub force: bool,
}

impl BranchComparison {
    pub fn new(repository: impl Into<PathBuf>, catalog: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            catalog: catalog.into(),
            report_dir: std::env::temp_dir(),
            runner: DEFAULT_RUNNER.iter().map(|arg| arg.to_string()).collect(),
            force: false,
        }
    }

    /// Report location for a branch; path separators in the name are replaced
    pub fn report_path(&self, branch: &str) -> PathBuf {
        let name: String = branch
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.report_dir.join(format!("report_{name}.json"))
    }

    /// Compare the suite results of `old` and `new`
    pub fn run(&self, old: &str, new: &str) -> Result<ReportDiff, DiffError> {
        if !self.repository.is_dir() {
            return Err(DiffError::RepositoryNotFound(self.repository.clone()));
        }

        let old_report = self.report_path(old);
        let new_report = self.report_path(new);

        self.checkout(old)?;
        self.ensure_report(&old_report)?;
        self.checkout(new)?;
        self.ensure_report(&new_report)?;

        let old = Report::read_from(&old_report)?;
        let new = Report::read_from(&new_report)?;
        Ok(compare_reports(&old, &new))
    }

    pub fn checkout(&self, branch: &str) -> Result<(), DiffError> {
        let output = Command::new("git")
            .arg("checkout")
            .arg(branch)
            .current_dir(&self.repository)
            .output()
            .map_err(|e| DiffError::Checkout {
                branch: branch.to_string(),
                detail: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            info!("{}", stderr.trim_end());
        }
        if !output.status.success() {
            return Err(DiffError::Checkout {
                branch: branch.to_string(),
                detail: output.status.to_string(),
            });
        }
        Ok(())
    }

    /// Run the suite into `report` unless it already exists.
    ///
    /// Returns whether the suite was run.
    pub fn ensure_report(&self, report: &Path) -> Result<bool, DiffError> {
        if report.exists() && !self.force {
            info!("{} already exists, not running test suite again", report.display());
            return Ok(false);
        }

        let (program, leading) = self.runner.split_first().ok_or_else(|| DiffError::Suite {
            detail: "no runner command configured".to_string(),
        })?;
        debug!(program = %program, repository = %self.repository.display(), "running test suite");

        let status = Command::new(program)
            .args(leading)
            .args(["-v", "0", "-r"])
            .arg(report)
            .arg(&self.catalog)
            .current_dir(&self.repository)
            .status()
            .map_err(|e| DiffError::Suite { detail: e.to_string() })?;
        if !status.success() {
            return Err(DiffError::Suite {
                detail: status.to_string(),
            });
        }

        info!("Created report: {}", report.display());
        Ok(true)
    }
}
