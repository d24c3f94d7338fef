//! Report differ for the conformance harness
//!
//! Compares the category counts of two run reports and lists the test
//! cases that moved between categories. In branch mode the reports are
//! produced by checking out two git branches and running the suite on
//! each.

pub mod branches;
pub mod diff;

pub use branches::{BranchComparison, DiffError, DEFAULT_RUNNER};
pub use diff::{compare_reports, CountChange, Moves, ReportDiff};
