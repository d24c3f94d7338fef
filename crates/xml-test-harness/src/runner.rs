//! Run loop: filtering, execution and tallying

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, trace, warn};
use xml_engine_traits::XPathEngine;

use crate::assertion::Outcome;
use crate::catalog::{Catalog, Dependencies};
use crate::context::{TestContext, Verbosity};
use crate::error::{CheckError, ConfigError, ExecutionError};
use crate::report::{Category, Report};

const DISALLOWED_SPECS: &[&str] = &[
    "XQ10", "XQ10+", "XP30", "XP30+", "XQ30", "XQ30+", "XP31", "XP31+", "XQ31", "XQ31+",
];

const DISALLOWED_FEATURES: &[&str] = &["higherOrderFunctions"];

const SKIP_TESTS: &[&str] = &[
    "fn-subsequence.cbcl-subsequence-010",
    "fn-subsequence.cbcl-subsequence-011",
    "fn-subsequence.cbcl-subsequence-012",
    "fn-subsequence.cbcl-subsequence-013",
    "fn-subsequence.cbcl-subsequence-014",
    "prod-NameTest.NodeTest004",
];

/// Which test cases are not executed.
///
/// Cases whose test set or own dependencies name a disallowed spec or
/// feature are ignored; cases on the skip list are skipped. Fields missing
/// from a policy file keep their built-in values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionPolicy {
    pub disallowed_specs: BTreeSet<String>,
    pub disallowed_features: BTreeSet<String>,
    /// Qualified test-case names
    pub skip_tests: BTreeSet<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            disallowed_specs: owned(DISALLOWED_SPECS),
            disallowed_features: owned(DISALLOWED_FEATURES),
            skip_tests: owned(SKIP_TESTS),
        }
    }
}

fn owned(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl ExclusionPolicy {
    /// A policy that runs everything
    pub fn permissive() -> Self {
        Self {
            disallowed_specs: BTreeSet::new(),
            disallowed_features: BTreeSet::new(),
            skip_tests: BTreeSet::new(),
        }
    }

    /// Load a policy from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Policy {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True if the dependencies name a disallowed spec or feature
    pub fn excludes(&self, dependencies: &Dependencies) -> bool {
        dependencies
            .specs
            .iter()
            .any(|spec| self.disallowed_specs.contains(spec))
            || dependencies
                .features
                .iter()
                .any(|feature| self.disallowed_features.contains(feature))
    }

    pub fn skips(&self, test_case: &str) -> bool {
        self.skip_tests.contains(test_case)
    }
}

/// Options for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Substring of qualified test-case names to run
    pub filter: Option<String>,
    pub verbosity: Verbosity,
    pub policy: ExclusionPolicy,
}

impl RunOptions {
    fn selects(&self, test_case: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| test_case.contains(filter))
    }
}

/// What became of one executed test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Recorded in a report category
    Recorded(Category),
    /// Ran, but the outcome was indeterminate
    Indeterminate,
    /// Did not produce an outcome and is counted as skipped
    Skipped,
}

/// Run one test case and classify the result.
///
/// Only configuration errors escape; everything else lands in a category.
pub fn execute_case<E: XPathEngine>(context: &TestContext<'_, E>) -> Result<Disposition, ConfigError> {
    let test_case = context.test_case;
    if context.verbosity >= Verbosity::TRACE {
        trace!("\n{}", test_case.dump());
    }

    let disposition = match test_case.result.validate(context) {
        Ok(Outcome::Satisfied) => Disposition::Recorded(Category::Success),
        Ok(Outcome::NotSatisfied) => {
            info!("test {} failed", test_case.name);
            Disposition::Recorded(Category::Failed)
        }
        Ok(Outcome::Indeterminate) => Disposition::Indeterminate,
        Err(CheckError::Config(e)) => return Err(e),
        Err(CheckError::Execution(ExecutionError::Parse(e))) => {
            warn!("failure in parsing test statement for test {}: {}", test_case.name, e);
            Disposition::Recorded(Category::ParseError)
        }
        Err(CheckError::Execution(ExecutionError::Evaluate(e))) => {
            warn!("failure in evaluating test statement for test {}: {}", test_case.name, e);
            Disposition::Recorded(Category::EvaluateError)
        }
        Err(CheckError::Execution(ExecutionError::UnimplementedPermutation)) => Disposition::Skipped,
        Err(CheckError::Execution(e)) => {
            warn!("failure in executing testcase for test {}: {}", test_case.name, e);
            Disposition::Recorded(Category::ExecuteError)
        }
        Err(CheckError::Harness(message)) => {
            error!("failure in test code for test {}: {}", test_case.name, message);
            Disposition::Recorded(Category::TestcodeError)
        }
    };
    Ok(disposition)
}

/// Run every selected test case of `catalog` against `engine`.
///
/// A configuration error aborts the run.
pub fn run_catalog<E: XPathEngine>(
    engine: &E,
    catalog: &Catalog,
    options: &RunOptions,
) -> Result<Report, ConfigError> {
    let mut report = Report::default();

    for test_set in &catalog.test_sets {
        let set_excluded = options.policy.excludes(&test_set.dependencies);

        for test_case in &test_set.test_cases {
            if !options.selects(&test_case.name) {
                continue;
            }
            report.summary.read += 1;

            if set_excluded || options.policy.excludes(&test_case.dependencies) {
                report.summary.ignored += 1;
                continue;
            }
            if options.policy.skips(&test_case.name) {
                report.summary.skipped += 1;
                continue;
            }

            let context = TestContext::new(
                engine,
                &catalog.environments,
                test_set,
                test_case,
                options.verbosity,
            );
            match execute_case(&context)? {
                Disposition::Recorded(category) => {
                    if matches!(category, Category::Success | Category::Failed) {
                        report.summary.run += 1;
                    }
                    report.record(category, test_case.name.as_str());
                }
                Disposition::Indeterminate => {
                    report.summary.run += 1;
                    report.summary.skipped += 1;
                }
                Disposition::Skipped => report.summary.skipped += 1,
            }
        }
    }

    Ok(report)
}
