//! Error taxonomy for catalog runs
//!
//! Three families with different fates:
//!
//! - [`ConfigError`]: the catalog or an assertion is something the harness
//!   cannot score. These abort the whole run.
//! - [`ExecutionError`]: the evaluator failed while a test was executed.
//!   These are counted in the report and the run continues.
//! - [`CheckError::Harness`]: anything else that went wrong inside the
//!   harness while checking one test, counted as a test-code error.

use std::path::PathBuf;

use thiserror::Error;
use xml_engine_traits::{Error as EngineError, ValueKind};

/// A malformed catalog or an assertion the harness does not understand
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown environment {reference} in test case {test_case}")]
    UnknownEnvironment { reference: String, test_case: String },

    #[error("environment {environment} declares more than one schema")]
    MultipleSchemas { environment: String },

    #[error("{kind} called with no children")]
    EmptyCombinator { kind: &'static str },

    #[error("<not> called with {children} children, expected exactly 1")]
    NotArity { children: usize },

    #[error("unknown type in assert-type: {token} (result type is {actual}), test case {test_case}")]
    UnknownAssertType {
        token: String,
        actual: ValueKind,
        test_case: String,
    },

    #[error("duplicate test set {name} in catalog")]
    DuplicateTestSet { name: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("invalid exclusion policy {path}: {source}")]
    Policy {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {message}")]
    Catalog { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn catalog(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Catalog {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure of the evaluator while executing a test
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The test expression could not be compiled
    #[error("error parsing test expression: {0}")]
    Parse(#[source] EngineError),

    /// The compiled test expression failed against its context
    #[error("error evaluating test expression: {0}")]
    Evaluate(#[source] EngineError),

    /// The assertion's own comparison expression failed
    #[error("error evaluating comparison expression: {0}")]
    Comparison(#[source] EngineError),

    #[error("context document {path} is not available")]
    MissingContextDocument { path: PathBuf },

    #[error("Unimplemented assert_permutation")]
    UnimplementedPermutation,
}

/// Everything that can stop an assertion from producing an outcome
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("{0}")]
    Harness(String),
}

impl CheckError {
    pub(crate) fn harness(message: impl Into<String>) -> Self {
        CheckError::Harness(message.into())
    }
}

pub type CheckResult<T> = std::result::Result<T, CheckError>;

/// Report persistence failures
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid report {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
