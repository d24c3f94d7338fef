//! Conformance harness for QT3-style XPath test catalogs
//!
//! Loads a catalog and its test sets, runs every selected test case
//! through an [`XPathEngine`](xml_engine_traits::XPathEngine), checks the
//! output against the test's expected-result assertion and tallies the
//! outcomes into a [`Report`].
//!
//! ```no_run
//! use std::path::Path;
//! use xml_test_harness::{run_catalog, Catalog, RunOptions};
//! # fn demo<E: xml_engine_traits::XPathEngine>(engine: &E) -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load(Path::new("qt3tests/catalog.xml"))?;
//! let report = run_catalog(engine, &catalog, &RunOptions::default())?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod catalog;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod report;
pub mod runner;
mod xml;

pub use assertion::{Assertion, Outcome, TypeRequirement};
pub use catalog::{Catalog, Dependencies, EnvironmentRef, TestCase, TestSet};
pub use context::{TestContext, Verbosity};
pub use environment::{Environment, Schema, Source};
pub use error::{CheckError, CheckResult, ConfigError, ExecutionError, ReportError};
pub use report::{Category, Report, Summary};
pub use runner::{execute_case, run_catalog, Disposition, ExclusionPolicy, RunOptions};
pub use xml::FOTS_NAMESPACE;
