//! Per-test-case context threaded through evaluation and assertion checks

use std::collections::HashMap;
use std::fmt;

use tracing::level_filters::LevelFilter;
use xml_engine_traits::XPathEngine;

use crate::catalog::{TestCase, TestSet};
use crate::environment::Environment;

/// Output volume, 0 (silent) to 5 (full trace). Never affects outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const SILENT: Verbosity = Verbosity(0);
    pub const SUMMARY: Verbosity = Verbosity(1);
    pub const EXECUTION_FAILURES: Verbosity = Verbosity(2);
    pub const TEST_FAILURES: Verbosity = Verbosity(3);
    pub const DEBUG: Verbosity = Verbosity(4);
    pub const TRACE: Verbosity = Verbosity(5);

    /// Levels above 5 are clamped
    pub fn new(level: u8) -> Self {
        Verbosity(level.min(Self::TRACE.0))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// The most detailed log level shown at this verbosity. Errors from
    /// test code are shown even when silent.
    pub fn level_filter(self) -> LevelFilter {
        match self.0 {
            0 | 1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::SUMMARY
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything one test case needs to run. Built fresh for every case and
/// never mutated.
pub struct TestContext<'a, E: XPathEngine> {
    pub engine: &'a E,
    /// Catalog-wide environments
    pub environments: &'a HashMap<String, Environment>,
    pub test_set: &'a TestSet,
    pub test_case: &'a TestCase,
    pub verbosity: Verbosity,
}

impl<'a, E: XPathEngine> TestContext<'a, E> {
    pub fn new(
        engine: &'a E,
        environments: &'a HashMap<String, Environment>,
        test_set: &'a TestSet,
        test_case: &'a TestCase,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            engine,
            environments,
            test_set,
            test_case,
            verbosity,
        }
    }
}
