//! Run reports
//!
//! The JSON layout is the interface to the differ: six arrays of test-case
//! names followed by a `summary` object, keys in the order below.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A report category holding test-case names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ParseError,
    EvaluateError,
    ExecuteError,
    TestcodeError,
    Success,
    Failed,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; 6] = [
        Category::ParseError,
        Category::EvaluateError,
        Category::ExecuteError,
        Category::TestcodeError,
        Category::Success,
        Category::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ParseError => "parse_error",
            Category::EvaluateError => "evaluate_error",
            Category::ExecuteError => "execute_error",
            Category::TestcodeError => "testcode_error",
            Category::Success => "success",
            Category::Failed => "failed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Test cases matching the filter
    pub read: usize,
    /// Excluded by spec or feature dependency
    pub ignored: usize,
    /// On the skip list, or with an indeterminate outcome
    pub skipped: usize,
    /// Executed to an outcome
    pub run: usize,
    pub parse_error: usize,
    pub evaluate_error: usize,
    pub execute_error: usize,
    pub testcode_error: usize,
    pub success: usize,
    pub failed: usize,
}

impl Summary {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::ParseError => self.parse_error,
            Category::EvaluateError => self.evaluate_error,
            Category::ExecuteError => self.execute_error,
            Category::TestcodeError => self.testcode_error,
            Category::Success => self.success,
            Category::Failed => self.failed,
        }
    }

    fn count_mut(&mut self, category: Category) -> &mut usize {
        match category {
            Category::ParseError => &mut self.parse_error,
            Category::EvaluateError => &mut self.evaluate_error,
            Category::ExecuteError => &mut self.execute_error,
            Category::TestcodeError => &mut self.testcode_error,
            Category::Success => &mut self.success,
            Category::Failed => &mut self.failed,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} testcases read", self.read)?;
        writeln!(f, "{} testcases ignored", self.ignored)?;
        writeln!(f, "{} testcases skipped", self.skipped)?;
        writeln!(f, "{} testcases run", self.run)?;
        writeln!(f)?;
        writeln!(f, "{} errors while parsing test statement", self.parse_error)?;
        writeln!(f, "{} errors while evaluating test statement", self.evaluate_error)?;
        writeln!(f, "{} other errors while executing testcase", self.execute_error)?;
        writeln!(f, "{} errors from test code", self.testcode_error)?;
        writeln!(f, "{} success", self.success)?;
        write!(f, "{} failed", self.failed)
    }
}

/// Test-case names per category, in discovery order, plus the summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub parse_error: Vec<String>,
    pub evaluate_error: Vec<String>,
    pub execute_error: Vec<String>,
    pub testcode_error: Vec<String>,
    pub success: Vec<String>,
    pub failed: Vec<String>,
    pub summary: Summary,
}

impl Report {
    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::ParseError => &self.parse_error,
            Category::EvaluateError => &self.evaluate_error,
            Category::ExecuteError => &self.execute_error,
            Category::TestcodeError => &self.testcode_error,
            Category::Success => &self.success,
            Category::Failed => &self.failed,
        }
    }

    /// Add a test case to a category and count it
    pub fn record(&mut self, category: Category, name: impl Into<String>) {
        let names = match category {
            Category::ParseError => &mut self.parse_error,
            Category::EvaluateError => &mut self.evaluate_error,
            Category::ExecuteError => &mut self.execute_error,
            Category::TestcodeError => &mut self.testcode_error,
            Category::Success => &mut self.success,
            Category::Failed => &mut self.failed,
        };
        names.push(name.into());
        *self.summary.count_mut(category) += 1;
    }

    /// The category a test case was recorded in, if any
    pub fn category_of(&self, name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.names(*category).iter().any(|n| n == name))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json().map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_from(path: &Path) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
