//! sxd engine adapter for the conformance harness
//!
//! This adapter wraps the sxd XPath 1.0 engine to implement the
//! xml-engine-traits interfaces, so the command line tools have a
//! working evaluator out of the box.

pub mod tree;
pub mod xpath;

// Re-export main types
pub use xpath::SxdEngine;
