//! Core trait abstractions for the expression evaluator under test.
//!
//! The conformance harness treats the evaluator as a black box: it can
//! compile an expression and evaluate the compiled form against a context
//! document. This crate defines that seam ([`XPathEngine`]) together with
//! the owned value model the harness inspects when checking assertions.

pub mod error;
pub mod tree;
pub mod value;
pub mod xpath;

pub use error::Error;
pub use tree::{NodeInfo, NodeType, XmlDocument};
pub use value::{Atomic, Item, Value, ValueKind};
pub use xpath::{EvalContext, XPathEngine, XPathVersion};
