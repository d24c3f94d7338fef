//! XPath engine abstraction trait

use std::collections::BTreeMap;

use crate::error::Result;
use crate::tree::XmlDocument;
use crate::value::Value;

/// Version information for XPath
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XPathVersion {
    V1_0,
    V2_0,
    V3_0,
    V3_1,
}

impl XPathVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            XPathVersion::V1_0 => "1.0",
            XPathVersion::V2_0 => "2.0",
            XPathVersion::V3_0 => "3.0",
            XPathVersion::V3_1 => "3.1",
        }
    }
}

/// Dynamic context for one evaluation: the context document plus the
/// variable and namespace bindings in scope.
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub document: XmlDocument,
    pub variables: BTreeMap<String, Value>,
    pub namespaces: BTreeMap<String, String>,
}

impl EvalContext {
    pub fn new(document: XmlDocument) -> Self {
        Self {
            document,
            variables: BTreeMap::new(),
            namespaces: BTreeMap::new(),
        }
    }

    /// Bind `$name` to `value`
    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Add prefix to namespace URI bindings
    pub fn with_namespaces<I>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.namespaces.extend(namespaces);
        self
    }
}

/// Trait for XPath expression engines.
///
/// Compilation and evaluation are separate steps so that callers can tell
/// a malformed expression apart from one that fails at run time.
///
/// Note: This trait does not require Send + Sync as most XML
/// libraries use Rc<T> for internal references.
pub trait XPathEngine {
    /// Type representing a compiled query
    type Query;

    /// Human readable engine name
    fn engine_name(&self) -> &'static str;

    /// Get the XPath version supported by this engine
    fn xpath_version(&self) -> XPathVersion;

    /// Compile an XPath expression into a query
    fn compile_xpath(&self, xpath: &str) -> Result<Self::Query>;

    /// Evaluate a compiled query against the context document
    fn evaluate(&self, query: &Self::Query, context: &EvalContext) -> Result<Value>;
}
