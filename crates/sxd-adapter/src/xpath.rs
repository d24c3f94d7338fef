//! XPathEngine implementation for sxd-xpath

use sxd_document::{dom, parser};
use sxd_xpath::nodeset::Nodeset;
use sxd_xpath::{Context, Factory, XPath};
use xml_engine_traits::{
    error::{Error, Result},
    value::{Atomic, Item, Value},
    xpath::{EvalContext, XPathEngine, XPathVersion},
};

use crate::tree;

/// sxd XPath 1.0 engine adapter
pub struct SxdEngine {
    factory: Factory,
}

impl SxdEngine {
    /// Create a new sxd engine
    pub fn new() -> Self {
        Self {
            factory: Factory::new(),
        }
    }
}

impl Default for SxdEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathEngine for SxdEngine {
    type Query = XPath;

    fn engine_name(&self) -> &'static str {
        "sxd-xpath"
    }

    fn xpath_version(&self) -> XPathVersion {
        XPathVersion::V1_0
    }

    fn compile_xpath(&self, xpath: &str) -> Result<Self::Query> {
        match self.factory.build(xpath) {
            Ok(Some(query)) => Ok(query),
            Ok(None) => Err(Error::xpath_compile("no expression to compile")),
            Err(e) => Err(Error::xpath_compile(format!("{:?}", e))),
        }
    }

    fn evaluate(&self, query: &Self::Query, context: &EvalContext) -> Result<Value> {
        // sxd keeps its own tree, so the context document is re-parsed
        let package = parser::parse(context.document.text())
            .map_err(|e| Error::xml_parse(format!("{:?}", e)))?;
        let document = package.as_document();

        let mut xpath_context = Context::new();
        for (prefix, uri) in &context.namespaces {
            xpath_context.set_namespace(prefix, uri);
        }
        for (name, value) in &context.variables {
            let bound = to_sxd_value(&document, value)?;
            xpath_context.set_variable(name.as_str(), bound);
        }

        let value = query
            .evaluate(&xpath_context, document.root())
            .map_err(|e| Error::xpath_eval(format!("{:?}", e)))?;

        Ok(from_sxd_value(value))
    }
}

fn from_sxd_value(value: sxd_xpath::Value<'_>) -> Value {
    match value {
        sxd_xpath::Value::Boolean(b) => Value::boolean(b),
        sxd_xpath::Value::Number(n) => Value::atomic(Atomic::Double(n)),
        sxd_xpath::Value::String(s) => Value::string(s),
        sxd_xpath::Value::Nodeset(nodes) => Value::Sequence(
            nodes
                .document_order()
                .into_iter()
                .map(|node| Item::Node(tree::node_info(node)))
                .collect(),
        ),
    }
}

fn to_sxd_value<'d>(document: &dom::Document<'d>, value: &Value) -> Result<sxd_xpath::Value<'d>> {
    if let Value::Item(Item::Atomic(atomic)) = value {
        return Ok(atomic_to_sxd(atomic));
    }

    let mut nodes = Nodeset::new();
    for item in value.items() {
        nodes.add(tree::materialize(document, item)?);
    }
    Ok(sxd_xpath::Value::Nodeset(nodes))
}

fn atomic_to_sxd<'d>(atomic: &Atomic) -> sxd_xpath::Value<'d> {
    match atomic {
        Atomic::Boolean(b) => sxd_xpath::Value::Boolean(*b),
        Atomic::Integer(i) => sxd_xpath::Value::Number(*i as f64),
        Atomic::Float(f) => sxd_xpath::Value::Number(f64::from(*f)),
        Atomic::Double(d) => sxd_xpath::Value::Number(*d),
        Atomic::Decimal(_) => {
            sxd_xpath::Value::Number(atomic.string_value().parse().unwrap_or(f64::NAN))
        }
        other => sxd_xpath::Value::String(other.string_value()),
    }
}
