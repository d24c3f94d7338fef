//! XML document and node descriptions shared with evaluator backends

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace node
    Namespace,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Document => "document-node()",
            NodeType::Element => "element()",
            NodeType::Attribute => "attribute()",
            NodeType::Text => "text()",
            NodeType::Comment => "comment()",
            NodeType::ProcessingInstruction => "processing-instruction()",
            NodeType::Namespace => "namespace-node()",
        };
        f.write_str(name)
    }
}

/// A node returned by an engine, detached from the engine's own tree.
///
/// Engines keep their trees internal, so a node crosses the seam as its
/// kind, name, string value and serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub node_type: NodeType,
    /// Local name for elements, attributes and processing instructions
    pub name: Option<String>,
    /// XPath string value of the node
    pub string_value: String,
    /// Serialized form of the node
    pub xml: String,
}

impl NodeInfo {
    pub fn element(name: impl Into<String>, string_value: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Element,
            name: Some(name.into()),
            string_value: string_value.into(),
            xml: xml.into(),
        }
    }

    /// A text node; `xml` is the escaped form of `text`.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let xml = escape_text(&text);
        Self {
            node_type: NodeType::Text,
            name: None,
            string_value: text,
            xml,
        }
    }
}

const EMPTY_DOCUMENT: &str = "<empty/>";

/// A well-formed XML document used as an evaluation context.
///
/// Construction checks well-formedness once; backends re-parse the text
/// into their own tree representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    uri: Option<String>,
    text: Arc<str>,
}

impl XmlDocument {
    /// Parse XML from a string
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text: String = text.into();
        check_well_formed(&text)?;
        Ok(Self {
            uri: None,
            text: text.into(),
        })
    }

    /// Parse XML from a file; the file path becomes the document URI
    pub fn parse_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut document = Self::parse(text)?;
        document.uri = Some(path.display().to_string());
        Ok(document)
    }

    /// The document used when a test declares no context document: a
    /// single empty element, so engines always receive a rooted document.
    pub fn empty() -> Self {
        Self {
            uri: None,
            text: EMPTY_DOCUMENT.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Describe the document node, for binding the whole document to a
    /// variable
    pub fn document_node(&self) -> Result<NodeInfo> {
        let parsed = parse_tree(&self.text)?;
        let string_value = parsed
            .descendants()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect();
        Ok(NodeInfo {
            node_type: NodeType::Document,
            name: None,
            string_value,
            xml: self.text.to_string(),
        })
    }
}

/// Parse `text` with roxmltree, accepting documents that carry a DTD
pub fn parse_tree(text: &str) -> Result<roxmltree::Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(text, options).map_err(|e| Error::xml_parse(e.to_string()))
}

fn check_well_formed(text: &str) -> Result<()> {
    parse_tree(text).map(|_| ())
}

/// Escape character data for inclusion in element content
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape character data for inclusion in a double-quoted attribute
pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
