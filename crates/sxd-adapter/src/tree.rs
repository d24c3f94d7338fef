//! Conversion between sxd nodes and detached node descriptions

use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};
use sxd_document::QName;
use sxd_xpath::nodeset::Node;
use xml_engine_traits::{
    error::{Error, Result},
    tree::{escape_attribute, escape_text, parse_tree, NodeInfo, NodeType},
    value::Item,
};

/// Describe an sxd node, serializing it along the way
pub fn node_info(node: Node<'_>) -> NodeInfo {
    let string_value = node.string_value();
    let mut xml = String::new();
    serialize_node(&node, &mut xml);

    let (node_type, name) = match node {
        Node::Root(_) => (NodeType::Document, None),
        Node::Element(element) => (
            NodeType::Element,
            Some(element.name().local_part().to_string()),
        ),
        Node::Attribute(attribute) => (
            NodeType::Attribute,
            Some(attribute.name().local_part().to_string()),
        ),
        Node::Text(_) => (NodeType::Text, None),
        Node::Comment(_) => (NodeType::Comment, None),
        Node::Namespace(_) => (NodeType::Namespace, None),
        Node::ProcessingInstruction(pi) => {
            (NodeType::ProcessingInstruction, Some(pi.target().to_string()))
        }
    };

    NodeInfo {
        node_type,
        name,
        string_value,
        xml,
    }
}

fn serialize_node(node: &Node<'_>, out: &mut String) {
    match node {
        Node::Root(root) => {
            for child in root.children() {
                match child {
                    ChildOfRoot::Element(element) => write_element(element, out),
                    ChildOfRoot::Comment(comment) => write_comment(comment.text(), out),
                    ChildOfRoot::ProcessingInstruction(pi) => {
                        write_processing_instruction(pi.target(), pi.value(), out)
                    }
                }
            }
        }
        Node::Element(element) => write_element(*element, out),
        Node::Attribute(attribute) => {
            out.push_str(&format!(
                "{}=\"{}\"",
                attribute.name().local_part(),
                escape_attribute(attribute.value())
            ));
        }
        Node::Text(text) => out.push_str(&escape_text(text.text())),
        Node::Comment(comment) => write_comment(comment.text(), out),
        Node::ProcessingInstruction(pi) => {
            write_processing_instruction(pi.target(), pi.value(), out)
        }
        Node::Namespace(_) => out.push_str(&node.string_value()),
    }
}

fn write_element(element: dom::Element<'_>, out: &mut String) {
    let name = element.name().local_part();
    out.push('<');
    out.push_str(name);
    for attribute in element.attributes() {
        out.push_str(&format!(
            " {}=\"{}\"",
            attribute.name().local_part(),
            escape_attribute(attribute.value())
        ));
    }

    let children = element.children();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        match child {
            ChildOfElement::Element(child) => write_element(child, out),
            ChildOfElement::Text(text) => out.push_str(&escape_text(text.text())),
            ChildOfElement::Comment(comment) => write_comment(comment.text(), out),
            ChildOfElement::ProcessingInstruction(pi) => {
                write_processing_instruction(pi.target(), pi.value(), out)
            }
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_comment(text: &str, out: &mut String) {
    out.push_str("<!--");
    out.push_str(text);
    out.push_str("-->");
}

fn write_processing_instruction(target: &str, value: Option<&str>, out: &mut String) {
    out.push_str("<?");
    out.push_str(target);
    if let Some(value) = value {
        out.push(' ');
        out.push_str(value);
    }
    out.push_str("?>");
}

/// Recreate an item as a detached node owned by `document`.
///
/// Used to bind node-valued variables: the nodes of an earlier result live
/// in a document that no longer exists, so they are rebuilt from their
/// serialization. Atomic items and nodes without a markup form become text.
pub fn materialize<'d>(document: &dom::Document<'d>, item: &Item) -> Result<Node<'d>> {
    let node = match item {
        Item::Node(info) => match info.node_type {
            NodeType::Element | NodeType::Document => {
                let parsed = parse_tree(&info.xml)
                    .map_err(|e| Error::type_conversion(format!("cannot rebuild node: {e}")))?;
                Node::Element(copy_element(document, parsed.root_element()))
            }
            NodeType::Comment => Node::Comment(document.create_comment(&info.string_value)),
            _ => Node::Text(document.create_text(&info.string_value)),
        },
        Item::Atomic(atomic) => Node::Text(document.create_text(&atomic.string_value())),
    };
    Ok(node)
}

fn copy_element<'d>(document: &dom::Document<'d>, source: roxmltree::Node<'_, '_>) -> dom::Element<'d> {
    let tag = source.tag_name();
    let element = match tag.namespace() {
        Some(uri) => document.create_element(QName::with_namespace_uri(Some(uri), tag.name())),
        None => document.create_element(tag.name()),
    };

    for attribute in source.attributes() {
        element.set_attribute_value(attribute.name(), attribute.value());
    }

    for child in source.children() {
        if child.is_element() {
            element.append_child(copy_element(document, child));
        } else if child.is_text() {
            element.append_child(document.create_text(child.text().unwrap_or_default()));
        } else if child.is_comment() {
            element.append_child(document.create_comment(child.text().unwrap_or_default()));
        }
    }

    element
}
