//! Tests for the value model and context documents

use xml_engine_traits::{
    tree::{NodeInfo, NodeType, XmlDocument},
    value::{Atomic, Item, Value, ValueKind},
};

#[test]
fn absent_and_empty_sequence_are_empty() {
    assert!(Value::Absent.is_empty());
    assert!(Value::empty_sequence().is_empty());
    assert!(!Value::integer(0).is_empty());
    assert!(!Value::Sequence(vec![Atomic::Integer(1).into()]).is_empty());
}

#[test]
fn len_counts_items() {
    assert_eq!(Value::Absent.len(), 0);
    assert_eq!(Value::string("abc").len(), 1);
    let seq = Value::Sequence(vec![
        Atomic::Integer(1).into(),
        Atomic::Integer(2).into(),
        Atomic::Integer(3).into(),
    ]);
    assert_eq!(seq.len(), 3);
}

#[test]
fn unwrap_singleton_only_touches_single_item_sequences() {
    let single = Value::Sequence(vec![Atomic::Integer(7).into()]);
    assert_eq!(single.unwrap_singleton(), Value::integer(7));

    let pair = Value::Sequence(vec![Atomic::Integer(1).into(), Atomic::Integer(2).into()]);
    assert_eq!(pair.clone().unwrap_singleton(), pair);
    assert_eq!(Value::Absent.unwrap_singleton(), Value::Absent);
}

#[test]
fn string_value_joins_items_with_spaces() {
    let seq = Value::Sequence(vec![
        Atomic::Integer(1).into(),
        Item::Node(NodeInfo::text("two")),
        Atomic::Boolean(true).into(),
    ]);
    assert_eq!(seq.string_value(), "1 two true");
    assert_eq!(Value::atomic(Atomic::Double(3.0)).string_value(), "3");
    assert_eq!(Value::atomic(Atomic::Double(2.5)).string_value(), "2.5");
    assert_eq!(Value::atomic(Atomic::Double(f64::NAN)).string_value(), "NaN");
    assert_eq!(Value::atomic(Atomic::Double(f64::NEG_INFINITY)).string_value(), "-INF");
}

#[test]
fn boolean_checks_look_through_singletons() {
    assert!(Value::boolean(true).is_boolean(true));
    assert!(Value::Sequence(vec![Atomic::Boolean(false).into()]).is_boolean(false));
    assert!(!Value::string("true").is_boolean(true));
}

#[test]
fn kinds_reflect_runtime_category() {
    assert_eq!(Value::Absent.kind(), ValueKind::Absent);
    assert_eq!(Value::empty_sequence().kind(), ValueKind::Sequence);
    assert_eq!(Value::boolean(true).kind(), ValueKind::Boolean);
    assert_eq!(
        Value::Item(Item::Node(NodeInfo::text("x"))).kind(),
        ValueKind::Node(NodeType::Text)
    );
    assert_eq!(ValueKind::Integer.to_string(), "xs:integer");
}

#[test]
fn text_nodes_are_escaped() {
    let node = NodeInfo::text("a < b & c");
    assert_eq!(node.xml, "a &lt; b &amp; c");
    assert_eq!(node.string_value, "a < b & c");
}

#[test]
fn xml_document_rejects_malformed_input() {
    assert!(XmlDocument::parse("<root><unclosed></root>").is_err());
    let doc = XmlDocument::parse("<root/>").unwrap();
    assert_eq!(doc.text(), "<root/>");
    assert_eq!(doc.uri(), None);
}

#[test]
fn empty_document_is_a_single_element() {
    assert_eq!(XmlDocument::empty().text(), "<empty/>");
}

#[test]
fn xml_document_from_file_records_uri() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.xml");
    std::fs::write(&path, "<doc><a/></doc>").unwrap();

    let doc = XmlDocument::parse_file(&path).unwrap();
    assert_eq!(doc.uri(), Some(path.display().to_string().as_str()));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn document_node_collects_text_content() {
    let doc = XmlDocument::parse("<doc><a>one</a><b>two</b></doc>").unwrap();
    let node = doc.document_node().unwrap();
    assert_eq!(node.node_type, NodeType::Document);
    assert_eq!(node.string_value, "onetwo");
    assert_eq!(node.xml, "<doc><a>one</a><b>two</b></doc>");
}

#[test]
fn parse_file_reads_documents_and_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.xml");
    std::fs::write(&path, "<root>text</root>").unwrap();

    let document = XmlDocument::parse_file(&path).unwrap();
    assert_eq!(document.text(), "<root>text</root>");
    assert_eq!(document.uri(), Some(path.display().to_string().as_str()));

    let missing = XmlDocument::parse_file(&dir.path().join("missing.xml"));
    assert!(matches!(missing, Err(xml_engine_traits::Error::Io(_))));
}
