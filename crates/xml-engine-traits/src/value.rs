//! Owned value model for evaluation results

use std::fmt;

use rust_decimal::Decimal;

use crate::tree::{NodeInfo, NodeType};

/// An atomic value
#[derive(Debug, Clone, PartialEq)]
pub enum Atomic {
    String(String),
    AnyUri(String),
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
    Date(String),
    DateTime(String),
    Time(String),
    Duration(String),
    QName(String),
}

impl Atomic {
    pub fn string_value(&self) -> String {
        match self {
            Atomic::String(s)
            | Atomic::AnyUri(s)
            | Atomic::Date(s)
            | Atomic::DateTime(s)
            | Atomic::Time(s)
            | Atomic::Duration(s)
            | Atomic::QName(s) => s.clone(),
            Atomic::Boolean(b) => b.to_string(),
            Atomic::Integer(i) => i.to_string(),
            Atomic::Decimal(d) => d.normalize().to_string(),
            Atomic::Float(f) => format_double(f64::from(*f)),
            Atomic::Double(d) => format_double(*d),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Atomic::String(_) => ValueKind::String,
            Atomic::AnyUri(_) => ValueKind::AnyUri,
            Atomic::Boolean(_) => ValueKind::Boolean,
            Atomic::Integer(_) => ValueKind::Integer,
            Atomic::Decimal(_) => ValueKind::Decimal,
            Atomic::Float(_) => ValueKind::Float,
            Atomic::Double(_) => ValueKind::Double,
            Atomic::Date(_) => ValueKind::Date,
            Atomic::DateTime(_) => ValueKind::DateTime,
            Atomic::Time(_) => ValueKind::Time,
            Atomic::Duration(_) => ValueKind::Duration,
            Atomic::QName(_) => ValueKind::QName,
        }
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        let sign = if d > 0.0 { "" } else { "-" };
        format!("{sign}INF")
    } else if d == d.trunc() && d.abs() < 1e15 {
        (d as i64).to_string()
    } else {
        d.to_string()
    }
}

/// A single item of a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Atomic(Atomic),
    Node(NodeInfo),
}

impl Item {
    pub fn string_value(&self) -> String {
        match self {
            Item::Atomic(atomic) => atomic.string_value(),
            Item::Node(node) => node.string_value.clone(),
        }
    }

    /// Serialized form: markup for nodes, the string value for atomics
    pub fn serialize(&self) -> String {
        match self {
            Item::Atomic(atomic) => atomic.string_value(),
            Item::Node(node) => node.xml.clone(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Item::Atomic(atomic) => atomic.kind(),
            Item::Node(node) => ValueKind::Node(node.node_type),
        }
    }
}

impl From<Atomic> for Item {
    fn from(atomic: Atomic) -> Self {
        Item::Atomic(atomic)
    }
}

/// Result of evaluating an expression.
///
/// Engines report a lone value as [`Value::Item`] and anything that is a
/// sequence by construction (a node set, a comma expression) as
/// [`Value::Sequence`], even when it holds a single item.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value at all
    #[default]
    Absent,
    Item(Item),
    Sequence(Vec<Item>),
}

impl Value {
    pub fn atomic(atomic: Atomic) -> Self {
        Value::Item(Item::Atomic(atomic))
    }

    pub fn boolean(b: bool) -> Self {
        Value::atomic(Atomic::Boolean(b))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::atomic(Atomic::String(s.into()))
    }

    pub fn integer(i: i64) -> Self {
        Value::atomic(Atomic::Integer(i))
    }

    pub fn empty_sequence() -> Self {
        Value::Sequence(Vec::new())
    }

    /// True for an absent value and for the empty sequence
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Item(_) => false,
            Value::Sequence(items) => items.is_empty(),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        match self {
            Value::Absent => 0,
            Value::Item(_) => 1,
            Value::Sequence(items) => items.len(),
        }
    }

    pub fn items(&self) -> &[Item] {
        match self {
            Value::Absent => &[],
            Value::Item(item) => std::slice::from_ref(item),
            Value::Sequence(items) => items,
        }
    }

    /// The sole item of a lone value or a single-item sequence
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Value::Item(item) => Some(item),
            Value::Sequence(items) if items.len() == 1 => items.first(),
            _ => None,
        }
    }

    /// Replace a single-item sequence by its item
    pub fn unwrap_singleton(self) -> Value {
        match self {
            Value::Sequence(mut items) if items.len() == 1 => match items.pop() {
                Some(item) => Value::Item(item),
                None => Value::Sequence(items),
            },
            other => other,
        }
    }

    /// True iff the value is the boolean `b`
    pub fn is_boolean(&self, b: bool) -> bool {
        matches!(self.as_item(), Some(Item::Atomic(Atomic::Boolean(v))) if *v == b)
    }

    /// True iff the value is a lone string
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Item(Item::Atomic(Atomic::String(_))))
    }

    /// String values of all items, separated by a single space
    pub fn string_value(&self) -> String {
        self.items()
            .iter()
            .map(Item::string_value)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Item(item) => item.kind(),
            Value::Sequence(_) => ValueKind::Sequence,
        }
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Item(item)
    }
}

impl From<Vec<Item>> for Value {
    fn from(items: Vec<Item>) -> Self {
        Value::Sequence(items)
    }
}

/// Runtime category of a value, as used by type assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Sequence,
    String,
    AnyUri,
    Boolean,
    Integer,
    Decimal,
    Float,
    Double,
    Date,
    DateTime,
    Time,
    Duration,
    QName,
    Node(NodeType),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Absent => "absent",
            ValueKind::Sequence => "sequence",
            ValueKind::String => "xs:string",
            ValueKind::AnyUri => "xs:anyURI",
            ValueKind::Boolean => "xs:boolean",
            ValueKind::Integer => "xs:integer",
            ValueKind::Decimal => "xs:decimal",
            ValueKind::Float => "xs:float",
            ValueKind::Double => "xs:double",
            ValueKind::Date => "xs:date",
            ValueKind::DateTime => "xs:dateTime",
            ValueKind::Time => "xs:time",
            ValueKind::Duration => "xs:duration",
            ValueKind::QName => "xs:QName",
            ValueKind::Node(node_type) => return write!(f, "{node_type}"),
        };
        f.write_str(name)
    }
}
