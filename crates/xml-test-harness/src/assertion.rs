//! Result assertions
//!
//! Every test case carries one expectation tree: leaf assertions that
//! check the output of the test expression, combined by `all-of`,
//! `any-of` and `not`. Checking a tree yields an [`Outcome`] or a
//! [`CheckError`]; the run loop turns both into report categories.

use std::fs;
use std::path::PathBuf;

use regex::RegexBuilder;
use roxmltree::Node;
use rust_decimal::Decimal;
use tracing::{debug, trace};
use xml_engine_traits::{Atomic, Item, NodeType, Value, XPathEngine};

use crate::context::TestContext;
use crate::error::{CheckError, CheckResult, ConfigError};
use crate::eval::{evaluate_comparison, run_test};
use crate::xml::{self, SourceFile};

/// Result of checking an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Satisfied,
    NotSatisfied,
    /// The harness cannot decide; reported as skipped
    Indeterminate,
}

impl Outcome {
    pub fn negate(self) -> Self {
        match self {
            Outcome::Satisfied => Outcome::NotSatisfied,
            Outcome::NotSatisfied => Outcome::Satisfied,
            Outcome::Indeterminate => Outcome::Indeterminate,
        }
    }
}

impl From<bool> for Outcome {
    fn from(satisfied: bool) -> Self {
        if satisfied {
            Outcome::Satisfied
        } else {
            Outcome::NotSatisfied
        }
    }
}

/// An expectation node. Leaf values are the element text, unparsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    AllOf(Vec<Assertion>),
    AnyOf(Vec<Assertion>),
    /// Exactly one child is required; checked when validated
    Not(Vec<Assertion>),
    /// Boolean expression over `$result`
    Assert(Option<String>),
    AssertEq(Option<String>),
    AssertType(Option<String>),
    AssertStringValue {
        value: Option<String>,
        normalize_space: bool,
    },
    AssertTrue,
    AssertFalse,
    AssertCount(Option<String>),
    AssertDeepEq(Option<String>),
    AssertEmpty,
    AssertPermutation(Option<String>),
    AssertXml {
        value: Option<String>,
        file: Option<PathBuf>,
    },
    AssertSerializationError {
        code: Option<String>,
    },
    /// Expected error; the code is recorded but any error satisfies it
    Error {
        code: Option<String>,
    },
    SerializationMatches {
        value: Option<String>,
        file: Option<PathBuf>,
        flags: Option<String>,
    },
    /// An element the harness has no rule for
    Unsupported(String),
}

impl Assertion {
    pub(crate) fn from_element(element: Node<'_, '_>, file: &SourceFile) -> Result<Self, ConfigError> {
        let value = xml::text(element);
        let children = || {
            element
                .children()
                .filter(|child| child.is_element())
                .map(|child| Assertion::from_element(child, file))
                .collect::<Result<Vec<_>, _>>()
        };
        let expected_file = || element.attribute("file").map(|f| file.resolve(f));
        let code = || element.attribute("code").map(str::to_string);

        let assertion = match element.tag_name().name() {
            "all-of" => Assertion::AllOf(children()?),
            "any-of" => Assertion::AnyOf(children()?),
            "not" => Assertion::Not(children()?),
            "assert" => Assertion::Assert(value),
            "assert-eq" => Assertion::AssertEq(value),
            "assert-type" => Assertion::AssertType(value),
            "assert-string-value" => Assertion::AssertStringValue {
                value,
                normalize_space: matches!(element.attribute("normalize-space"), Some("true" | "1")),
            },
            "assert-true" => Assertion::AssertTrue,
            "assert-false" => Assertion::AssertFalse,
            "assert-count" => Assertion::AssertCount(value),
            "assert-deep-eq" => Assertion::AssertDeepEq(value),
            "assert-empty" => Assertion::AssertEmpty,
            "assert-permutation" => Assertion::AssertPermutation(value),
            "assert-xml" => Assertion::AssertXml {
                value,
                file: expected_file(),
            },
            "assert-serialization-error" => Assertion::AssertSerializationError { code: code() },
            "error" => Assertion::Error { code: code() },
            "serialization-matches" => Assertion::SerializationMatches {
                value,
                file: expected_file(),
                flags: element.attribute("flags").map(str::to_string),
            },
            other => Assertion::Unsupported(other.to_string()),
        };
        Ok(assertion)
    }

    /// Element name of this assertion
    pub fn kind(&self) -> &str {
        match self {
            Assertion::AllOf(_) => "all-of",
            Assertion::AnyOf(_) => "any-of",
            Assertion::Not(_) => "not",
            Assertion::Assert(_) => "assert",
            Assertion::AssertEq(_) => "assert-eq",
            Assertion::AssertType(_) => "assert-type",
            Assertion::AssertStringValue { .. } => "assert-string-value",
            Assertion::AssertTrue => "assert-true",
            Assertion::AssertFalse => "assert-false",
            Assertion::AssertCount(_) => "assert-count",
            Assertion::AssertDeepEq(_) => "assert-deep-eq",
            Assertion::AssertEmpty => "assert-empty",
            Assertion::AssertPermutation(_) => "assert-permutation",
            Assertion::AssertXml { .. } => "assert-xml",
            Assertion::AssertSerializationError { .. } => "assert-serialization-error",
            Assertion::Error { .. } => "error",
            Assertion::SerializationMatches { .. } => "serialization-matches",
            Assertion::Unsupported(kind) => kind,
        }
    }

    /// The comparison literal, if this kind carries one
    pub fn value(&self) -> Option<&str> {
        match self {
            Assertion::Assert(value)
            | Assertion::AssertEq(value)
            | Assertion::AssertType(value)
            | Assertion::AssertCount(value)
            | Assertion::AssertDeepEq(value)
            | Assertion::AssertPermutation(value)
            | Assertion::AssertStringValue { value, .. }
            | Assertion::AssertXml { value, .. }
            | Assertion::SerializationMatches { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Check the current test case against this assertion
    pub fn validate<E: XPathEngine>(&self, context: &TestContext<'_, E>) -> CheckResult<Outcome> {
        trace!("Calling validate on Result for type {}", self.kind());
        trace!("Expecting value: {:?}", self.value());

        match self {
            Assertion::AllOf(children) => all_of(children, context),
            Assertion::AnyOf(children) => any_of(children, context),
            Assertion::Not(children) => match children.as_slice() {
                [child] => Ok(child.validate(context)?.negate()),
                _ => Err(ConfigError::NotArity {
                    children: children.len(),
                }
                .into()),
            },

            Assertion::Assert(value) => {
                let output = run_test(context)?;
                let expression = required(value, self.kind())?;
                let verdict = evaluate_comparison(context.engine, expression, Some(&output))?;
                Ok(verdict.is_boolean(true).into())
            }
            Assertion::AssertEq(value) => {
                let output = run_test(context)?.unwrap_singleton();
                let expression = required(value, self.kind())?;
                let expected = evaluate_comparison(context.engine, expression, None)?;
                Ok(values_equal(&expected, &output).into())
            }
            Assertion::AssertDeepEq(value) => {
                let output = run_test(context)?;
                let expression = format!("fn:deep-equal($result, ({}))", required(value, self.kind())?);
                let verdict = evaluate_comparison(context.engine, &expression, Some(&output))?;
                Ok(verdict.is_boolean(true).into())
            }
            Assertion::AssertType(value) => {
                let output = run_test(context)?;
                let token = required(value, self.kind())?;
                let requirement =
                    TypeRequirement::from_token(token).ok_or_else(|| ConfigError::UnknownAssertType {
                        token: token.to_string(),
                        actual: output.kind(),
                        test_case: context.test_case.name.clone(),
                    })?;
                Ok(requirement.accepts(&output).into())
            }
            Assertion::AssertStringValue {
                value,
                normalize_space,
            } => {
                let output = run_test(context)?.string_value();
                let expected = value.as_deref().unwrap_or_default();
                let satisfied = if *normalize_space {
                    normalize_whitespace(&output) == normalize_whitespace(expected)
                } else {
                    output == expected
                };
                Ok(satisfied.into())
            }
            Assertion::AssertTrue => Ok(run_test(context)?.is_boolean(true).into()),
            Assertion::AssertFalse => match run_test(context) {
                Ok(output) => Ok(output.is_boolean(false).into()),
                // separate arm from assert-true; both propagate the error
                Err(e) => Err(e),
            },
            Assertion::AssertCount(value) => {
                let output = run_test(context)?;
                let literal = required(value, self.kind())?;
                let expected: i64 = literal
                    .trim()
                    .parse()
                    .map_err(|_| CheckError::harness(format!("assert-count expects an integer, got {literal:?}")))?;
                let actual = if output.is_text() { 1 } else { output.len() as i64 };
                Ok((expected == actual).into())
            }
            Assertion::AssertEmpty => Ok(run_test(context)?.is_empty().into()),
            Assertion::AssertPermutation(_) => Ok(Outcome::Indeterminate),
            Assertion::AssertXml { value, file } => {
                let output = run_test(context)?;
                if matches!(output, Value::Absent) {
                    return Ok(Outcome::NotSatisfied);
                }
                let expected = expected_text(value, file)?;
                let actual = serialize_output(&output);
                trace!("Final XML string to compare: '{}'", actual);
                Ok((actual == expected).into())
            }
            Assertion::AssertSerializationError { .. } | Assertion::Error { .. } => match run_test(context) {
                Ok(_) => Ok(Outcome::NotSatisfied),
                Err(CheckError::Config(e)) => Err(e.into()),
                Err(e) => {
                    debug!(error = %e, "expected error raised");
                    Ok(Outcome::Satisfied)
                }
            },
            Assertion::SerializationMatches { value, file, flags } => {
                let output = run_test(context)?;
                let pattern = expected_text(value, file)?;
                let regex = build_regex(&pattern, flags.as_deref())?;
                Ok(regex.is_match(&output.string_value()).into())
            }
            Assertion::Unsupported(kind) => Err(CheckError::harness(format!("Not Implemented: Result for {kind}"))),
        }
    }
}

fn all_of<E: XPathEngine>(children: &[Assertion], context: &TestContext<'_, E>) -> CheckResult<Outcome> {
    if children.is_empty() {
        return Err(ConfigError::EmptyCombinator { kind: "all-of" }.into());
    }
    let mut indeterminate = false;
    for child in children {
        match child.validate(context)? {
            Outcome::NotSatisfied => return Ok(Outcome::NotSatisfied),
            Outcome::Indeterminate => indeterminate = true,
            Outcome::Satisfied => {}
        }
    }
    Ok(if indeterminate {
        Outcome::Indeterminate
    } else {
        Outcome::Satisfied
    })
}

/// Errors raised by a branch count as "not satisfied", except
/// configuration errors which still abort the run
fn any_of<E: XPathEngine>(children: &[Assertion], context: &TestContext<'_, E>) -> CheckResult<Outcome> {
    if children.is_empty() {
        return Err(ConfigError::EmptyCombinator { kind: "any-of" }.into());
    }
    let mut indeterminate = false;
    for child in children {
        match child.validate(context) {
            Ok(Outcome::Satisfied) => return Ok(Outcome::Satisfied),
            Ok(Outcome::Indeterminate) => indeterminate = true,
            Ok(Outcome::NotSatisfied) => {}
            Err(CheckError::Config(e)) => return Err(e.into()),
            Err(e) => debug!(kind = child.kind(), error = %e, "ignoring error in any-of branch"),
        }
    }
    Ok(if indeterminate {
        Outcome::Indeterminate
    } else {
        Outcome::NotSatisfied
    })
}

fn required<'v>(value: &'v Option<String>, kind: &str) -> CheckResult<&'v str> {
    value
        .as_deref()
        .ok_or_else(|| CheckError::harness(format!("{kind} has no expected value")))
}

/// Inline text, or the trimmed contents of the referenced file
fn expected_text(value: &Option<String>, file: &Option<PathBuf>) -> CheckResult<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map(|text| text.trim().to_string())
            .map_err(|e| CheckError::harness(format!("cannot read {}: {}", path.display(), e))),
        None => Ok(value.clone().unwrap_or_default()),
    }
}

fn build_regex(pattern: &str, flags: Option<&str>) -> CheckResult<regex::Regex> {
    let mut builder = RegexBuilder::new(&format!("^(?:{pattern})"));
    for flag in flags.unwrap_or_default().chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(CheckError::harness(format!("unsupported regex flag {other:?}"))),
        };
    }
    builder
        .build()
        .map_err(|e| CheckError::harness(format!("invalid pattern {pattern:?}: {e}")))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Serialization compared by assert-xml: text nodes contribute their
/// text, other items their trimmed markup
fn serialize_output(output: &Value) -> String {
    match output {
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Item::Node(node) if node.node_type == NodeType::Text => node.string_value.clone(),
                other => other.serialize().trim().to_string(),
            })
            .collect(),
        other => other
            .as_item()
            .map(|item| item.serialize().trim().to_string())
            .unwrap_or_default(),
    }
}

/// Equality of an expected value and a test output. Numbers compare by
/// value across numeric types; everything else structurally.
fn values_equal(expected: &Value, output: &Value) -> bool {
    match (expected.as_item(), output.as_item()) {
        (Some(Item::Atomic(a)), Some(Item::Atomic(b))) => atomics_equal(a, b),
        _ => expected == output,
    }
}

/// Integers and decimals compare exactly; a float or double on either
/// side promotes both to `f64`
fn atomics_equal(a: &Atomic, b: &Atomic) -> bool {
    match (a, b) {
        (Atomic::Integer(x), Atomic::Integer(y)) => x == y,
        (Atomic::Decimal(x), Atomic::Decimal(y)) => x == y,
        (Atomic::Integer(i), Atomic::Decimal(d)) | (Atomic::Decimal(d), Atomic::Integer(i)) => {
            Decimal::from(*i) == *d
        }
        _ => match (floating(a), floating(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

fn floating(atomic: &Atomic) -> Option<f64> {
    match atomic {
        Atomic::Integer(i) => Some(*i as f64),
        Atomic::Decimal(_) => atomic.string_value().parse().ok(),
        Atomic::Float(f) => Some(f64::from(*f)),
        Atomic::Double(d) => Some(*d),
        _ => None,
    }
}

/// Runtime category required by an `assert-type` token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRequirement {
    Textual,
    Boolean,
    Date,
    DateTime,
    Time,
    Duration,
    Decimal,
    Floating,
    Integer,
    NodeSequence,
}

impl TypeRequirement {
    /// `None` for tokens the harness does not know
    pub fn from_token(token: &str) -> Option<Self> {
        let requirement = match token.trim() {
            "xs:anyURI" | "xs:NCName" | "xs:string" | "xs:token" => TypeRequirement::Textual,
            "xs:boolean" => TypeRequirement::Boolean,
            "xs:date" => TypeRequirement::Date,
            "xs:dateTime" => TypeRequirement::DateTime,
            "xs:time" => TypeRequirement::Time,
            "xs:dayTimeDuration" => TypeRequirement::Duration,
            "xs:decimal" => TypeRequirement::Decimal,
            "xs:double" | "xs:float" => TypeRequirement::Floating,
            "xs:integer" | "xs:nonNegativeInteger" | "xs:positiveInteger" | "xs:unsignedShort" => {
                TypeRequirement::Integer
            }
            t if t.starts_with("document-node") || t.starts_with("element") => TypeRequirement::NodeSequence,
            _ => return None,
        };
        Some(requirement)
    }

    pub fn accepts(self, output: &Value) -> bool {
        if self == TypeRequirement::NodeSequence {
            return matches!(output, Value::Sequence(_));
        }
        let Value::Item(Item::Atomic(atomic)) = output else {
            return false;
        };
        matches!(
            (self, atomic),
            (TypeRequirement::Textual, Atomic::String(_) | Atomic::AnyUri(_))
                | (TypeRequirement::Boolean, Atomic::Boolean(_))
                | (TypeRequirement::Date, Atomic::Date(_))
                | (TypeRequirement::DateTime, Atomic::DateTime(_))
                | (TypeRequirement::Time, Atomic::Time(_))
                | (TypeRequirement::Duration, Atomic::Duration(_))
                | (TypeRequirement::Decimal, Atomic::Decimal(_))
                | (TypeRequirement::Floating, Atomic::Float(_) | Atomic::Double(_))
                | (TypeRequirement::Integer, Atomic::Integer(_))
        )
    }
}
