//! Evaluation adapter: environment resolution and expression execution

use std::collections::HashMap;

use tracing::{debug, trace, warn};
use xml_engine_traits::{EvalContext, Item, Value, XPathEngine, XmlDocument};

use crate::catalog::{EnvironmentRef, TestCase, TestSet};
use crate::context::TestContext;
use crate::environment::Environment;
use crate::error::{CheckResult, ConfigError, ExecutionError};

/// Name of the variable holding the test output in comparison expressions
pub const RESULT_VARIABLE: &str = "result";

/// Find the environment a test case runs in.
///
/// A reference is looked up in the test set first, then in the catalog;
/// an inline environment is used as is. A reference that resolves nowhere
/// is a configuration error.
pub fn resolve_environment<'a, E: XPathEngine>(
    context: &TestContext<'a, E>,
) -> Result<Option<&'a Environment>, ConfigError> {
    let test_case: &'a TestCase = context.test_case;
    let test_set: &'a TestSet = context.test_set;
    let catalog_environments: &'a HashMap<String, Environment> = context.environments;
    match &test_case.environment {
        Some(EnvironmentRef::Named(reference)) => test_set
            .environments
            .get(reference)
            .or_else(|| catalog_environments.get(reference))
            .map(Some)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                reference: reference.clone(),
                test_case: test_case.name.clone(),
            }),
        Some(EnvironmentRef::Inline(environment)) => Ok(Some(environment)),
        None => Ok(None),
    }
}

/// The document a test is evaluated against: the environment's context
/// source, or `<empty/>` when there is none
pub fn context_document(environment: Option<&Environment>) -> Result<XmlDocument, ExecutionError> {
    let Some(source) = environment.and_then(|env| env.context_source.as_ref()) else {
        return Ok(XmlDocument::empty());
    };
    source
        .document
        .clone()
        .ok_or_else(|| ExecutionError::MissingContextDocument {
            path: source.file.clone(),
        })
}

fn build_eval_context(environment: Option<&Environment>) -> Result<EvalContext, ExecutionError> {
    let mut eval_context = EvalContext::new(context_document(environment)?);
    let Some(environment) = environment else {
        return Ok(eval_context);
    };

    eval_context = eval_context.with_namespaces(environment.namespaces.clone());
    for (role, source) in &environment.variable_sources {
        let Some(document) = &source.document else {
            debug!(role = %role, file = %source.file.display(), "variable source not available");
            continue;
        };
        match document.document_node() {
            Ok(node) => {
                eval_context =
                    eval_context.with_variable(role.trim_start_matches('$'), Value::Item(Item::Node(node)));
            }
            Err(e) => debug!(role = %role, error = %e, "cannot bind variable source"),
        }
    }
    Ok(eval_context)
}

/// Parse and evaluate the test expression of the current test case.
///
/// Compilation failures become [`ExecutionError::Parse`], evaluation
/// failures [`ExecutionError::Evaluate`].
pub fn run_test<E: XPathEngine>(context: &TestContext<'_, E>) -> CheckResult<Value> {
    let environment = resolve_environment(context)?;
    let eval_context = build_eval_context(environment)?;
    let test = &context.test_case.test;

    let query = context.engine.compile_xpath(test).map_err(|e| {
        warn!(test_case = %context.test_case.name, "Error parsing {}: {}", test, e);
        ExecutionError::Parse(e)
    })?;

    let value = context.engine.evaluate(&query, &eval_context).map_err(|e| {
        warn!(test_case = %context.test_case.name, "Error evaluating {}: {}", test, e);
        ExecutionError::Evaluate(e)
    })?;

    trace!("Result of evaluation: {:?}", value);
    Ok(value)
}

/// Evaluate an assertion's own expression against `<empty/>`, with
/// `$result` bound to `result` when given
pub fn evaluate_comparison<E: XPathEngine>(
    engine: &E,
    expression: &str,
    result: Option<&Value>,
) -> Result<Value, ExecutionError> {
    let mut eval_context = EvalContext::new(XmlDocument::empty());
    if let Some(result) = result {
        eval_context = eval_context.with_variable(RESULT_VARIABLE, result.clone());
    }

    let query = engine
        .compile_xpath(expression)
        .map_err(ExecutionError::Comparison)?;
    engine
        .evaluate(&query, &eval_context)
        .map_err(ExecutionError::Comparison)
}
