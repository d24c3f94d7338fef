//! Shared fixtures for harness tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use xml_engine_traits::{
    error::{Error, Result},
    EvalContext, Value, XPathEngine, XPathVersion,
};
use xml_test_harness::{
    Assertion, CheckResult, Dependencies, Environment, EnvironmentRef, Outcome, TestCase, TestContext, TestSet,
    Verbosity,
};

type Script = Box<dyn Fn(&EvalContext) -> Result<Value>>;

/// An engine that answers from a table keyed by expression text.
///
/// Unknown expressions compile but fail at evaluation.
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: HashMap<String, Script>,
    unparseable: Vec<String>,
    evaluated: RefCell<Vec<String>>,
    contexts: RefCell<Vec<EvalContext>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returns(self, expression: &str, value: Value) -> Self {
        self.responds(expression, move |_| Ok(value.clone()))
    }

    pub fn fails(self, expression: &str) -> Self {
        let message = format!("cannot evaluate {expression}");
        self.responds(expression, move |_| Err(Error::xpath_eval(message.clone())))
    }

    pub fn unparseable(mut self, expression: &str) -> Self {
        self.unparseable.push(expression.to_string());
        self
    }

    pub fn responds(mut self, expression: &str, script: impl Fn(&EvalContext) -> Result<Value> + 'static) -> Self {
        self.scripts.insert(expression.to_string(), Box::new(script));
        self
    }

    /// Expressions evaluated so far, in order
    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.borrow().clone()
    }

    pub fn contexts(&self) -> Vec<EvalContext> {
        self.contexts.borrow().clone()
    }
}

impl XPathEngine for ScriptedEngine {
    type Query = String;

    fn engine_name(&self) -> &'static str {
        "scripted"
    }

    fn xpath_version(&self) -> XPathVersion {
        XPathVersion::V3_1
    }

    fn compile_xpath(&self, xpath: &str) -> Result<Self::Query> {
        if self.unparseable.iter().any(|e| e == xpath) {
            return Err(Error::xpath_compile(format!("syntax error in {xpath}")));
        }
        Ok(xpath.to_string())
    }

    fn evaluate(&self, query: &Self::Query, context: &EvalContext) -> Result<Value> {
        self.evaluated.borrow_mut().push(query.clone());
        self.contexts.borrow_mut().push(context.clone());
        match self.scripts.get(query) {
            Some(script) => script(context),
            None => Err(Error::xpath_eval(format!("no script for {query}"))),
        }
    }
}

pub fn test_case(name: &str, test: &str, result: Assertion) -> TestCase {
    TestCase {
        name: format!("set.{name}"),
        description: String::new(),
        test: test.to_string(),
        result,
        environment: None,
        dependencies: Dependencies::default(),
        test_set_file: "set.xml".to_string(),
    }
}

pub fn test_set(test_cases: Vec<TestCase>) -> TestSet {
    TestSet {
        name: "set".to_string(),
        file: "set.xml".to_string(),
        path: "set.xml".into(),
        description: String::new(),
        dependencies: Dependencies::default(),
        environments: HashMap::new(),
        test_cases,
    }
}

/// Validate the expectation of a lone test case that uses no environment
pub fn check(engine: &ScriptedEngine, test: &str, result: Assertion) -> CheckResult<Outcome> {
    let set = test_set(vec![test_case("case", test, result)]);
    let environments = HashMap::new();
    let context = TestContext::new(engine, &environments, &set, &set.test_cases[0], Verbosity::SILENT);
    set.test_cases[0].result.validate(&context)
}

/// Validate with an environment reference resolved against the given scopes
pub fn check_in(
    engine: &ScriptedEngine,
    set: &TestSet,
    catalog_environments: &HashMap<String, Environment>,
) -> CheckResult<Outcome> {
    let test_case = &set.test_cases[0];
    let context = TestContext::new(engine, catalog_environments, set, test_case, Verbosity::SILENT);
    test_case.result.validate(&context)
}

pub fn named_environment(reference: &str) -> Option<EnvironmentRef> {
    Some(EnvironmentRef::Named(reference.to_string()))
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

pub fn literal(text: &str) -> Option<String> {
    Some(text.to_string())
}
