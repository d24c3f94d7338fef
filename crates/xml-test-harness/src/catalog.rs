//! QT3 catalog model
//!
//! A catalog file lists shared environments and test sets; each test set
//! lives in its own file with local environments and test cases. Relative
//! paths resolve against the directory of the file that declares them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use roxmltree::Node;
use tracing::{debug, trace};

use crate::assertion::Assertion;
use crate::environment::Environment;
use crate::error::ConfigError;
use crate::xml::{self, SourceFile};

/// Dependency declarations of a test set or test case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Spec tags such as `XP20+`, split on whitespace
    pub specs: Vec<String>,
    pub features: Vec<String>,
    pub xml_version: Option<String>,
    pub xsd_version: Option<String>,
}

impl Dependencies {
    fn from_parent(parent: Node<'_, '_>, file: &SourceFile) -> Result<Self, ConfigError> {
        let mut dependencies = Dependencies::default();
        for dependency in xml::children(parent, "dependency") {
            let kind = xml::required_attribute(dependency, "type", file)?;
            let value = xml::required_attribute(dependency, "value", file)?;
            match kind {
                "spec" => dependencies
                    .specs
                    .extend(value.split_whitespace().map(str::to_string)),
                "feature" => dependencies.features.push(value.to_string()),
                "xml-version" => dependencies.xml_version = Some(value.to_string()),
                "xsd-version" => dependencies.xsd_version = Some(value.to_string()),
                // default-language, language, limits, calendar and anything
                // newer are accepted and ignored
                other => trace!(kind = other, value, "ignoring dependency"),
            }
        }
        Ok(dependencies)
    }
}

/// How a test case selects its environment
#[derive(Debug, Clone)]
pub enum EnvironmentRef {
    /// `<environment ref="..."/>`
    Named(String),
    /// An environment declared inside the test case
    Inline(Environment),
}

/// A single test case
#[derive(Debug, Clone)]
pub struct TestCase {
    /// `<test-set name>.<test-case name>`
    pub name: String,
    pub description: String,
    /// The expression under test
    pub test: String,
    /// The expected result
    pub result: Assertion,
    pub environment: Option<EnvironmentRef>,
    pub dependencies: Dependencies,
    /// Test-set file as declared in the catalog
    pub test_set_file: String,
}

impl TestCase {
    fn from_element(element: Node<'_, '_>, test_set: &TestSetHeader<'_>, file: &SourceFile) -> Result<Self, ConfigError> {
        let local_name = xml::required_attribute(element, "name", file)?;
        let name = format!("{}.{}", test_set.name, local_name);

        let test = xml::text(xml::required_child(element, "test", file)?).unwrap_or_default();

        let result_element = xml::required_child(element, "result", file)?;
        let expectation = result_element
            .children()
            .find(|child| child.is_element())
            .ok_or_else(|| ConfigError::catalog(&file.path, format!("test case {name} has an empty <result>")))?;
        let result = Assertion::from_element(expectation, file)?;

        let environment = match xml::child(element, "environment") {
            Some(env) => match env.attribute("ref") {
                Some(reference) => Some(EnvironmentRef::Named(reference.to_string())),
                None => Some(EnvironmentRef::Inline(Environment::from_element(env, file)?)),
            },
            None => None,
        };

        Ok(TestCase {
            name,
            description: description(element),
            test,
            result,
            environment,
            dependencies: Dependencies::from_parent(element, file)?,
            test_set_file: test_set.file.to_string(),
        })
    }

    /// Multi-line description for trace output
    pub fn dump(&self) -> String {
        let environment = match &self.environment {
            Some(EnvironmentRef::Named(reference)) => format!("Environment ref: {reference}"),
            Some(EnvironmentRef::Inline(environment)) => format!("Environment: {environment}"),
            None => "Environment: none".to_string(),
        };
        format!(
            "Test: {}\nDescription: {}\nTestset file: {}\nXpath test: {}\n{}",
            self.name, self.description, self.test_set_file, self.test, environment
        )
    }
}

/// A test set and its test cases
#[derive(Debug, Clone)]
pub struct TestSet {
    pub name: String,
    /// File as declared in the catalog
    pub file: String,
    /// Resolved location of the test-set file
    pub path: PathBuf,
    pub description: String,
    pub dependencies: Dependencies,
    /// Environments declared in this test set
    pub environments: HashMap<String, Environment>,
    pub test_cases: Vec<TestCase>,
}

struct TestSetHeader<'a> {
    name: &'a str,
    file: &'a str,
}

impl TestSet {
    /// Load the test-set file `file`, resolved against `base_dir`
    pub fn load(name: &str, file: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let source = SourceFile::read(&base_dir.join(file))?;
        let document = source.parse()?;
        let root = document.root_element();
        let header = TestSetHeader { name, file };

        let mut environments = HashMap::new();
        for element in xml::children(root, "environment") {
            let environment = Environment::from_element(element, &source)?;
            environments.insert(environment.name.clone(), environment);
        }

        let test_cases = xml::children(root, "test-case")
            .map(|element| TestCase::from_element(element, &header, &source))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(test_set = name, cases = test_cases.len(), "loaded test set");

        Ok(TestSet {
            name: name.to_string(),
            file: file.to_string(),
            path: source.path.clone(),
            description: description(root),
            dependencies: Dependencies::from_parent(root, &source)?,
            environments,
            test_cases,
        })
    }
}

/// A loaded catalog: shared environments and test sets in catalog order
#[derive(Debug, Clone)]
pub struct Catalog {
    pub path: PathBuf,
    pub environments: HashMap<String, Environment>,
    pub test_sets: Vec<TestSet>,
}

impl Catalog {
    /// Load a catalog file and every test set it references
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = SourceFile::read(path)?;
        let document = source.parse()?;
        let root = document.root_element();

        let mut environments = HashMap::new();
        for element in xml::children(root, "environment") {
            let environment = Environment::from_element(element, &source)?;
            environments.insert(environment.name.clone(), environment);
        }

        let mut seen = HashSet::new();
        let mut test_sets = Vec::new();
        for element in xml::children(root, "test-set") {
            let name = xml::required_attribute(element, "name", &source)?;
            let file = xml::required_attribute(element, "file", &source)?;
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateTestSet { name: name.to_string() });
            }
            test_sets.push(TestSet::load(name, file, &source.base_dir)?);
        }

        debug!(catalog = %path.display(), test_sets = test_sets.len(), "loaded catalog");

        Ok(Catalog {
            path: path.to_path_buf(),
            environments,
            test_sets,
        })
    }

    /// Number of test cases across all test sets
    pub fn test_case_count(&self) -> usize {
        self.test_sets.iter().map(|set| set.test_cases.len()).sum()
    }
}

fn description(element: Node<'_, '_>) -> String {
    xml::child(element, "description")
        .and_then(xml::text)
        .unwrap_or_default()
}
