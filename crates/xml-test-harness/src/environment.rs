//! Test environments: namespaces, schemas and source documents

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use roxmltree::Node;
use tracing::debug;
use xml_engine_traits::XmlDocument;

use crate::error::ConfigError;
use crate::xml::{self, SourceFile};

/// Name given to environments declared without one
pub const ANONYMOUS: &str = "anonymous";

/// Role of the source that supplies the context document
pub const CONTEXT_ROLE: &str = ".";

/// A schema reference. Recorded but never used for validation.
#[derive(Debug, Clone)]
pub struct Schema {
    pub uri: Option<String>,
    pub file: Option<PathBuf>,
    pub description: String,
}

/// A source document declared by an environment
#[derive(Debug, Clone)]
pub struct Source {
    pub role: Option<String>,
    pub uri: Option<String>,
    pub file: PathBuf,
    pub description: String,
    /// The parsed document, or `None` if it could not be read or parsed
    pub document: Option<XmlDocument>,
}

/// A named bundle of namespace bindings, a context document and variable
/// sources shared by test cases
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    /// Prefix to namespace URI
    pub namespaces: BTreeMap<String, String>,
    pub schema: Option<Schema>,
    /// Source with role `.`
    pub context_source: Option<Source>,
    /// Variable role (such as `$input`) to source
    pub variable_sources: BTreeMap<String, Source>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            name: ANONYMOUS.to_string(),
            namespaces: BTreeMap::new(),
            schema: None,
            context_source: None,
            variable_sources: BTreeMap::new(),
        }
    }
}

impl Environment {
    pub(crate) fn from_element(element: Node<'_, '_>, file: &SourceFile) -> Result<Self, ConfigError> {
        let mut environment = Environment {
            name: element.attribute("name").unwrap_or(ANONYMOUS).to_string(),
            ..Environment::default()
        };

        for namespace in xml::children(element, "namespace") {
            let prefix = xml::required_attribute(namespace, "prefix", file)?;
            let uri = xml::required_attribute(namespace, "uri", file)?;
            environment.namespaces.insert(prefix.to_string(), uri.to_string());
        }

        for schema in xml::children(element, "schema") {
            if environment.schema.is_some() {
                return Err(ConfigError::MultipleSchemas {
                    environment: environment.name,
                });
            }
            environment.schema = Some(Schema::from_element(schema, file));
        }

        for source in xml::children(element, "source") {
            let source = Source::from_element(source, file)?;
            match source.role.as_deref() {
                Some(CONTEXT_ROLE) => environment.context_source = Some(source),
                Some(role) => {
                    environment.variable_sources.insert(role.to_string(), source);
                }
                None => debug!(file = %source.file.display(), "ignoring source without a role"),
            }
        }

        Ok(environment)
    }

    /// The context document, if the environment declares one that loaded
    pub fn context_document(&self) -> Option<&XmlDocument> {
        self.context_source.as_ref().and_then(|source| source.document.as_ref())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "environment {}", self.name)?;
        if let Some(source) = &self.context_source {
            write!(f, " (context {})", source.file.display())?;
        }
        for (role, source) in &self.variable_sources {
            write!(f, " ({} = {})", role, source.file.display())?;
        }
        Ok(())
    }
}

impl Schema {
    fn from_element(element: Node<'_, '_>, file: &SourceFile) -> Self {
        Schema {
            uri: element.attribute("uri").map(str::to_string),
            file: element.attribute("file").map(|f| file.resolve(f)),
            description: description(element),
        }
    }
}

impl Source {
    fn from_element(element: Node<'_, '_>, file: &SourceFile) -> Result<Self, ConfigError> {
        let path = file.resolve(xml::required_attribute(element, "file", file)?);
        let document = match XmlDocument::parse_file(&path) {
            Ok(document) => Some(document),
            Err(e) => {
                debug!(file = %path.display(), error = %e, "source document not available");
                None
            }
        };

        Ok(Source {
            role: element.attribute("role").map(str::to_string),
            uri: element.attribute("uri").map(str::to_string),
            file: path,
            description: description(element),
            document,
        })
    }
}

fn description(element: Node<'_, '_>) -> String {
    xml::child(element, "description")
        .and_then(xml::text)
        .unwrap_or_default()
}
