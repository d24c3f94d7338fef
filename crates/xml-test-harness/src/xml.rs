//! Helpers for walking catalog and test-set documents

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ConfigError;

/// Namespace of the QT3 catalog vocabulary
pub const FOTS_NAMESPACE: &str = "http://www.w3.org/2010/09/qt-fots-catalog";

/// A catalog file read into memory, together with the directory its
/// relative references resolve against
pub(crate) struct SourceFile {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    text: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            text,
        })
    }

    pub fn parse(&self) -> Result<Document<'_>, ConfigError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        Document::parse_with_options(&self.text, options).map_err(|source| ConfigError::Xml {
            path: self.path.clone(),
            source,
        })
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }
}

/// True if `node` is a catalog element with the given local name
pub(crate) fn is_element(node: Node<'_, '_>, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && matches!(node.tag_name().namespace(), None | Some(FOTS_NAMESPACE))
}

/// Child elements named `local_name`, in document order
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    local_name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| is_element(*child, local_name))
}

pub(crate) fn child<'a, 'input: 'a>(node: Node<'a, 'input>, local_name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, local_name).next()
}

/// Text content directly inside an element, before its first child element
pub(crate) fn text(node: Node<'_, '_>) -> Option<String> {
    node.text().map(str::to_string)
}

pub(crate) fn required_attribute<'a>(
    node: Node<'a, '_>,
    name: &str,
    file: &SourceFile,
) -> Result<&'a str, ConfigError> {
    node.attribute(name).ok_or_else(|| {
        ConfigError::catalog(
            &file.path,
            format!("<{}> is missing attribute {}", node.tag_name().name(), name),
        )
    })
}

pub(crate) fn required_child<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    local_name: &'a str,
    file: &SourceFile,
) -> Result<Node<'a, 'input>, ConfigError> {
    child(node, local_name).ok_or_else(|| {
        ConfigError::catalog(
            &file.path,
            format!("<{}> has no <{}> element", node.tag_name().name(), local_name),
        )
    })
}
