//! Failures reported by evaluator backends

/// Result type for evaluator operations
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong inside an evaluator.
///
/// The harness only distinguishes where a failure happened (parsing the
/// expression or evaluating it); the message is carried for logging.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document handed to the engine is not well-formed
    #[error("malformed document: {0}")]
    XmlParse(String),

    #[error("cannot compile expression: {0}")]
    XPathCompile(String),

    #[error("evaluation failed: {0}")]
    XPathEval(String),

    /// A value could not cross between the harness and the engine
    #[error("cannot convert value: {0}")]
    TypeConversion(String),

    #[error("cannot read document: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn xml_parse(msg: impl Into<String>) -> Self {
        Error::XmlParse(msg.into())
    }

    pub fn xpath_compile(msg: impl Into<String>) -> Self {
        Error::XPathCompile(msg.into())
    }

    pub fn xpath_eval(msg: impl Into<String>) -> Self {
        Error::XPathEval(msg.into())
    }

    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Error::TypeConversion(msg.into())
    }
}
