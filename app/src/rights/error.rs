use thiserror::Error;

/// Failure of a single role file; never escapes that file's task.
#[derive(Error, Debug)]
pub enum RightsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Document has more than one root element")]
    MultipleRoots,

    #[error("Element <{0}> is not closed")]
    UnclosedElement(String),

    #[error("Text outside the root element: {0}")]
    TextOutsideRoot(String),

    #[error("Closing tag </{0}> has no matching start tag")]
    UnmatchedEnd(String),
}

pub type Result<T> = std::result::Result<T, RightsError>;
