//! Error type for XML parsing and writing.

use std::io;

/// Errors that can occur while reading or writing storage XML documents.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document is not well-formed.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing. Holds the element path, e.g.
    /// `Logging/RetentionPolicy`.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document ended or nested in a way the parser cannot follow.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Element text could not be converted to the expected type.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}
