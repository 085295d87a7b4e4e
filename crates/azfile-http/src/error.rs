//! Error types for response parsing and request preparation.

use azfile_xml::XmlError;

/// Failure reported by a [`crate::RequestSigner`].
#[derive(Debug, thiserror::Error)]
#[error("request signing failed: {0}")]
pub struct SignError(pub String);

/// Errors that can occur while parsing a storage response or preparing a
/// storage request.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The response body is not a valid document of the expected shape.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// A header value could not be read or written.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Lower-cased header name.
        name: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// The signer rejected the request.
    #[error(transparent)]
    Signing(#[from] SignError),
}

impl FileError {
    /// Build an [`FileError::InvalidHeader`].
    pub fn invalid_header(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
