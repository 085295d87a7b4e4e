//! Storage response parsing.
//!
//! Listing calls return an XML body; single-resource calls return their
//! properties in headers. The listing entry points hand the response back
//! untouched as [`ParseOutcome::NotParsed`] when there is no body to read.

use azfile_model::{File, FileAndDirectoryResults, FileProperties, FileRange, ShareList, ShareStats};
use azfile_xml::{XmlDeserialize, from_xml};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tracing::debug;

use crate::error::FileError;
use crate::properties::extract_properties;

/// A response received from the file service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body; `None` when the service sent none.
    pub body: Option<Bytes>,
}

impl StorageResponse {
    /// Create a response with the given status, no headers, and no body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Result of a listing parse: either the parsed record or, when the
/// response had no body, the response itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The response had no body and is returned as received.
    NotParsed(StorageResponse),
    /// The body was parsed.
    Parsed(T),
}

impl<T> ParseOutcome<T> {
    /// The parsed record, if any.
    #[must_use]
    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::NotParsed(_) => None,
        }
    }

    /// Whether the body was parsed.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

fn parse_body<T: XmlDeserialize>(
    response: StorageResponse,
    kind: &str,
) -> Result<ParseOutcome<T>, FileError> {
    match response.body {
        Some(body) => {
            let value = from_xml(&body)?;
            debug!(kind, bytes = body.len(), "parsed response body");
            Ok(ParseOutcome::Parsed(value))
        }
        None => {
            debug!(kind, status = %response.status, "response has no body, returning it as is");
            Ok(ParseOutcome::NotParsed(response))
        }
    }
}

/// Parse a share enumeration page.
///
/// # Errors
///
/// Returns [`FileError::Xml`] if the body is malformed or a required element
/// is missing.
pub fn parse_shares(response: StorageResponse) -> Result<ParseOutcome<ShareList>, FileError> {
    parse_body(response, "shares")
}

/// Parse a directory enumeration page.
///
/// # Errors
///
/// Returns [`FileError::Xml`] if the body is malformed or a required element
/// is missing.
pub fn parse_directories_and_files(
    response: StorageResponse,
) -> Result<ParseOutcome<FileAndDirectoryResults>, FileError> {
    parse_body(response, "directories and files")
}

/// Parse the valid ranges of a file.
///
/// # Errors
///
/// Returns [`FileError::Xml`] if the body is malformed or a range lacks a
/// bound.
pub fn parse_ranges(response: StorageResponse) -> Result<ParseOutcome<Vec<FileRange>>, FileError> {
    parse_body(response, "ranges")
}

/// Parse share usage statistics.
///
/// # Errors
///
/// Returns [`FileError::Xml`] if the body is malformed or `ShareUsage` is
/// missing.
pub fn parse_share_stats(response: StorageResponse) -> Result<ParseOutcome<ShareStats>, FileError> {
    parse_body(response, "share stats")
}

/// Build a [`File`] from a get-file response: the body is the content and the
/// headers carry properties and metadata.
///
/// # Errors
///
/// Returns [`FileError::InvalidHeader`] if a mapped header cannot be converted.
pub fn parse_file(response: StorageResponse, name: impl Into<String>) -> Result<File, FileError> {
    let (properties, metadata) = extract_properties::<FileProperties>(&response.headers)?;
    Ok(File {
        name: name.into(),
        content: response.body,
        properties,
        metadata,
    })
}
