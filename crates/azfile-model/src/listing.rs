//! Records produced by enumeration responses.

use bytes::Bytes;
use serde::Serialize;

use crate::properties::{FileProperties, Metadata, ShareProperties};

/// A file share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Share {
    /// Share name.
    pub name: String,
    /// Present only when the listing was requested with metadata.
    pub metadata: Option<Metadata>,
    /// System properties reported in the listing.
    pub properties: ShareProperties,
}

/// One page of a share enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareList {
    /// Shares in document order.
    pub shares: Vec<Share>,
    /// Continuation token; `None` once the enumeration is exhausted.
    pub next_marker: Option<String>,
}

/// A directory inside a share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Directory {
    /// Directory name, relative to the listed directory.
    pub name: String,
}

/// A file inside a share.
///
/// Files from a listing only carry a name and content length. Files fetched
/// individually also carry their content, full properties, and metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct File {
    /// File name, relative to the listed directory.
    pub name: String,
    /// Downloaded bytes; `None` for listed files.
    #[serde(skip)]
    pub content: Option<Bytes>,
    /// System properties.
    pub properties: FileProperties,
    /// User metadata, keyed without the `x-ms-meta-` prefix.
    pub metadata: Metadata,
}

/// One page of a directory enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileAndDirectoryResults {
    /// Files in document order.
    pub files: Vec<File>,
    /// Directories in document order.
    pub directories: Vec<Directory>,
    /// Continuation token; `None` once the enumeration is exhausted.
    pub next_marker: Option<String>,
}

/// A valid byte range of a file, inclusive on both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset.
    pub end: u64,
}

/// Usage statistics of a share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShareStats {
    /// Approximate size of the data stored in the share, in GiB.
    pub share_usage: i64,
}
