//! Resource property records populated from HTTP response headers.
//!
//! Every record kind (blob, file, share, directory) carries its own subset of
//! the fields a storage response can describe. The nested sub-records
//! ([`ContentSettings`], [`LeaseProperties`], [`CopyProperties`]) are always
//! allocated; "not reported" lives at the field level as `None`.
//!
//! Header names are mapped to fields through [`PropertyField`], a closed table
//! that records for each header which sub-record it lands in and how its value
//! is converted. Records accept converted values through
//! [`ResourceProperties::assign`] and silently drop fields they have no slot for.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User-defined key/value pairs attached to a storage resource.
pub type Metadata = HashMap<String, String>;

/// Which part of a property record a header lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyTarget {
    /// A scalar on the record itself.
    Root,
    /// The nested [`ContentSettings`].
    ContentSettings,
    /// The nested [`LeaseProperties`].
    Lease,
    /// The nested [`CopyProperties`].
    Copy,
}

/// How a header value is converted before assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Kept as a string.
    Text,
    /// Parsed as a signed 64-bit integer.
    Integer,
    /// Parsed as an HTTP date-time.
    Timestamp,
}

/// A header value after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A string value.
    Text(String),
    /// An integer value.
    Integer(i64),
    /// A UTC timestamp.
    Timestamp(DateTime<Utc>),
}

/// Every response header that maps onto a property field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    /// `Last-Modified`.
    LastModified,
    /// `ETag`.
    Etag,
    /// `x-ms-blob-type`.
    BlobType,
    /// `Content-Length`.
    ContentLength,
    /// `x-ms-blob-sequence-number`.
    PageBlobSequenceNumber,
    /// `x-ms-blob-committed-block-count`.
    AppendBlobCommittedBlockCount,
    /// `Content-Type`.
    ContentType,
    /// `Cache-Control`.
    CacheControl,
    /// `Content-Encoding`.
    ContentEncoding,
    /// `Content-Disposition`.
    ContentDisposition,
    /// `Content-Language`.
    ContentLanguage,
    /// `Content-MD5`.
    ContentMd5,
    /// `x-ms-lease-status`.
    LeaseStatus,
    /// `x-ms-lease-state`.
    LeaseState,
    /// `x-ms-lease-duration`.
    LeaseDuration,
    /// `x-ms-copy-id`.
    CopyId,
    /// `x-ms-copy-source`.
    CopySource,
    /// `x-ms-copy-status`.
    CopyStatus,
    /// `x-ms-copy-progress`.
    CopyProgress,
    /// `x-ms-copy-completion-time`.
    CopyCompletionTime,
    /// `x-ms-copy-status-description`.
    CopyStatusDescription,
}

impl PropertyField {
    /// All mapped fields, in table order.
    pub const ALL: [Self; 21] = [
        Self::LastModified,
        Self::Etag,
        Self::BlobType,
        Self::ContentLength,
        Self::PageBlobSequenceNumber,
        Self::AppendBlobCommittedBlockCount,
        Self::ContentType,
        Self::CacheControl,
        Self::ContentEncoding,
        Self::ContentDisposition,
        Self::ContentLanguage,
        Self::ContentMd5,
        Self::LeaseStatus,
        Self::LeaseState,
        Self::LeaseDuration,
        Self::CopyId,
        Self::CopySource,
        Self::CopyStatus,
        Self::CopyProgress,
        Self::CopyCompletionTime,
        Self::CopyStatusDescription,
    ];

    /// Look up the field for a lower-cased header name.
    #[must_use]
    pub fn from_header_name(name: &str) -> Option<Self> {
        let field = match name {
            "last-modified" => Self::LastModified,
            "etag" => Self::Etag,
            "x-ms-blob-type" => Self::BlobType,
            "content-length" => Self::ContentLength,
            "x-ms-blob-sequence-number" => Self::PageBlobSequenceNumber,
            "x-ms-blob-committed-block-count" => Self::AppendBlobCommittedBlockCount,
            "content-type" => Self::ContentType,
            "cache-control" => Self::CacheControl,
            "content-encoding" => Self::ContentEncoding,
            "content-disposition" => Self::ContentDisposition,
            "content-language" => Self::ContentLanguage,
            "content-md5" => Self::ContentMd5,
            "x-ms-lease-status" => Self::LeaseStatus,
            "x-ms-lease-state" => Self::LeaseState,
            "x-ms-lease-duration" => Self::LeaseDuration,
            "x-ms-copy-id" => Self::CopyId,
            "x-ms-copy-source" => Self::CopySource,
            "x-ms-copy-status" => Self::CopyStatus,
            "x-ms-copy-progress" => Self::CopyProgress,
            "x-ms-copy-completion-time" => Self::CopyCompletionTime,
            "x-ms-copy-status-description" => Self::CopyStatusDescription,
            _ => return None,
        };
        Some(field)
    }

    /// The lower-cased header name this field is read from.
    #[must_use]
    pub fn header_name(self) -> &'static str {
        match self {
            Self::LastModified => "last-modified",
            Self::Etag => "etag",
            Self::BlobType => "x-ms-blob-type",
            Self::ContentLength => "content-length",
            Self::PageBlobSequenceNumber => "x-ms-blob-sequence-number",
            Self::AppendBlobCommittedBlockCount => "x-ms-blob-committed-block-count",
            Self::ContentType => "content-type",
            Self::CacheControl => "cache-control",
            Self::ContentEncoding => "content-encoding",
            Self::ContentDisposition => "content-disposition",
            Self::ContentLanguage => "content-language",
            Self::ContentMd5 => "content-md5",
            Self::LeaseStatus => "x-ms-lease-status",
            Self::LeaseState => "x-ms-lease-state",
            Self::LeaseDuration => "x-ms-lease-duration",
            Self::CopyId => "x-ms-copy-id",
            Self::CopySource => "x-ms-copy-source",
            Self::CopyStatus => "x-ms-copy-status",
            Self::CopyProgress => "x-ms-copy-progress",
            Self::CopyCompletionTime => "x-ms-copy-completion-time",
            Self::CopyStatusDescription => "x-ms-copy-status-description",
        }
    }

    /// The sub-record this field belongs to.
    #[must_use]
    pub fn target(self) -> PropertyTarget {
        match self {
            Self::LastModified
            | Self::Etag
            | Self::BlobType
            | Self::ContentLength
            | Self::PageBlobSequenceNumber
            | Self::AppendBlobCommittedBlockCount => PropertyTarget::Root,
            Self::ContentType
            | Self::CacheControl
            | Self::ContentEncoding
            | Self::ContentDisposition
            | Self::ContentLanguage
            | Self::ContentMd5 => PropertyTarget::ContentSettings,
            Self::LeaseStatus | Self::LeaseState | Self::LeaseDuration => PropertyTarget::Lease,
            Self::CopyId
            | Self::CopySource
            | Self::CopyStatus
            | Self::CopyProgress
            | Self::CopyCompletionTime
            | Self::CopyStatusDescription => PropertyTarget::Copy,
        }
    }

    /// The conversion applied to the raw header value.
    #[must_use]
    pub fn conversion(self) -> Conversion {
        match self {
            Self::LastModified => Conversion::Timestamp,
            Self::ContentLength
            | Self::PageBlobSequenceNumber
            | Self::AppendBlobCommittedBlockCount => Conversion::Integer,
            _ => Conversion::Text,
        }
    }
}

/// A property record that header values can be assigned into.
pub trait ResourceProperties: Default {
    /// Assign a converted value to `field`.
    ///
    /// Fields the record kind has no slot for are ignored.
    fn assign(&mut self, field: PropertyField, value: PropertyValue);
}

fn set_text(slot: Option<&mut Option<String>>, value: PropertyValue) {
    if let (Some(slot), PropertyValue::Text(text)) = (slot, value) {
        *slot = Some(text);
    }
}

/// HTTP content headers stored with a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSettings {
    /// MIME type of the content.
    pub content_type: Option<String>,
    /// Encodings applied to the content.
    pub content_encoding: Option<String>,
    /// Natural languages of the content.
    pub content_language: Option<String>,
    /// How the content should be presented.
    pub content_disposition: Option<String>,
    /// Caching directives.
    pub cache_control: Option<String>,
    /// Base64 MD5 hash of the content.
    pub content_md5: Option<String>,
}

impl ContentSettings {
    fn slot(&mut self, field: PropertyField) -> Option<&mut Option<String>> {
        match field {
            PropertyField::ContentType => Some(&mut self.content_type),
            PropertyField::ContentEncoding => Some(&mut self.content_encoding),
            PropertyField::ContentLanguage => Some(&mut self.content_language),
            PropertyField::ContentDisposition => Some(&mut self.content_disposition),
            PropertyField::CacheControl => Some(&mut self.cache_control),
            PropertyField::ContentMd5 => Some(&mut self.content_md5),
            _ => None,
        }
    }
}

/// Lease state of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaseProperties {
    /// `locked` or `unlocked`.
    pub status: Option<String>,
    /// Lease lifecycle state, e.g. `available` or `leased`.
    pub state: Option<String>,
    /// `infinite` or `fixed`.
    pub duration: Option<String>,
}

impl LeaseProperties {
    fn slot(&mut self, field: PropertyField) -> Option<&mut Option<String>> {
        match field {
            PropertyField::LeaseStatus => Some(&mut self.status),
            PropertyField::LeaseState => Some(&mut self.state),
            PropertyField::LeaseDuration => Some(&mut self.duration),
            _ => None,
        }
    }
}

/// The most recent copy operation that targeted a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyProperties {
    /// Identifier of the copy operation.
    pub id: Option<String>,
    /// URL of the copy source.
    pub source: Option<String>,
    /// `pending`, `success`, `aborted` or `failed`.
    pub status: Option<String>,
    /// `bytes copied/total bytes`.
    pub progress: Option<String>,
    /// When the copy finished, as reported.
    pub completion_time: Option<String>,
    /// Reason for a failed or pending copy.
    pub status_description: Option<String>,
}

impl CopyProperties {
    fn slot(&mut self, field: PropertyField) -> Option<&mut Option<String>> {
        match field {
            PropertyField::CopyId => Some(&mut self.id),
            PropertyField::CopySource => Some(&mut self.source),
            PropertyField::CopyStatus => Some(&mut self.status),
            PropertyField::CopyProgress => Some(&mut self.progress),
            PropertyField::CopyCompletionTime => Some(&mut self.completion_time),
            PropertyField::CopyStatusDescription => Some(&mut self.status_description),
            _ => None,
        }
    }
}

/// Properties of a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlobProperties {
    /// `BlockBlob`, `PageBlob` or `AppendBlob`.
    pub blob_type: Option<String>,
    /// Time of the last modification.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included.
    pub etag: Option<String>,
    /// Size in bytes.
    pub content_length: Option<i64>,
    /// Content headers.
    pub content_settings: ContentSettings,
    /// Lease state.
    pub lease: LeaseProperties,
    /// Last copy operation.
    pub copy: CopyProperties,
    /// Sequence number of a page blob.
    pub page_blob_sequence_number: Option<i64>,
    /// Committed block count of an append blob.
    pub append_blob_committed_block_count: Option<i64>,
}

impl ResourceProperties for BlobProperties {
    fn assign(&mut self, field: PropertyField, value: PropertyValue) {
        match field.target() {
            PropertyTarget::ContentSettings => set_text(self.content_settings.slot(field), value),
            PropertyTarget::Lease => set_text(self.lease.slot(field), value),
            PropertyTarget::Copy => set_text(self.copy.slot(field), value),
            PropertyTarget::Root => match (field, value) {
                (PropertyField::LastModified, PropertyValue::Timestamp(ts)) => {
                    self.last_modified = Some(ts);
                }
                (PropertyField::Etag, PropertyValue::Text(etag)) => self.etag = Some(etag),
                (PropertyField::BlobType, PropertyValue::Text(kind)) => self.blob_type = Some(kind),
                (PropertyField::ContentLength, PropertyValue::Integer(n)) => {
                    self.content_length = Some(n);
                }
                (PropertyField::PageBlobSequenceNumber, PropertyValue::Integer(n)) => {
                    self.page_blob_sequence_number = Some(n);
                }
                (PropertyField::AppendBlobCommittedBlockCount, PropertyValue::Integer(n)) => {
                    self.append_blob_committed_block_count = Some(n);
                }
                _ => {}
            },
        }
    }
}

/// Properties of a file in a share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileProperties {
    /// Time of the last modification.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included.
    pub etag: Option<String>,
    /// Size in bytes.
    pub content_length: Option<i64>,
    /// Content headers.
    pub content_settings: ContentSettings,
    /// Last copy operation.
    pub copy: CopyProperties,
}

impl ResourceProperties for FileProperties {
    fn assign(&mut self, field: PropertyField, value: PropertyValue) {
        match field.target() {
            PropertyTarget::ContentSettings => set_text(self.content_settings.slot(field), value),
            PropertyTarget::Copy => set_text(self.copy.slot(field), value),
            PropertyTarget::Lease => {}
            PropertyTarget::Root => match (field, value) {
                (PropertyField::LastModified, PropertyValue::Timestamp(ts)) => {
                    self.last_modified = Some(ts);
                }
                (PropertyField::Etag, PropertyValue::Text(etag)) => self.etag = Some(etag),
                (PropertyField::ContentLength, PropertyValue::Integer(n)) => {
                    self.content_length = Some(n);
                }
                _ => {}
            },
        }
    }
}

/// Properties of a share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareProperties {
    /// Time of the last modification.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included.
    pub etag: Option<String>,
    /// Maximum share size in GiB.
    pub quota: Option<i64>,
}

impl ResourceProperties for ShareProperties {
    fn assign(&mut self, field: PropertyField, value: PropertyValue) {
        match (field, value) {
            (PropertyField::LastModified, PropertyValue::Timestamp(ts)) => {
                self.last_modified = Some(ts);
            }
            (PropertyField::Etag, PropertyValue::Text(etag)) => self.etag = Some(etag),
            _ => {}
        }
    }
}

/// Properties of a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryProperties {
    /// Time of the last modification.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included.
    pub etag: Option<String>,
}

impl ResourceProperties for DirectoryProperties {
    fn assign(&mut self, field: PropertyField, value: PropertyValue) {
        match (field, value) {
            (PropertyField::LastModified, PropertyValue::Timestamp(ts)) => {
                self.last_modified = Some(ts);
            }
            (PropertyField::Etag, PropertyValue::Text(etag)) => self.etag = Some(etag),
            _ => {}
        }
    }
}
