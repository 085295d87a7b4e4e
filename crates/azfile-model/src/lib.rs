//! Value records for the azfile storage client.
//!
//! These are plain data types with no behavior beyond field assignment. They
//! are built fresh by the parsers in `azfile-xml` and `azfile-http` and handed
//! to the caller.

pub mod listing;
pub mod properties;
pub mod service;

pub use listing::{Directory, File, FileAndDirectoryResults, FileRange, Share, ShareList, ShareStats};
pub use properties::{
    BlobProperties, ContentSettings, Conversion, CopyProperties, DirectoryProperties,
    FileProperties, LeaseProperties, Metadata, PropertyField, PropertyTarget, PropertyValue,
    ResourceProperties, ShareProperties,
};
pub use service::{
    AccessPolicy, CorsRule, Logging, Metrics, RetentionPolicy, ServiceProperties,
    SignedIdentifiers,
};
