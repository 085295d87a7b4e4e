//! Response parsing and outgoing request headers for the azfile storage client.
//!
//! This crate sits between raw HTTP exchanges and the records in
//! `azfile-model`:
//!
//! - **Properties** ([`properties`]): Builds blob, file, share, or directory
//!   property records and the user metadata map from response headers.
//!
//! - **Responses** ([`response`]): Parses share, directory, range, and
//!   share-stats listing bodies, passing the response through untouched when
//!   it has no body, and builds a [`File`](azfile_model::File) from a get-file
//!   response.
//!
//! - **Requests** ([`request`]): Assembles the headers of an outgoing file
//!   request and hands it to a [`RequestSigner`].
//!
//! - **Config** ([`config`]): The [`FileClientConfig`] values stamped on every
//!   request.
//!
//! # Usage
//!
//! ```rust,no_run
//! use azfile_http::{StorageResponse, parse_shares};
//! use http::StatusCode;
//!
//! let response = StorageResponse::new(StatusCode::OK)
//!     .with_body(&b"<EnumerationResults><Shares /></EnumerationResults>"[..]);
//! let shares = parse_shares(response).expect("valid listing");
//! assert!(shares.is_parsed());
//! ```

pub mod config;
pub mod error;
pub mod properties;
pub mod request;
pub mod response;

// Re-export key types for convenience.
pub use config::FileClientConfig;
pub use error::{FileError, SignError};
pub use properties::{METADATA_PREFIX, extract_properties};
pub use request::{
    FILE_CONTENT_TYPE, HeaderUpdater, RequestSigner, StandardHeaderUpdater, StorageRequest,
    format_http_date, update_storage_file_header, update_storage_file_header_at,
};
pub use response::{
    ParseOutcome, StorageResponse, parse_directories_and_files, parse_file, parse_ranges,
    parse_share_stats, parse_shares,
};
