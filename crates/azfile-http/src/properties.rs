//! Response header to property record extraction.
//!
//! Each response header is matched by its lower-cased name against the
//! [`PropertyField`] table. Mapped headers are converted and assigned into the
//! requested record kind; `x-ms-meta-*` headers are collected into the
//! metadata map with the prefix removed; everything else is skipped.

use azfile_model::{Conversion, Metadata, PropertyField, PropertyValue, ResourceProperties};
use azfile_xml::parse_timestamp;
use http::HeaderMap;
use http::header::HeaderValue;
use tracing::{debug, trace};

use crate::error::FileError;

/// Prefix of user-defined metadata headers.
pub const METADATA_PREFIX: &str = "x-ms-meta-";

/// Build a property record of kind `P` and a metadata map from response
/// headers.
///
/// An empty header map yields `P::default()` and an empty map.
///
/// # Errors
///
/// Returns [`FileError::InvalidHeader`] if a mapped or metadata header is not
/// valid UTF-8, or a mapped header's value cannot be converted.
pub fn extract_properties<P: ResourceProperties>(
    headers: &HeaderMap,
) -> Result<(P, Metadata), FileError> {
    let mut properties = P::default();
    let mut metadata = Metadata::new();

    for (name, value) in headers {
        let name = name.as_str();

        if let Some(key) = name.strip_prefix(METADATA_PREFIX) {
            metadata.insert(key.to_owned(), header_text(name, value)?.to_owned());
            continue;
        }

        let Some(field) = PropertyField::from_header_name(name) else {
            trace!(header = name, "ignoring unmapped response header");
            continue;
        };
        let value = convert(field, header_text(name, value)?)?;
        properties.assign(field, value);
    }

    debug!(
        headers = headers.len(),
        metadata = metadata.len(),
        "extracted resource properties"
    );
    Ok((properties, metadata))
}

/// Read a header value as UTF-8 text.
fn header_text<'a>(name: &str, value: &'a HeaderValue) -> Result<&'a str, FileError> {
    std::str::from_utf8(value.as_bytes())
        .map_err(|e| FileError::invalid_header(name, format!("value is not UTF-8: {e}")))
}

fn convert(field: PropertyField, text: &str) -> Result<PropertyValue, FileError> {
    match field.conversion() {
        Conversion::Text => Ok(PropertyValue::Text(text.to_owned())),
        Conversion::Integer => text.trim().parse::<i64>().map(PropertyValue::Integer).map_err(|e| {
            FileError::invalid_header(field.header_name(), format!("invalid integer '{text}': {e}"))
        }),
        Conversion::Timestamp => parse_timestamp(text)
            .map(PropertyValue::Timestamp)
            .map_err(|e| FileError::invalid_header(field.header_name(), e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use azfile_model::{BlobProperties, DirectoryProperties, FileProperties, ShareProperties};
    use chrono::{TimeZone, Utc};

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_should_leave_everything_unset_for_unrecognized_headers() {
        let map = headers(&[("x-ms-request-id", "abc"), ("server", "Windows-Azure-File/1.0")]);

        let (props, metadata) = extract_properties::<BlobProperties>(&map).expect("extract");

        assert_eq!(props, BlobProperties::default());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_should_return_defaults_for_empty_headers() {
        let (props, metadata) =
            extract_properties::<FileProperties>(&HeaderMap::new()).expect("extract");
        assert_eq!(props, FileProperties::default());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_should_strip_metadata_prefix() {
        let map = headers(&[("x-ms-meta-foo", "bar"), ("x-ms-meta-owner", "alice")]);

        let (_, metadata) = extract_properties::<ShareProperties>(&map).expect("extract");

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(metadata.get("owner").map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_should_extract_blob_properties() {
        let map = headers(&[
            ("last-modified", "Mon, 27 Jan 2014 22:14:02 GMT"),
            ("etag", "\"0x8D0EA5A1C5E4A3F\""),
            ("x-ms-blob-type", "PageBlob"),
            ("content-length", "1024"),
            ("x-ms-blob-sequence-number", "7"),
            ("content-type", "text/plain"),
            ("content-md5", "Q2hlY2sgSW50ZWdyaXR5IQ=="),
            ("x-ms-lease-status", "unlocked"),
            ("x-ms-copy-progress", "512/1024"),
        ]);

        let (props, _) = extract_properties::<BlobProperties>(&map).expect("extract");

        assert_eq!(
            props.last_modified,
            Some(Utc.with_ymd_and_hms(2014, 1, 27, 22, 14, 2).unwrap())
        );
        assert_eq!(props.etag.as_deref(), Some("\"0x8D0EA5A1C5E4A3F\""));
        assert_eq!(props.blob_type.as_deref(), Some("PageBlob"));
        assert_eq!(props.content_length, Some(1024));
        assert_eq!(props.page_blob_sequence_number, Some(7));
        assert_eq!(props.content_settings.content_type.as_deref(), Some("text/plain"));
        assert_eq!(
            props.content_settings.content_md5.as_deref(),
            Some("Q2hlY2sgSW50ZWdyaXR5IQ==")
        );
        assert_eq!(props.lease.status.as_deref(), Some("unlocked"));
        assert_eq!(props.copy.progress.as_deref(), Some("512/1024"));
        assert!(props.append_blob_committed_block_count.is_none());
    }

    #[test]
    fn test_should_ignore_fields_the_record_kind_lacks() {
        let map = headers(&[
            ("x-ms-blob-type", "BlockBlob"),
            ("content-type", "text/plain"),
            ("etag", "\"1\""),
        ]);

        let (props, _) = extract_properties::<DirectoryProperties>(&map).expect("extract");

        assert_eq!(props.etag.as_deref(), Some("\"1\""));
        assert!(props.last_modified.is_none());
    }

    #[test]
    fn test_should_reject_non_integer_content_length() {
        let map = headers(&[("content-length", "lots")]);

        let err = extract_properties::<FileProperties>(&map).unwrap_err();

        assert!(matches!(err, FileError::InvalidHeader { ref name, .. } if name == "content-length"));
    }

    #[test]
    fn test_should_reject_unparseable_last_modified() {
        let map = headers(&[("last-modified", "yesterday")]);

        let err = extract_properties::<ShareProperties>(&map).unwrap_err();

        assert!(matches!(err, FileError::InvalidHeader { ref name, .. } if name == "last-modified"));
    }

    #[test]
    fn test_should_accept_dates_with_mismatched_weekday() {
        let map = headers(&[("last-modified", "Thu, 01 Jul 2015 08:49:37 GMT")]);

        let (props, _) = extract_properties::<ShareProperties>(&map).expect("extract");

        assert_eq!(
            props.last_modified,
            Some(Utc.with_ymd_and_hms(2015, 7, 1, 8, 49, 37).unwrap())
        );
    }

    #[test]
    fn test_should_accept_rfc3339_last_modified() {
        let map = headers(&[("last-modified", "2015-07-01T08:49:37Z")]);

        let (props, _) = extract_properties::<FileProperties>(&map).expect("extract");

        assert_eq!(
            props.last_modified,
            Some(Utc.with_ymd_and_hms(2015, 7, 1, 8, 49, 37).unwrap())
        );
    }
}
