//! Storage XML deserialization: parsing response bodies into model records.
//!
//! This module provides the [`XmlDeserialize`] trait and implementations for
//! every document shape the file service returns. Each implementation walks
//! an [`XmlElement`] tree: required children are fetched with
//! [`XmlElement::require`] and fail with `MissingElement`, optional children
//! are looked up with [`XmlElement::child`] and leave the field `None` when
//! absent.

use std::collections::HashMap;

use azfile_model::{
    AccessPolicy, CorsRule, Directory, File, FileAndDirectoryResults, FileProperties, FileRange,
    Logging, Metrics, RetentionPolicy, ServiceProperties, Share, ShareList, ShareProperties,
    ShareStats, SignedIdentifiers,
};
use tracing::trace;

use crate::element::XmlElement;
use crate::error::XmlError;

/// Trait for building a model record from a parsed element.
pub trait XmlDeserialize: Sized {
    /// Build an instance from `element`, which is the element that carries
    /// this record's fields as children.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if a required child is missing or a value cannot be
    /// converted.
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError>;
}

/// Parse a storage XML document into a typed value.
///
/// The root element's name is not checked; its children are handed to the
/// type's [`XmlDeserialize`] implementation.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed or deserialization fails.
pub fn from_xml<T: XmlDeserialize>(xml: &[u8]) -> Result<T, XmlError> {
    let root = XmlElement::parse(xml)?;
    trace!(root = %root.name, children = root.children.len(), "parsed XML document");
    T::deserialize_xml(&root)
}

// ---------------------------------------------------------------------------
// Helper functions for converting element text
// ---------------------------------------------------------------------------

/// Parse a boolean: `true` in any letter case is `true`, anything else is
/// `false`.
fn parse_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

/// Parse an i32 from XML text.
fn parse_i32(s: &str) -> Result<i32, XmlError> {
    s.trim()
        .parse::<i32>()
        .map_err(|e| XmlError::ParseError(format!("invalid i32 '{s}': {e}")))
}

/// Parse an i64 from XML text.
fn parse_i64(s: &str) -> Result<i64, XmlError> {
    s.trim()
        .parse::<i64>()
        .map_err(|e| XmlError::ParseError(format!("invalid i64 '{s}': {e}")))
}

/// Parse a u64 from XML text.
fn parse_u64(s: &str) -> Result<u64, XmlError> {
    s.trim()
        .parse::<u64>()
        .map_err(|e| XmlError::ParseError(format!("invalid u64 '{s}': {e}")))
}

/// Parse a timestamp as the service writes it.
///
/// Listings and response headers use RFC 1123 (`Mon, 27 Jan 2014 22:14:02
/// GMT`); a weekday that does not match the date is ignored. Access policies
/// use ISO 8601 with up to seven fractional digits, sometimes without seconds
/// or without a time at all.
///
/// # Errors
///
/// Returns `XmlError::ParseError` if no supported format matches.
pub fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, XmlError> {
    let text = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(text) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    if let Some((_weekday, rest)) = text.split_once(", ") {
        if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S GMT") {
            return Ok(ndt.and_utc());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%MZ"] {
        if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return Ok(ndt.and_utc());
        }
    }
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}

/// Split a comma-separated list as written, without trimming entries.
fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(ToOwned::to_owned).collect()
}

/// Text of an optional child, treating an empty or blank element like an
/// absent one.
fn non_empty_text<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element.child_text(name).filter(|t| !t.trim().is_empty())
}

/// Continuation marker of an enumeration page; `<NextMarker />` means done.
fn next_marker(element: &XmlElement) -> Option<String> {
    non_empty_text(element, "NextMarker").map(ToOwned::to_owned)
}

// ---------------------------------------------------------------------------
// Service properties
// ---------------------------------------------------------------------------

impl XmlDeserialize for RetentionPolicy {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let enabled = parse_bool(element.required_text("Enabled")?);
        let days = element.child_text("Days").map(parse_i32).transpose()?;
        Ok(RetentionPolicy { enabled, days })
    }
}

impl XmlDeserialize for Logging {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Ok(Logging {
            version: element.required_text("Version")?.to_owned(),
            delete: parse_bool(element.required_text("Delete")?),
            read: parse_bool(element.required_text("Read")?),
            write: parse_bool(element.required_text("Write")?),
            retention_policy: RetentionPolicy::deserialize_xml(element.require("RetentionPolicy")?)?,
        })
    }
}

impl XmlDeserialize for Metrics {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Ok(Metrics {
            version: element.required_text("Version")?.to_owned(),
            enabled: parse_bool(element.required_text("Enabled")?),
            include_apis: element.child_text("IncludeAPIs").map(parse_bool),
            retention_policy: RetentionPolicy::deserialize_xml(element.require("RetentionPolicy")?)?,
        })
    }
}

impl XmlDeserialize for CorsRule {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let mut rule = CorsRule::new(
            split_list(element.required_text("AllowedOrigins")?),
            split_list(element.required_text("AllowedMethods")?),
            parse_i32(element.required_text("MaxAgeInSeconds")?)?,
        );
        rule.exposed_headers = non_empty_text(element, "ExposedHeaders").map(split_list);
        rule.allowed_headers = non_empty_text(element, "AllowedHeaders").map(split_list);
        Ok(rule)
    }
}

impl XmlDeserialize for ServiceProperties {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let logging = element
            .child("Logging")
            .map(Logging::deserialize_xml)
            .transpose()?;
        let hour_metrics = element
            .child("HourMetrics")
            .map(Metrics::deserialize_xml)
            .transpose()?;
        let minute_metrics = element
            .child("MinuteMetrics")
            .map(Metrics::deserialize_xml)
            .transpose()?;
        let cors = element
            .child("Cors")
            .map(|cors| {
                cors.children_named("CorsRule")
                    .map(CorsRule::deserialize_xml)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        let target_version = non_empty_text(element, "DefaultServiceVersion").map(ToOwned::to_owned);

        Ok(ServiceProperties {
            logging,
            hour_metrics,
            minute_metrics,
            cors,
            target_version,
        })
    }
}

// ---------------------------------------------------------------------------
// Stored access policies
// ---------------------------------------------------------------------------

impl XmlDeserialize for AccessPolicy {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let start = element
            .child_text("Start")
            .map(parse_timestamp)
            .transpose()?;
        let expiry = element
            .child_text("Expiry")
            .map(parse_timestamp)
            .transpose()?;
        // Unlike the time window, a missing permission is tolerated.
        let permission = element.child_text("Permission").map(ToOwned::to_owned);

        Ok(AccessPolicy {
            start,
            expiry,
            permission,
        })
    }
}

impl XmlDeserialize for SignedIdentifiers {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let mut identifiers = SignedIdentifiers::new();
        for signed_identifier in element.children_named("SignedIdentifier") {
            let id = signed_identifier.required_text("Id")?.to_owned();
            let policy = AccessPolicy::deserialize_xml(signed_identifier.require("AccessPolicy")?)?;
            identifiers.insert(id, policy);
        }
        Ok(identifiers)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

impl XmlDeserialize for Share {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let name = element.required_text("Name")?.to_owned();

        let metadata = element.child("Metadata").map(|metadata| {
            metadata
                .children
                .iter()
                .map(|entry| (entry.name.clone(), entry.text.clone()))
                .collect::<HashMap<_, _>>()
        });

        let properties = element.require("Properties")?;
        let properties = ShareProperties {
            last_modified: Some(parse_timestamp(properties.required_text("Last-Modified")?)?),
            etag: Some(properties.required_text("Etag")?.to_owned()),
            quota: Some(parse_i64(properties.required_text("Quota")?)?),
        };

        Ok(Share {
            name,
            metadata,
            properties,
        })
    }
}

impl XmlDeserialize for ShareList {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let shares = element
            .require("Shares")?
            .children_named("Share")
            .map(Share::deserialize_xml)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ShareList {
            shares,
            next_marker: next_marker(element),
        })
    }
}

impl XmlDeserialize for File {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let content_length = parse_i64(
            element
                .require("Properties")?
                .required_text("Content-Length")?,
        )?;

        Ok(File {
            name: element.required_text("Name")?.to_owned(),
            properties: FileProperties {
                content_length: Some(content_length),
                ..FileProperties::default()
            },
            ..File::default()
        })
    }
}

impl XmlDeserialize for Directory {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Ok(Directory {
            name: element.required_text("Name")?.to_owned(),
        })
    }
}

impl XmlDeserialize for FileAndDirectoryResults {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        let entries = element.require("Entries")?;
        let files = entries
            .children_named("File")
            .map(File::deserialize_xml)
            .collect::<Result<Vec<_>, _>>()?;
        let directories = entries
            .children_named("Directory")
            .map(Directory::deserialize_xml)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileAndDirectoryResults {
            files,
            directories,
            next_marker: next_marker(element),
        })
    }
}

impl XmlDeserialize for FileRange {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Ok(FileRange {
            start: parse_u64(element.required_text("Start")?)?,
            end: parse_u64(element.required_text("End")?)?,
        })
    }
}

impl XmlDeserialize for Vec<FileRange> {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        element
            .children_named("Range")
            .map(FileRange::deserialize_xml)
            .collect()
    }
}

impl XmlDeserialize for ShareStats {
    fn deserialize_xml(element: &XmlElement) -> Result<Self, XmlError> {
        Ok(ShareStats {
            share_usage: parse_i64(element.required_text("ShareUsage")?)?,
        })
    }
}
