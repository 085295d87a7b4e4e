//! Storage XML serialization: writing request bodies for set-properties and
//! set-ACL calls.
//!
//! The documents written here are exactly the shapes [`crate::deserialize`]
//! reads back:
//!
//! - Lists: comma-joined, e.g. `<AllowedMethods>GET,PUT</AllowedMethods>`
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 to the second (`2015-07-01T08:49:37Z`)
//! - XML declaration: `<?xml version="1.0" encoding="utf-8"?>`, no namespace

use std::io::{self, Write};

use azfile_model::{
    AccessPolicy, CorsRule, Logging, Metrics, RetentionPolicy, ServiceProperties,
    SignedIdentifiers,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::XmlError;

/// Trait for serializing records to XML.
///
/// Implementors write their content as child elements inside the current XML
/// context. The root element is written by [`to_xml`].
pub trait XmlSerialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete XML document under `root_element`.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: XmlSerialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer
        .create_element(root_element)
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

/// Serialize service properties as a `StorageServiceProperties` document.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn service_properties_to_xml(props: &ServiceProperties) -> Result<Vec<u8>, XmlError> {
    to_xml("StorageServiceProperties", props)
}

/// Serialize stored access policies as a `SignedIdentifiers` document.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn signed_identifiers_to_xml(identifiers: &SignedIdentifiers) -> Result<Vec<u8>, XmlError> {
    to_xml("SignedIdentifiers", identifiers)
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

/// Write `<tag>a,b,c</tag>`; `None` writes an empty element.
fn write_list<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    values: Option<&[String]>,
) -> io::Result<()> {
    write_text_element(writer, tag, &values.unwrap_or_default().join(","))
}

fn write_optional_timestamp<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&chrono::DateTime<chrono::Utc>>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, &v.format("%Y-%m-%dT%H:%M:%SZ").to_string())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// XmlSerialize implementations
// ---------------------------------------------------------------------------

impl XmlSerialize for RetentionPolicy {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_bool(writer, "Enabled", self.enabled)?;
        if let Some(days) = self.days {
            write_text_element(writer, "Days", &days.to_string())?;
        }
        Ok(())
    }
}

impl XmlSerialize for Logging {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Version", &self.version)?;
        write_bool(writer, "Delete", self.delete)?;
        write_bool(writer, "Read", self.read)?;
        write_bool(writer, "Write", self.write)?;
        writer
            .create_element("RetentionPolicy")
            .write_inner_content(|w| self.retention_policy.serialize_xml(w))?;
        Ok(())
    }
}

impl XmlSerialize for Metrics {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Version", &self.version)?;
        write_bool(writer, "Enabled", self.enabled)?;
        if let Some(include_apis) = self.include_apis {
            write_bool(writer, "IncludeAPIs", include_apis)?;
        }
        writer
            .create_element("RetentionPolicy")
            .write_inner_content(|w| self.retention_policy.serialize_xml(w))?;
        Ok(())
    }
}

impl XmlSerialize for CorsRule {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_list(writer, "AllowedOrigins", Some(&self.allowed_origins))?;
        write_list(writer, "AllowedMethods", Some(&self.allowed_methods))?;
        write_text_element(
            writer,
            "MaxAgeInSeconds",
            &self.max_age_in_seconds.to_string(),
        )?;
        // The service requires both header lists, even when empty.
        write_list(writer, "ExposedHeaders", self.exposed_headers.as_deref())?;
        write_list(writer, "AllowedHeaders", self.allowed_headers.as_deref())?;
        Ok(())
    }
}

impl XmlSerialize for ServiceProperties {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(logging) = &self.logging {
            writer
                .create_element("Logging")
                .write_inner_content(|w| logging.serialize_xml(w))?;
        }
        if let Some(metrics) = &self.hour_metrics {
            writer
                .create_element("HourMetrics")
                .write_inner_content(|w| metrics.serialize_xml(w))?;
        }
        if let Some(metrics) = &self.minute_metrics {
            writer
                .create_element("MinuteMetrics")
                .write_inner_content(|w| metrics.serialize_xml(w))?;
        }
        if let Some(rules) = &self.cors {
            writer.create_element("Cors").write_inner_content(|w| {
                for rule in rules {
                    w.create_element("CorsRule")
                        .write_inner_content(|w| rule.serialize_xml(w))?;
                }
                Ok(())
            })?;
        }
        if let Some(version) = &self.target_version {
            write_text_element(writer, "DefaultServiceVersion", version)?;
        }
        Ok(())
    }
}

impl XmlSerialize for AccessPolicy {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_timestamp(writer, "Start", self.start.as_ref())?;
        write_optional_timestamp(writer, "Expiry", self.expiry.as_ref())?;
        if let Some(permission) = &self.permission {
            write_text_element(writer, "Permission", permission)?;
        }
        Ok(())
    }
}

impl XmlSerialize for SignedIdentifiers {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for (id, policy) in self {
            writer
                .create_element("SignedIdentifier")
                .write_inner_content(|w| {
                    write_text_element(w, "Id", id)?;
                    w.create_element("AccessPolicy")
                        .write_inner_content(|w| policy.serialize_xml(w))?;
                    Ok(())
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::deserialize::from_xml;

    fn cors_rule() -> CorsRule {
        CorsRule::new(
            "a.com,b.com".split(',').map(ToOwned::to_owned).collect(),
            "GET,PUT".split(',').map(ToOwned::to_owned).collect(),
            60,
        )
    }

    #[test]
    fn test_should_serialize_cors_rule_as_comma_joined_lists() {
        let props = ServiceProperties {
            cors: Some(vec![cors_rule()]),
            ..ServiceProperties::default()
        };

        let xml = service_properties_to_xml(&props).expect("serialization should succeed");
        let xml = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<AllowedOrigins>a.com,b.com</AllowedOrigins>"));
        assert!(xml.contains("<AllowedMethods>GET,PUT</AllowedMethods>"));
        assert!(xml.contains("<MaxAgeInSeconds>60</MaxAgeInSeconds>"));
        assert!(xml.contains("<ExposedHeaders></ExposedHeaders>"));
        assert!(!xml.contains("<Logging>"));
    }

    #[test]
    fn test_should_read_back_written_service_properties() {
        let mut rule = cors_rule();
        rule.allowed_headers = Some(vec!["x-ms-meta-*".to_owned()]);
        let original = ServiceProperties {
            logging: Some(Logging {
                version: "1.0".to_owned(),
                delete: true,
                read: false,
                write: true,
                retention_policy: RetentionPolicy {
                    enabled: true,
                    days: Some(5),
                },
            }),
            hour_metrics: Some(Metrics {
                version: "1.0".to_owned(),
                enabled: true,
                include_apis: Some(true),
                retention_policy: RetentionPolicy::default(),
            }),
            minute_metrics: None,
            cors: Some(vec![rule]),
            target_version: Some("2015-04-05".to_owned()),
        };

        let xml = service_properties_to_xml(&original).expect("serialization should succeed");
        let parsed: ServiceProperties = from_xml(&xml).expect("deserialization should succeed");

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_should_escape_signed_identifier_text() {
        let mut identifiers = SignedIdentifiers::new();
        identifiers.insert(
            "a<b&c".to_owned(),
            AccessPolicy {
                start: Some(Utc.with_ymd_and_hms(2015, 7, 1, 8, 49, 37).unwrap()),
                expiry: None,
                permission: Some("r".to_owned()),
            },
        );

        let xml = signed_identifiers_to_xml(&identifiers).expect("serialization should succeed");
        let text = std::str::from_utf8(&xml).expect("valid UTF-8");
        assert!(text.contains("<Id>a&lt;b&amp;c</Id>"));
        assert!(text.contains("<Start>2015-07-01T08:49:37Z</Start>"));
        assert!(!text.contains("<Expiry>"));

        let parsed: SignedIdentifiers = from_xml(&xml).expect("deserialization should succeed");
        assert_eq!(parsed, identifiers);
    }
}
