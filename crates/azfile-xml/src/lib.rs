//! XML reading and writing for the azfile storage client.
//!
//! This crate converts between the file service's XML bodies and the records
//! in `azfile-model`.
//!
//! # Key components
//!
//! - [`XmlElement`], a small owned tree built from the quick-xml event stream
//! - [`XmlDeserialize`] trait and [`from_xml`] function for parsing response bodies
//! - [`XmlSerialize`] trait and [`to_xml`] function for writing request bodies
//!
//! # Storage XML conventions
//!
//! - No namespace
//! - Booleans: `true` in any letter case reads as true, written lowercase
//! - Lists: comma-separated inside a single element
//! - Timestamps: RFC 1123 in listings, ISO 8601 in access policies

pub mod deserialize;
pub mod element;
pub mod error;
pub mod serialize;

pub use deserialize::{XmlDeserialize, from_xml, parse_timestamp};
pub use element::XmlElement;
pub use error::XmlError;
pub use serialize::{XmlSerialize, service_properties_to_xml, signed_identifiers_to_xml, to_xml};
