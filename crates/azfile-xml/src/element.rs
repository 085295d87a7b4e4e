//! A minimal owned element tree.
//!
//! Storage response documents are small and every parser needs "find the
//! child named X" and "all children named X" lookups, with `<X/>` and
//! `<X></X>` treated alike. The tree is built in one pass over the quick-xml
//! event stream and dropped when the parse call returns. Element text is kept
//! verbatim; callers trim where they convert a value.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// An XML element: its tag name, text content, and child elements in
/// document order. Attributes are not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name as written in the document.
    pub name: String,
    /// Concatenated character data directly inside this element, as written.
    /// Empty when the element has children and only indentation between them.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an element with the given name and no content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    ///
    /// Text is kept as written. Whitespace-only text inside an element that
    /// has child elements is indentation and is dropped. Only whitespace,
    /// comments, and processing instructions may follow the root element.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the document is not well-formed, has no root, or
    /// has content after the root.
    pub fn parse(xml: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);
        let mut stack: Vec<XmlElement> = Vec::new();

        let root = loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Self::new(tag_name(&e)?)),
                Event::Empty(e) => {
                    if let Some(root) = attach(&mut stack, Self::new(tag_name(&e)?)) {
                        break root;
                    }
                }
                Event::End(_) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        XmlError::UnexpectedElement("end tag without start tag".to_owned())
                    })?;
                    if !element.children.is_empty() && is_blank(element.text.as_bytes()) {
                        element.text.clear();
                    }
                    if let Some(root) = attach(&mut stack, element) {
                        break root;
                    }
                }
                Event::Text(e) => match stack.last_mut() {
                    Some(current) => {
                        let decoded = e
                            .decode()
                            .map_err(|err| XmlError::ParseError(err.to_string()))?;
                        let unescaped = quick_xml::escape::unescape(&decoded)
                            .map_err(|err| XmlError::ParseError(err.to_string()))?;
                        current.text.push_str(&unescaped);
                    }
                    None if is_blank(&e) => {}
                    None => {
                        return Err(XmlError::ParseError(
                            "text outside the root element".to_owned(),
                        ));
                    }
                },
                Event::CData(e) => {
                    let current = stack.last_mut().ok_or_else(|| {
                        XmlError::ParseError("CDATA outside the root element".to_owned())
                    })?;
                    let text = std::str::from_utf8(&e)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    current.text.push_str(text);
                }
                Event::GeneralRef(e) => {
                    let current = stack.last_mut().ok_or_else(|| {
                        XmlError::ParseError("reference outside the root element".to_owned())
                    })?;
                    let reference = std::str::from_utf8(&e)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    current.text.push_str(&resolve_reference(reference)?);
                }
                Event::Eof => {
                    return Err(match stack.last() {
                        Some(open) => {
                            XmlError::ParseError(format!("unexpected EOF inside {}", open.name))
                        }
                        None => XmlError::ParseError("document has no root element".to_owned()),
                    });
                }
                // Declaration, comments, processing instructions, doctype.
                _ => {}
            }
        };

        loop {
            match reader.read_event()? {
                Event::Eof => return Ok(root),
                Event::Text(e) if is_blank(&e) => {}
                Event::Comment(_) | Event::PI(_) => {}
                event => {
                    return Err(XmlError::UnexpectedElement(format!(
                        "content after root element {}: {event:?}",
                        root.name
                    )));
                }
            }
        }
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child with the given name, or `MissingElement` naming its path.
    ///
    /// # Errors
    ///
    /// Returns `XmlError::MissingElement` if no such child exists.
    pub fn require(&self, name: &str) -> Result<&XmlElement, XmlError> {
        self.child(name)
            .ok_or_else(|| XmlError::MissingElement(format!("{}/{name}", self.name)))
    }

    /// Text of the first child with the given name; empty if that child has
    /// no text.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Text of a required child.
    ///
    /// # Errors
    ///
    /// Returns `XmlError::MissingElement` if no such child exists.
    pub fn required_text(&self, name: &str) -> Result<&str, XmlError> {
        self.require(name).map(|c| c.text.as_str())
    }
}

/// Add a closed element to its parent; returns it when it is the root.
fn attach(stack: &mut [XmlElement], element: XmlElement) -> Option<XmlElement> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn tag_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.name();
    std::str::from_utf8(name.as_ref())
        .map(ToOwned::to_owned)
        .map_err(|err| XmlError::ParseError(err.to_string()))
}

/// Resolve the body of an `&...;` reference.
fn resolve_reference(reference: &str) -> Result<String, XmlError> {
    if let Some(code) = reference.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        }
        .map_err(|err| XmlError::ParseError(format!("invalid character reference '&{reference};': {err}")))?;
        return char::from_u32(value)
            .map(String::from)
            .ok_or_else(|| XmlError::ParseError(format!("invalid character reference '&{reference};'")));
    }

    quick_xml::escape::resolve_predefined_entity(reference)
        .map(ToOwned::to_owned)
        .ok_or_else(|| XmlError::ParseError(format!("unknown entity '&{reference};'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_tree_in_document_order() {
        let root = XmlElement::parse(
            br#"<?xml version="1.0" encoding="utf-8"?>
            <Entries><File><Name>a</Name></File><Directory><Name>d</Name></Directory><File><Name>b</Name></File></Entries>"#,
        )
        .expect("well-formed");

        assert_eq!(root.name, "Entries");
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["File", "Directory", "File"]);
        let files: Vec<&str> = root
            .children_named("File")
            .filter_map(|f| f.child_text("Name"))
            .collect();
        assert_eq!(files, ["a", "b"]);
    }

    #[test]
    fn test_should_treat_self_closing_element_as_present_and_empty() {
        let root = XmlElement::parse(b"<Root><NextMarker /><Other>x</Other></Root>").expect("ok");
        assert_eq!(root.child_text("NextMarker"), Some(""));
        assert!(root.child("Missing").is_none());
    }

    #[test]
    fn test_should_resolve_entities_without_losing_spaces() {
        let root = XmlElement::parse(b"<V>  a &amp; b &#x41;&#66; &lt;c&gt;  </V>").expect("ok");
        assert_eq!(root.text, "  a & b AB <c>  ");
    }

    #[test]
    fn test_should_keep_leaf_text_verbatim_and_drop_indentation() {
        let root = XmlElement::parse(b"<Metadata>\n  <k>  v  </k>\n  <e></e>\n</Metadata>\n")
            .expect("ok");
        assert_eq!(root.text, "");
        assert_eq!(root.child_text("k"), Some("  v  "));
        assert_eq!(root.child_text("e"), Some(""));
    }

    #[test]
    fn test_should_read_cdata() {
        let root = XmlElement::parse(b"<V><![CDATA[<raw>]]></V>").expect("ok");
        assert_eq!(root.text, "<raw>");
    }

    #[test]
    fn test_should_name_missing_child_path() {
        let root = XmlElement::parse(b"<Logging><Version>1.0</Version></Logging>").expect("ok");
        let err = root.required_text("Delete").unwrap_err();
        assert!(matches!(err, XmlError::MissingElement(ref p) if p == "Logging/Delete"));
    }

    #[test]
    fn test_should_reject_malformed_documents() {
        assert!(XmlElement::parse(b"<A><B></A>").is_err());
        assert!(XmlElement::parse(b"<A><B>text</B>").is_err());
        assert!(matches!(XmlElement::parse(b""), Err(XmlError::ParseError(_))));
        assert!(matches!(
            XmlElement::parse(b"<?xml version=\"1.0\"?>\n  "),
            Err(XmlError::ParseError(_))
        ));
        assert!(XmlElement::parse(b"junk<A/>").is_err());
    }

    #[test]
    fn test_should_reject_content_after_root() {
        assert!(XmlElement::parse(b"<A>1</A><B>2</B>").is_err());
        assert!(XmlElement::parse(b"<A>1</A><Other><").is_err());
        assert!(XmlElement::parse(b"<A/><A/>").is_err());
        assert!(XmlElement::parse(b"<A>1</A>trailing").is_err());
    }

    #[test]
    fn test_should_allow_whitespace_and_comments_after_root() {
        let root = XmlElement::parse(b"<A>1</A>\r\n<!-- done -->\n").expect("ok");
        assert_eq!(root.text, "1");
    }
}
