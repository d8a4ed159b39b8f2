//! XML reader building an owned element tree from quick-xml events

use crate::{ConvertError, Result};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::encoding::{decode, detect_encoding};
use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::{Decoder, Reader};

/// A node in the element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An attribute on an element, value already unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// An XML element with its attributes and ordered child nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name, prefix included (no namespace resolution)
    pub name: String,

    pub attributes: Vec<Attribute>,

    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Direct child elements, in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Direct child elements with the given name, in document order
    pub fn elements_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        let name = name.to_string();
        self.elements().filter(move |e| e.name == name)
    }

    /// First direct child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of all descendants, in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    fn drop_insignificant_whitespace(&mut self) {
        self.children.retain(|node| match node {
            Node::Text(t) => !is_xml_whitespace(t),
            Node::Element(_) => true,
        });
    }
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// XML line-end handling: `\r\n` and lone `\r` both become `\n`
fn normalize_line_ends(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

fn malformed(msg: impl Into<String>) -> ConvertError {
    ConvertError::MalformedInput(msg.into())
}

/// Decode raw manifest bytes to text.
///
/// A byte order mark wins, then the `encoding` of the XML declaration;
/// input with neither is UTF-8. Bytes invalid for the chosen encoding are
/// malformed input.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let (detected, bom_len) = detect_encoding(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];

    let encoding = if bom_len == 0 && detected.is_ascii_compatible() {
        declared_encoding(body)?
            .filter(|e| e.is_ascii_compatible())
            .unwrap_or(UTF_8)
    } else {
        detected
    };

    tracing::trace!(encoding = encoding.name(), "Decoding manifest");

    decode(body, encoding)
        .map(|text| text.into_owned())
        .map_err(|err| malformed(format!("Error decoding manifest: {}", err)))
}

/// Encoding named by a leading `<?xml ... encoding="..."?>`
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let mut reader = Reader::from_reader(bytes);
    let label = match reader.read_event() {
        Ok(Event::Decl(decl)) => match decl.encoding() {
            Some(Ok(label)) => label.into_owned(),
            Some(Err(err)) => {
                return Err(malformed(format!("Invalid XML declaration: {}", err)));
            }
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    Encoding::for_label(&label).map(Some).ok_or_else(|| {
        malformed(format!(
            "Unsupported encoding: {}",
            String::from_utf8_lossy(&label)
        ))
    })
}

/// Parse XML content into its root element
pub fn parse_tree(xml: &str) -> Result<Element> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("document has more than one root element"));
                }
                stack.push(parse_start(e, reader.decoder())?);
            }
            Ok(Event::End(_)) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
                element.drop_insignificant_whitespace();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(ref e)) => {
                let raw = std::str::from_utf8(&**e)
                    .map_err(|err| malformed(format!("Invalid UTF-8 in text: {}", err)))?;
                let text = unescape(raw)
                    .map_err(|err| malformed(format!("Invalid escape in text: {}", err)))?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(ref e)) => {
                let text = std::str::from_utf8(&**e)
                    .map_err(|err| malformed(format!("Invalid UTF-8 in CDATA: {}", err)))?;
                append_text(&mut stack, text)?;
            }
            Ok(Event::GeneralRef(ref e)) => {
                let text = resolve_reference(e)?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(malformed(format!(
                    "Error parsing manifest XML at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!(
            "unexpected end of input: <{}> is not closed",
            open.name
        )));
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.push_text(&normalize_line_ends(text));
            Ok(())
        }
        None if is_xml_whitespace(text) => Ok(()),
        None => Err(malformed("text content outside the root element")),
    }
}

fn resolve_reference(e: &BytesRef<'_>) -> Result<String> {
    let char_ref = e
        .resolve_char_ref()
        .map_err(|err| malformed(format!("Invalid character reference: {}", err)))?;
    if let Some(ch) = char_ref {
        return Ok(ch.to_string());
    }

    let name = std::str::from_utf8(&**e)
        .map_err(|err| malformed(format!("Invalid UTF-8 in entity name: {}", err)))?;
    resolve_xml_entity(name)
        .map(str::to_string)
        .ok_or_else(|| malformed(format!("Undefined entity: &{};", name)))
}

fn parse_start(e: &BytesStart<'_>, decoder: Decoder) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| malformed(format!("Invalid UTF-8 in element name: {}", err)))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(format!("Invalid attribute: {}", err)))?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| malformed(format!("Invalid attribute value: {}", err)))?;
        attributes.push(Attribute {
            key: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}
