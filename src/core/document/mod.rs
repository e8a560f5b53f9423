use crate::core::error::ExtractError;
use encoding_rs::{Encoding, WINDOWS_1252};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

/// An immutable workflow document: the parsed element tree of one XML export.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: XmlNode,
}

/// One element of the parsed tree. Attribute order and child order follow the
/// document. XML declarations, DOCTYPE, comments, and processing instructions
/// are dropped during parsing.
#[derive(Debug, Clone)]
pub struct XmlNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a workflow export from disk. Bytes are decoded per the prolog's
    /// declared encoding; exports without a declaration are read as UTF-8
    /// with a Windows-1252 fallback.
    pub fn parse_file(path: &Path) -> Result<XmlDocument, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&decode_export(&bytes))
    }

    /// Parse a workflow export held in memory.
    pub fn parse_str(xml: &str) -> Result<XmlDocument, ExtractError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    stack.push(node_from_start(&e)?);
                }
                Event::Empty(e) => {
                    let node = node_from_start(&e)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| ExtractError::malformed("closing tag without opener"))?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| ExtractError::malformed(err.to_string()))?;
                        parent.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(ExtractError::malformed("unclosed element at end of input"));
        }
        let root = root.ok_or_else(|| ExtractError::malformed("document has no root element"))?;
        Ok(XmlDocument { root })
    }

    pub fn root(&self) -> &XmlNode {
        &self.root
    }
}

fn node_from_start(e: &BytesStart<'_>) -> Result<XmlNode, ExtractError> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ExtractError::malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| ExtractError::malformed(err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlNode {
        tag,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut Vec<XmlNode>,
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ExtractError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(ExtractError::malformed("more than one root element"));
    }
    *root = Some(node);
    Ok(())
}

/// Decode raw export bytes to text. Repository exports declare their encoding
/// in the XML prolog, typically windows-1252.
fn decode_export(bytes: &[u8]) -> Cow<'_, str> {
    if let Some(encoding) = declared_encoding(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode(bytes).0,
    }
}

/// Encoding named by the XML declaration, when present and recognized.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let declaration = &bytes[..bytes.windows(2).position(|pair| pair == b"?>")?];
    let label_start = declaration.windows(8).position(|word| word == b"encoding")? + 8;
    let rest = &declaration[label_start..];
    let quote_at = rest.iter().position(|&byte| byte == b'"' || byte == b'\'')?;
    let quote = rest[quote_at];
    let rest = &rest[quote_at + 1..];
    let label = &rest[..rest.iter().position(|&byte| byte == quote)?];
    Encoding::for_label(label)
}

impl XmlNode {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Exact, case-sensitive attribute lookup. Absent attributes are `None`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in declaration order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Concatenated character data directly inside this element, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Direct children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// All strict descendants with the given tag, preorder (document order).
    pub fn descendants<'a>(&'a self, tag: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.tag == tag {
                found.push(node);
            }
            pending.extend(node.children.iter().rev());
        }
        found
    }

    /// Serialize this element and its subtree back to indented XML.
    pub fn to_xml(&self) -> String {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        // The sink is an in-memory buffer; writes cannot fail.
        match self.write_subtree(&mut writer) {
            Ok(()) => String::from_utf8(writer.into_inner()).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    fn write_subtree(&self, writer: &mut Writer<Vec<u8>>) -> io::Result<()> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attrs {
            start.push_attribute((name.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_subtree(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.tag.as_str())))?;
        Ok(())
    }
}
