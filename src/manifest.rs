//! # Android Manifest Document Model
//!
//! A small ordered document model over `quick-xml` for reading and
//! rewriting `AndroidManifest.xml`. The reconciler needs ordered element
//! children (metadata entries keep their position), preserved attributes
//! with their namespace prefixes, and preserved comments; it does not need
//! namespaces resolved, DTDs, or streaming.
//!
//! Parsing trims inter-element whitespace; serialization re-indents with
//! two spaces, so a rewritten manifest is stable across repeated runs.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

fn xml_error(message: impl std::fmt::Display) -> Error {
    Error::Xml {
        message: message.to_string(),
    }
}

/// One node of a parsed document: an element, a text run, or a comment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An XML element: qualified name, attributes in document order, children
/// in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The value of the attribute with the given qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one in place or appending.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Child elements with the given name, in document order.
    pub fn child_elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Mutable variant of [`Element::child_elements`].
    pub fn child_elements_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.children.iter_mut().filter_map(move |node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Append a child element.
    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }
}

/// A parsed XML document with a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse a document from its text.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, Node::Element(element))?;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| xml_error("unbalanced end tag"))?;
                    attach(&mut stack, &mut root, Node::Element(element))?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(xml_error)?.into_owned();
                    if !text.is_empty() {
                        attach(&mut stack, &mut root, Node::Text(text))?;
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    attach(&mut stack, &mut root, Node::Text(text))?;
                }
                Ok(Event::Comment(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    attach(&mut stack, &mut root, Node::Comment(text))?;
                }
                Ok(Event::Eof) => break,
                // Declarations, processing instructions, doctypes
                Ok(_) => {}
                Err(e) => return Err(xml_error(e)),
            }
        }

        if !stack.is_empty() {
            return Err(xml_error("unclosed element at end of document"));
        }
        let root = root.ok_or_else(|| xml_error("document has no root element"))?;
        Ok(Self { root })
    }

    /// Serialize back to XML with a declaration and two-space indentation.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_error)?;
        write_element(&mut writer, &self.root)?;

        let mut out = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
        out.push('\n');
        Ok(out)
    }
}

/// Attach a completed node to its parent, or make it the document root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Node) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match node {
        Node::Element(element) => {
            if root.is_some() {
                return Err(xml_error("document has more than one root element"));
            }
            *root = Some(element);
        }
        // Stray top-level text or comments carry no information we keep.
        Node::Text(_) | Node::Comment(_) => {}
    }
    Ok(())
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_error)?,
            Node::Comment(text) => writer
                .write_event(Event::Comment(BytesText::new(text)))
                .map_err(xml_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)?;
    Ok(())
}
