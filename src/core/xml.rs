//! Owned XML element tree with namespace-agnostic lookups.
//!
//! Fiscal documents exist with and without default namespaces, and with
//! prefixed elements in signatures and events. Every lookup here compares
//! only the local part of an element name, so `nfe:det`, `{uri}det` and
//! `det` all match `"det"`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::AuditError;

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

/// Local part of a qualified name: the text after the last `:` or `}`.
pub fn local_name(qualified: &str) -> &str {
    match qualified.rfind([':', '}']) {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    }
}

/// Text of the first element named `tag` at or below `node`, in document order.
///
/// Returns `""` when `node` is `None`, when nothing matches, or when the
/// match carries no text.
pub fn tag_text(tag: &str, node: Option<&XmlNode>) -> String {
    node.and_then(|n| n.iter().find(|e| e.local_name() == tag))
        .map(|e| e.text.clone())
        .unwrap_or_default()
}

impl XmlNode {
    /// Create a bare element (mostly useful in tests).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a complete document and return its root element.
    pub fn parse(xml: &str) -> Result<Self, AuditError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(AuditError::Xml("multiple root elements".into()));
                    }
                    stack.push(Self::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_start(e)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::End(_)) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| AuditError::Xml("unmatched end tag".into()))?;
                    attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| AuditError::Xml(format!("bad text content: {e}")))?;
                    push_text(&mut stack, &text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(&mut stack, &text)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AuditError::Xml(format!(
                        "parse error at byte {}: {e}",
                        reader.error_position()
                    )));
                }
                // declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(AuditError::Xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| AuditError::Xml("no root element".into()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self, AuditError> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| AuditError::Xml(format!("bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| AuditError::Xml(format!("bad attribute value: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// Qualified element name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Text preceding the first child element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Direct child elements.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local_name(k) == name)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first iterator over this element and all its descendants.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    /// First descendant (excluding `self`) with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.iter().skip(1).find(|e| e.local_name() == name)
    }

    /// All descendants (excluding `self`) with the given local name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.iter().skip(1).filter(move |e| e.local_name() == name)
    }

    /// Append a child element (builder style, mostly for tests).
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element text (builder style, mostly for tests).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute (builder style, mostly for tests).
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Pre-order traversal over an [`XmlNode`] subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), AuditError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_some() {
        Err(AuditError::Xml("multiple root elements".into()))
    } else {
        *root = Some(node);
        Ok(())
    }
}

fn push_text(stack: &mut [XmlNode], text: &str) -> Result<(), AuditError> {
    match stack.last_mut() {
        // only text before the first child counts as the element's own text
        Some(node) if node.children.is_empty() => {
            node.text.push_str(text);
            Ok(())
        }
        Some(_) => Ok(()),
        None if text.trim().is_empty() => Ok(()),
        None => Err(AuditError::Xml("text outside the root element".into())),
    }
}
