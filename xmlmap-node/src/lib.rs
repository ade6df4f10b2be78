//! An owned XML element tree that the structured decoder can read.
//!
//! [`Element::parse`] builds a tree with the same push tokenizer the
//! streaming builder uses; [`from_str`] and [`from_element`] decode model
//! types out of it.

mod error;
mod fragment;
mod parser;

use std::collections::HashMap;

pub use error::NodeError;
pub use parser::{from_element, from_str};

/// Content that can appear inside an XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Text content, with references already resolved.
    Text(String),
    /// A CDATA section, unescaped.
    CData(Vec<u8>),
    /// A child element.
    Element(Element),
}

impl Content {
    /// Returns `Some(&str)` if this is text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the bytes if this is a CDATA section.
    pub fn as_cdata(&self) -> Option<&[u8]> {
        match self {
            Content::CData(d) => Some(d),
            _ => None,
        }
    }

    /// Returns `Some(&Element)` if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Content::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An XML element with any tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// The element's tag name.
    pub tag: String,

    /// All attributes as key-value pairs.
    pub attrs: HashMap<String, String>,

    /// Child content in document order.
    pub children: Vec<Content>,
}

impl Element {
    /// Create a new element with just a tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Parse a document into its root element.
    pub fn parse(xml: &str) -> Result<Self, NodeError> {
        parser::parse_bytes(xml.as_bytes())
    }

    /// Parse a document from raw bytes into its root element.
    pub fn parse_bytes(xml: &[u8]) -> Result<Self, NodeError> {
        parser::parse_bytes(xml)
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Add text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    /// Add a CDATA section.
    pub fn with_cdata(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.children.push(Content::CData(data.into()));
        self
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Iterate over child elements (skipping text and CDATA).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| c.as_element())
    }

    /// Get the combined text content of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for child in &self.children {
            match child {
                Content::Text(t) => result.push_str(t),
                Content::CData(d) => result.push_str(&String::from_utf8_lossy(d)),
                Content::Element(e) => result.push_str(&e.text_content()),
            }
        }
        result
    }
}

impl From<Element> for Content {
    fn from(e: Element) -> Self {
        Content::Element(e)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn text_content_reads_cdata_and_descendants() {
        let elem = Element::new("item")
            .with_attr("guid", "ep-1")
            .with_text("Intro: ")
            .with_cdata(b"<i>raw</i>".to_vec())
            .with_child(Element::new("note").with_text(" end"));

        assert_eq!(elem.get_attr("guid"), Some("ep-1"));
        assert_eq!(elem.children[1].as_cdata(), Some(&b"<i>raw</i>"[..]));
        assert_eq!(elem.child_elements().count(), 1);
        assert_eq!(elem.text_content(), "Intro: <i>raw</i> end");
    }

    #[test]
    fn parse_skips_namespace_declarations_and_unescapes_attributes() {
        let xml = r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd" version="2.0"><itunes:image href="a.png?x=1&amp;y=2"/></rss>"#;
        let elem = Element::parse(xml).unwrap();

        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.get_attr("version"), Some("2.0"));

        let image = elem.child_elements().next().unwrap();
        assert_eq!(image.tag, "itunes:image");
        assert_eq!(image.get_attr("href"), Some("a.png?x=1&y=2"));
        assert!(image.children.is_empty());
    }

    #[test]
    fn parse_mixed_content_keeps_significant_runs() {
        let elem = Element::parse("<p>Fish &amp; chips <b>now</b>\n  </p>").unwrap();

        assert_eq!(elem.children.len(), 2);
        assert_eq!(elem.children[0].as_text(), Some("Fish & chips "));
        assert_eq!(elem.children[1].as_element().unwrap().tag, "b");
        assert_eq!(elem.text_content(), "Fish & chips now");
    }

    #[test]
    fn parse_drops_whitespace_only_text() {
        let elem = Element::parse("<a>\n  <b/>\n  <c> x </c>\n</a>").unwrap();
        assert_eq!(elem.children.len(), 2);
        let c = elem.child_elements().nth(1).unwrap();
        assert_eq!(c.children, vec![Content::Text(" x ".into())]);
    }

    #[test]
    fn parse_keeps_references_in_one_text_node() {
        let elem = Element::parse("<a>x &amp; &lt; y</a>").unwrap();
        assert_eq!(elem.children, vec![Content::Text("x & < y".into())]);
    }

    #[test]
    fn parse_cdata() {
        let elem = Element::parse("<a><![CDATA[<b>bold</b>]]></a>").unwrap();
        assert_eq!(elem.children[0].as_cdata(), Some(&b"<b>bold</b>"[..]));
    }
}
