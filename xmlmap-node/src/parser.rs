//! Tree construction from tokenizer events, and the decode entry points.

use std::collections::HashMap;
use std::mem;

use xmlmap_dom::{Decode, from_fragment};
use xmlmap_stream::{PushTokenizer, SaxHandler, TokenizerError};

use crate::{Content, Element, NodeError};

/// Parse `xml` and decode its root element into a `T`.
pub fn from_str<T: Decode>(xml: &str) -> Result<T, NodeError> {
    let root = Element::parse(xml)?;
    from_element(&root)
}

/// Decode a `T` from an element tree.
pub fn from_element<T: Decode>(element: &Element) -> Result<T, NodeError> {
    Ok(from_fragment(element)?)
}

pub(crate) fn parse_bytes(xml: &[u8]) -> Result<Element, NodeError> {
    let mut builder = TreeBuilder::default();
    let mut tokenizer = PushTokenizer::new();
    tokenizer.feed(xml, &mut builder);
    tokenizer.finish(&mut builder);
    builder.finish()
}

/// Collects tokenizer events into an [`Element`] tree.
///
/// Adjacent text runs are merged into one node; runs that turn out to be
/// whitespace only are dropped. The first error wins and stops construction.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
    text: String,
    error: Option<NodeError>,
}

impl TreeBuilder {
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = mem::take(&mut self.text);
        if text.chars().all(char::is_whitespace) {
            return;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Content::Text(text));
        }
    }

    fn fail(&mut self, error: NodeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn finish(self) -> Result<Element, NodeError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(NodeError::Tokenizer(TokenizerError::UnexpectedEof {
                open_elements: self.stack.len(),
            }));
        }
        self.root.ok_or(NodeError::NoRoot)
    }
}

impl SaxHandler for TreeBuilder {
    fn start_element(&mut self, name: &str, attributes: HashMap<String, String>) {
        if self.error.is_some() {
            return;
        }
        self.flush_text();
        if self.stack.is_empty() && self.root.is_some() {
            self.fail(NodeError::MultipleRoots { tag: name.into() });
            return;
        }
        self.stack.push(Element {
            tag: name.into(),
            attrs: attributes,
            children: Vec::new(),
        });
    }

    fn characters(&mut self, text: &str) {
        if self.error.is_none() && !self.stack.is_empty() {
            self.text.push_str(text);
        }
    }

    fn cdata(&mut self, data: &[u8]) {
        if self.error.is_some() {
            return;
        }
        self.flush_text();
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Content::CData(data.to_vec()));
        }
    }

    fn end_element(&mut self, name: &str) {
        if self.error.is_some() {
            return;
        }
        self.flush_text();
        let Some(element) = self.stack.pop() else {
            self.fail(NodeError::Unbalanced {
                expected: String::new(),
                found: name.into(),
            });
            return;
        };
        if element.tag != name {
            self.fail(NodeError::Unbalanced {
                expected: element.tag,
                found: name.into(),
            });
            return;
        }
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(Content::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn end_document(&mut self) {}

    fn parse_error(&mut self, error: TokenizerError) {
        self.fail(NodeError::Tokenizer(error));
    }
}
