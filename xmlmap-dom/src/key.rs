//! The key grammar used to address values inside a fragment.
//!
//! A key names one scalar relative to the fragment being decoded:
//!
//! - `"tag"` → text content of the child element `<tag>`
//! - `"tag@"` → CDATA content of the child element `<tag>`
//! - `"tag@attribute"` → attribute `attribute` of the child element `<tag>`
//! - `"@attribute"` → attribute `attribute` of the fragment itself
//!
//! Only the first `@` is significant. The CDATA form requires that first `@`
//! to also be the last character of the key.

use std::fmt;

/// A parsed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExpr<'a> {
    /// `tag` - text of a named child.
    ChildText(&'a str),
    /// `tag@` - CDATA of a named child.
    ChildCdata(&'a str),
    /// `tag@attribute` - attribute of a named child.
    ChildAttribute {
        /// The child element's tag.
        tag: &'a str,
        /// The attribute to read on that child.
        attribute: &'a str,
    },
    /// `@attribute` - attribute of the fragment being decoded.
    OwnAttribute(&'a str),
}

impl<'a> KeyExpr<'a> {
    /// Parse a key string. Parsing never fails; every string is a valid key.
    pub fn parse(key: &'a str) -> Self {
        let Some(index) = key.find('@') else {
            return KeyExpr::ChildText(key);
        };

        if index == 0 {
            return KeyExpr::OwnAttribute(&key[1..]);
        }

        let (tag, rest) = (&key[..index], &key[index + 1..]);
        if rest.is_empty() {
            KeyExpr::ChildCdata(tag)
        } else {
            KeyExpr::ChildAttribute {
                tag,
                attribute: rest,
            }
        }
    }

    /// The child tag this key reaches into, if any.
    pub fn child_tag(&self) -> Option<&'a str> {
        match *self {
            KeyExpr::ChildText(tag) | KeyExpr::ChildCdata(tag) => Some(tag),
            KeyExpr::ChildAttribute { tag, .. } => Some(tag),
            KeyExpr::OwnAttribute(_) => None,
        }
    }
}

impl fmt::Display for KeyExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyExpr::ChildText(tag) => write!(f, "{tag}"),
            KeyExpr::ChildCdata(tag) => write!(f, "{tag}@"),
            KeyExpr::ChildAttribute { tag, attribute } => write!(f, "{tag}@{attribute}"),
            KeyExpr::OwnAttribute(attribute) => write!(f, "@{attribute}"),
        }
    }
}
