//! Error type for building and decoding element trees.

use std::fmt;

use xmlmap_dom::DecodeError;
use xmlmap_stream::TokenizerError;

/// Error returned while building or decoding an [`Element`](crate::Element)
/// tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The tokenizer rejected the input.
    Tokenizer(TokenizerError),
    /// An end tag did not match the open element.
    Unbalanced {
        /// The element that was open.
        expected: String,
        /// The end tag that was found.
        found: String,
    },
    /// A second top-level element followed the root.
    MultipleRoots {
        /// Tag of the extra element.
        tag: String,
    },
    /// The document contained no element.
    NoRoot,
    /// The tree did not decode into the requested type.
    Decode(DecodeError),
}

impl From<DecodeError> for NodeError {
    fn from(e: DecodeError) -> Self {
        NodeError::Decode(e)
    }
}

impl From<TokenizerError> for NodeError {
    fn from(e: TokenizerError) -> Self {
        NodeError::Tokenizer(e)
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Tokenizer(e) => write!(f, "{e}"),
            NodeError::Unbalanced { expected, found } => {
                write!(f, "expected </{expected}>, found </{found}>")
            }
            NodeError::MultipleRoots { tag } => {
                write!(f, "unexpected second root element <{tag}>")
            }
            NodeError::NoRoot => write!(f, "document has no root element"),
            NodeError::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NodeError::Tokenizer(e) => Some(e),
            NodeError::Decode(e) => Some(e),
            _ => None,
        }
    }
}
