//! Error types for streamed parsing.

use std::fmt;
use std::io;

/// An error reported by the tokenizer.
///
/// Tokenizer errors are delivered to [`SaxHandler::parse_error`] rather than
/// returned, so parsing can carry on past them.
///
/// [`SaxHandler::parse_error`]: crate::SaxHandler::parse_error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    /// Malformed markup.
    Syntax(String),
    /// A name or value was not valid UTF-8.
    InvalidUtf8(std::str::Utf8Error),
    /// The input ended with elements still open.
    UnexpectedEof {
        /// How many elements were left open.
        open_elements: usize,
    },
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::Syntax(msg) => write!(f, "XML syntax error: {msg}"),
            TokenizerError::InvalidUtf8(e) => write!(f, "invalid UTF-8 in XML: {e}"),
            TokenizerError::UnexpectedEof { open_elements } => write!(
                f,
                "unexpected end of XML with {open_elements} element(s) still open"
            ),
        }
    }
}

impl std::error::Error for TokenizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenizerError::InvalidUtf8(e) => Some(e),
            _ => None,
        }
    }
}

/// Error type for a complete streamed parse.
#[derive(Debug)]
pub enum StreamError {
    /// The byte source failed.
    Io(io::Error),

    /// The builder was configured to abort on tokenizer errors and saw one.
    Aborted(TokenizerError),

    /// The document ended without ever opening the root element.
    Incomplete {
        /// The root tag that was never seen.
        root_tag: String,
    },
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Io(e) => write!(f, "I/O error: {e}"),
            StreamError::Aborted(e) => write!(f, "parse aborted: {e}"),
            StreamError::Incomplete { root_tag } => {
                write!(f, "document ended before <{root_tag}> was opened")
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::Aborted(e) => Some(e),
            StreamError::Incomplete { .. } => None,
        }
    }
}
