//! Error types for fragment decoding.

use std::fmt;

/// Error type for fragment decoding.
///
/// Every variant carries the coding path at which it was raised: the keys and
/// sequence indices walked from the top-level decoder, joined with `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A decoder was constructed over an empty fragment list.
    EmptyFragmentSet {
        /// Where the decoder would have been scoped.
        path: String,
    },

    /// A singular value was requested while several fragments were in scope.
    AmbiguousFragment {
        /// Where the lookup happened.
        path: String,
        /// How many fragments were in scope.
        count: usize,
    },

    /// A required value was absent.
    MissingValue {
        /// Where the lookup happened.
        path: String,
        /// The key that resolved to nothing.
        key: String,
    },

    /// A value was present but could not be parsed into the requested type.
    CoercionFailure {
        /// Where the lookup happened.
        path: String,
        /// The key whose value failed to parse.
        key: String,
        /// Name of the requested type.
        expected: &'static str,
        /// The raw text that was rejected.
        value: String,
    },

    /// A decode path that is deliberately not implemented.
    ///
    /// Unlike the other variants this one signals a bug in the model's decode
    /// implementation, not in the document.
    UnsupportedOperation {
        /// Where the operation was attempted.
        path: String,
        /// What was attempted.
        operation: &'static str,
    },
}

impl DecodeError {
    /// Whether this error comes from a decode path the model author must not
    /// exercise, as opposed to a problem with the input document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::UnsupportedOperation { .. })
    }

    /// The coding path at which the error was raised.
    pub fn path(&self) -> &str {
        match self {
            DecodeError::EmptyFragmentSet { path }
            | DecodeError::AmbiguousFragment { path, .. }
            | DecodeError::MissingValue { path, .. }
            | DecodeError::CoercionFailure { path, .. }
            | DecodeError::UnsupportedOperation { path, .. } => path,
        }
    }
}

struct DisplayPath<'a>(&'a str);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFragmentSet { path } => {
                write!(f, "decoder at {} was given no XML elements", DisplayPath(path))
            }
            Self::AmbiguousFragment { path, count } => write!(
                f,
                "expected a single element at {} but found {count}",
                DisplayPath(path)
            ),
            Self::MissingValue { path, key } => {
                write!(f, "no value for key `{key}` at {}", DisplayPath(path))
            }
            Self::CoercionFailure {
                path,
                key,
                expected,
                value,
            } => write!(
                f,
                "could not decode `{value}` as {expected} for key `{key}` at {}",
                DisplayPath(path)
            ),
            Self::UnsupportedOperation { path, operation } => {
                write!(f, "unsupported: {operation} at {}", DisplayPath(path))
            }
        }
    }
}

impl std::error::Error for DecodeError {}
