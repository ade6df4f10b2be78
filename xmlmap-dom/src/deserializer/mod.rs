//! Tree-based decoder for DOM fragments.

use std::borrow::Cow;

use crate::error::DecodeError;
use crate::fragment::Fragment;
use crate::key::KeyExpr;

mod entrypoints;
mod keyed;
mod sequence;

pub use entrypoints::*;
pub use keyed::KeyedContainer;
pub use sequence::SequenceContainer;

/// A type that can be decoded from a [`FragmentDecoder`].
///
/// Composite model types implement this by asking the decoder for a
/// [`KeyedContainer`] and reading their fields by key. Collections are
/// decoded through a [`SequenceContainer`], one element per fragment.
pub trait Decode: Sized {
    /// Decode a value from the fragments in scope.
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError>;
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let mut sequence = decoder.sequence();
        let mut out = Vec::with_capacity(sequence.count());
        while !sequence.is_at_end() {
            out.push(sequence.decode::<T>()?);
        }
        Ok(out)
    }
}

/// Bare single-value decoding is not supported, so this type has no values.
///
/// It only exists as the success type of
/// [`FragmentDecoder::single_value`], which always fails.
#[derive(Debug)]
pub enum SingleValueContainer {}

/// Decoder scoped to an ordered, non-empty set of sibling fragments.
///
/// Scalar lookups require exactly one fragment in scope. Several fragments
/// only make sense when decoding a sequence.
pub struct FragmentDecoder<'f, F> {
    fragments: Vec<&'f F>,
    path: Vec<String>,
}

impl<'f, F: Fragment> FragmentDecoder<'f, F> {
    /// Create a top-level decoder. Fails with
    /// [`DecodeError::EmptyFragmentSet`] if `fragments` is empty.
    pub fn new(fragments: Vec<&'f F>) -> Result<Self, DecodeError> {
        Self::scoped(fragments, Vec::new())
    }

    pub(crate) fn scoped(fragments: Vec<&'f F>, path: Vec<String>) -> Result<Self, DecodeError> {
        if fragments.is_empty() {
            return Err(DecodeError::EmptyFragmentSet {
                path: join_path(&path),
            });
        }
        Ok(Self { fragments, path })
    }

    /// Decode a `T` from the fragments in scope.
    pub fn decode<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// The fragments in scope, in document order.
    pub fn fragments(&self) -> &[&'f F] {
        &self.fragments
    }

    /// Keys and sequence indices walked to reach this decoder.
    pub fn coding_path(&self) -> &[String] {
        &self.path
    }

    /// The sole fragment in scope.
    pub fn fragment(&self) -> Result<&'f F, DecodeError> {
        match self.fragments.as_slice() {
            [] => Err(DecodeError::EmptyFragmentSet {
                path: self.path_string(),
            }),
            [only] => Ok(*only),
            many => Err(DecodeError::AmbiguousFragment {
                path: self.path_string(),
                count: many.len(),
            }),
        }
    }

    /// Key-addressed access to the sole fragment in scope.
    pub fn keyed(&self) -> Result<KeyedContainer<'_, 'f, F>, DecodeError> {
        KeyedContainer::new(self)
    }

    /// Sequential access to every fragment in scope.
    pub fn sequence(&self) -> SequenceContainer<'_, 'f, F> {
        SequenceContainer::new(self)
    }

    /// Always fails: a fragment can only be read through keys or as a sequence.
    pub fn single_value(&self) -> Result<SingleValueContainer, DecodeError> {
        Err(self.unsupported("single-value container"))
    }

    /// Resolve `key` to a string against the sole fragment in scope.
    pub(crate) fn value_if_present(&self, key: &str) -> Result<Option<Cow<'f, str>>, DecodeError> {
        let fragment = self.fragment()?;
        let value = match KeyExpr::parse(key) {
            KeyExpr::OwnAttribute(name) => fragment.attribute_named(name).map(Cow::Borrowed),
            KeyExpr::ChildAttribute { tag, attribute } => fragment
                .child_named(tag)
                .and_then(|child| child.attribute_named(attribute))
                .map(Cow::Borrowed),
            // `tag@` names CDATA; as a string lookup it reads the empty
            // attribute name, which never exists.
            KeyExpr::ChildCdata(_) => None,
            KeyExpr::ChildText(tag) => fragment.child_named(tag).and_then(|child| child.text()),
        };
        Ok(value)
    }

    pub(crate) fn path_string(&self) -> String {
        join_path(&self.path)
    }

    pub(crate) fn child_path(&self, segment: impl Into<String>) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(segment.into());
        path
    }

    pub(crate) fn unsupported(&self, operation: &'static str) -> DecodeError {
        DecodeError::UnsupportedOperation {
            path: self.path_string(),
            operation,
        }
    }
}

/// Join path segments with `.`, attaching `[n]` index segments directly.
fn join_path(segments: &[String]) -> String {
    let mut out = String::new();
    for segment in segments {
        if !out.is_empty() && !segment.starts_with('[') {
            out.push('.');
        }
        out.push_str(segment);
    }
    out
}
