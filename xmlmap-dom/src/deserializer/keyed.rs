//! Key-addressed container over a single fragment.

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::{Decode, FragmentDecoder, SequenceContainer};
use crate::error::DecodeError;
use crate::fragment::Fragment;
use crate::key::KeyExpr;
use crate::scalar::Scalar;
use crate::{trace, warning};

/// Reads values out of one fragment by key.
///
/// See [`crate::key`] for the key grammar. Every lookup comes in a required
/// flavour, which reports absence as [`DecodeError::MissingValue`], and an
/// `_if_present` flavour, which returns `None` for absent or unparsable
/// values.
pub struct KeyedContainer<'d, 'f, F> {
    decoder: &'d FragmentDecoder<'f, F>,
    fragment: &'f F,
    all_keys: BTreeSet<&'f str>,
}

impl<'d, 'f, F: Fragment> KeyedContainer<'d, 'f, F> {
    pub(crate) fn new(decoder: &'d FragmentDecoder<'f, F>) -> Result<Self, DecodeError> {
        let fragment = decoder.fragment()?;
        trace!(tag = fragment.tag(), "keyed container");
        Ok(Self {
            decoder,
            fragment,
            all_keys: fragment.child_names(),
        })
    }

    /// Keys and sequence indices walked to reach this container.
    pub fn coding_path(&self) -> &[String] {
        self.decoder.coding_path()
    }

    /// Tags of every child element present on the fragment.
    pub fn all_keys(&self) -> impl Iterator<Item = &'f str> + '_ {
        self.all_keys.iter().copied()
    }

    /// Whether a child element with this tag exists.
    pub fn contains(&self, key: &str) -> bool {
        self.all_keys.contains(key)
    }

    /// Whether `key` resolves to nothing.
    pub fn decode_nil(&self, key: &str) -> Result<bool, DecodeError> {
        Ok(self.decoder.value_if_present(key)?.is_none())
    }

    /// Decode a required scalar.
    pub fn decode<T: Scalar>(&self, key: &str) -> Result<T, DecodeError> {
        let raw = self
            .decoder
            .value_if_present(key)?
            .ok_or_else(|| self.missing(key))?;
        T::from_text(&raw).ok_or_else(|| DecodeError::CoercionFailure {
            path: self.decoder.path_string(),
            key: key.to_owned(),
            expected: T::EXPECTED,
            value: raw.into_owned(),
        })
    }

    /// Decode an optional scalar. Unparsable values are logged and treated as
    /// absent.
    pub fn decode_if_present<T: Scalar>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        let Some(raw) = self.decoder.value_if_present(key)? else {
            return Ok(None);
        };
        let value = T::from_text(&raw);
        if value.is_none() {
            warning!(key, value = %raw, expected = T::EXPECTED, "unparsable value treated as absent");
        }
        Ok(value)
    }

    /// Decode the CDATA of a child. `key` must have the `tag@` form.
    pub fn decode_cdata(&self, key: &str) -> Result<Vec<u8>, DecodeError> {
        self.decode_cdata_if_present(key)?
            .ok_or_else(|| self.missing(key))
    }

    /// Decode the CDATA of a child, if it has any. `key` must have the `tag@`
    /// form.
    pub fn decode_cdata_if_present(&self, key: &str) -> Result<Option<Vec<u8>>, DecodeError> {
        let KeyExpr::ChildCdata(tag) = KeyExpr::parse(key) else {
            return Err(self
                .decoder
                .unsupported("CDATA lookup through a key without a single trailing `@`"));
        };
        Ok(self
            .fragment
            .child_named(tag)
            .and_then(|child| child.cdata())
            .map(Cow::into_owned))
    }

    /// Decode a composite value from every child named `key`.
    pub fn decode_nested<T: Decode>(&self, key: &str) -> Result<T, DecodeError> {
        self.decode_nested_if_present(key)?
            .ok_or_else(|| self.missing(key))
    }

    /// Decode a composite value from every child named `key`, or `None` if
    /// there are no such children.
    pub fn decode_nested_if_present<T: Decode>(
        &self,
        key: &str,
    ) -> Result<Option<T>, DecodeError> {
        // Attribute and CDATA keys never name a child element.
        let KeyExpr::ChildText(tag) = KeyExpr::parse(key) else {
            return Ok(None);
        };

        let children = self.fragment.children_named(tag);
        if children.is_empty() {
            return Ok(None);
        }

        #[cfg(feature = "tracing")]
        {
            use owo_colors::OwoColorize;
            let target = std::any::type_name::<T>();
            trace!(into = %target.cyan(), tag = %tag.dimmed(), count = children.len());
        }

        let nested = FragmentDecoder::scoped(children, self.decoder.child_path(tag))?;
        T::decode(&nested).map(Some)
    }

    /// Always fails: nested containers are not supported.
    pub fn nested_keyed(&self, _key: &str) -> Result<KeyedContainer<'d, 'f, F>, DecodeError> {
        Err(self.decoder.unsupported("nested keyed container"))
    }

    /// Always fails: nested containers are not supported.
    pub fn nested_sequence(
        &self,
        _key: &str,
    ) -> Result<SequenceContainer<'d, 'f, F>, DecodeError> {
        Err(self.decoder.unsupported("nested sequence container"))
    }

    /// Always fails: super decoders are not supported.
    pub fn super_decoder(&self) -> Result<FragmentDecoder<'f, F>, DecodeError> {
        Err(self.decoder.unsupported("super decoder"))
    }

    /// Always fails: super decoders are not supported.
    pub fn super_decoder_for_key(&self, _key: &str) -> Result<FragmentDecoder<'f, F>, DecodeError> {
        Err(self.decoder.unsupported("super decoder"))
    }

    fn missing(&self, key: &str) -> DecodeError {
        DecodeError::MissingValue {
            path: self.decoder.path_string(),
            key: key.to_owned(),
        }
    }
}
