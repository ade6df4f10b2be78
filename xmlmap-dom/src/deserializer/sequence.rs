//! Sequential container over a list of sibling fragments.

use super::{Decode, FragmentDecoder, KeyedContainer};
use crate::error::DecodeError;
use crate::fragment::Fragment;
use crate::scalar::Scalar;

/// Decodes one composite element per fragment, in order.
///
/// Only composite elements are supported; scalars, nils and nested containers
/// inside a sequence fail with [`DecodeError::UnsupportedOperation`].
pub struct SequenceContainer<'d, 'f, F> {
    decoder: &'d FragmentDecoder<'f, F>,
    current_index: usize,
}

impl<'d, 'f, F: Fragment> SequenceContainer<'d, 'f, F> {
    pub(crate) fn new(decoder: &'d FragmentDecoder<'f, F>) -> Self {
        Self {
            decoder,
            current_index: 0,
        }
    }

    /// Keys and sequence indices walked to reach this container.
    pub fn coding_path(&self) -> &[String] {
        self.decoder.coding_path()
    }

    /// Number of elements in the sequence.
    pub fn count(&self) -> usize {
        self.decoder.fragments().len()
    }

    /// Index of the next element to decode.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether every element has been decoded.
    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.count()
    }

    /// Decode the next element from a decoder scoped to its fragment alone.
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let segment = format!("[{}]", self.current_index);
        let Some(fragment) = self.decoder.fragments().get(self.current_index).copied() else {
            return Err(DecodeError::MissingValue {
                path: self.decoder.path_string(),
                key: segment,
            });
        };

        let element = FragmentDecoder::scoped(vec![fragment], self.decoder.child_path(segment))?;
        let value = T::decode(&element)?;
        self.current_index += 1;
        Ok(value)
    }

    /// Always fails: sequence elements must be composite.
    pub fn decode_scalar<T: Scalar>(&mut self) -> Result<T, DecodeError> {
        Err(self.decoder.unsupported("scalar element inside a sequence"))
    }

    /// Always fails: sequence elements must be composite.
    pub fn decode_nil(&mut self) -> Result<bool, DecodeError> {
        Err(self.decoder.unsupported("nil element inside a sequence"))
    }

    /// Always fails: nested containers are not supported.
    pub fn nested_keyed(&mut self) -> Result<KeyedContainer<'d, 'f, F>, DecodeError> {
        Err(self.decoder.unsupported("nested keyed container"))
    }

    /// Always fails: nested containers are not supported.
    pub fn nested_sequence(&mut self) -> Result<SequenceContainer<'d, 'f, F>, DecodeError> {
        Err(self.decoder.unsupported("nested sequence container"))
    }

    /// Always fails: super decoders are not supported.
    pub fn super_decoder(&mut self) -> Result<FragmentDecoder<'f, F>, DecodeError> {
        Err(self.decoder.unsupported("super decoder"))
    }
}
