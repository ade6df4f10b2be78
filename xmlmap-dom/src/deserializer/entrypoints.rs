//! Main entry points.
//!
//! These are separated from the container implementations for easy auditing.

use super::{Decode, FragmentDecoder};
use crate::error::DecodeError;
use crate::fragment::Fragment;

/// Decode a `T` from a single fragment.
pub fn from_fragment<T, F>(fragment: &F) -> Result<T, DecodeError>
where
    T: Decode,
    F: Fragment,
{
    from_fragments(vec![fragment])
}

/// Decode a `T` from an ordered list of sibling fragments.
///
/// Fails with [`DecodeError::EmptyFragmentSet`] if the list is empty.
pub fn from_fragments<T, F>(fragments: Vec<&F>) -> Result<T, DecodeError>
where
    T: Decode,
    F: Fragment,
{
    let decoder = FragmentDecoder::new(fragments)?;
    T::decode(&decoder)
}
