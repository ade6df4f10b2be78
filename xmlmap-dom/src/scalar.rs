//! Target types that can be read straight out of a key's text.

use http::Uri;

use crate::coerce::{self, Date};

/// A value decodable from the raw string a key resolves to.
///
/// Numbers and strings use their standard textual parsing. Booleans use the
/// prefix rule of [`coerce::parse_bool`], so they never fail. Dates and URIs
/// go through [`coerce::parse_date`] and [`coerce::parse_uri`].
pub trait Scalar: Sized {
    /// Human readable name of the type, used in error messages.
    const EXPECTED: &'static str;

    /// Parse the raw text, or `None` if it is not a valid value.
    fn from_text(raw: &str) -> Option<Self>;
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";

    fn from_text(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

impl Scalar for bool {
    const EXPECTED: &'static str = "bool";

    fn from_text(raw: &str) -> Option<Self> {
        Some(coerce::parse_bool(Some(raw)))
    }
}

impl Scalar for Date {
    const EXPECTED: &'static str = "date";

    fn from_text(raw: &str) -> Option<Self> {
        coerce::parse_date(raw)
    }
}

impl Scalar for Uri {
    const EXPECTED: &'static str = "URL";

    fn from_text(raw: &str) -> Option<Self> {
        coerce::parse_uri(raw)
    }
}

macro_rules! from_str_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_text(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

from_str_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);
