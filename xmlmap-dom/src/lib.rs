//! Key-addressed decoder for already-parsed XML trees.
//!
//! This crate decodes statically-typed values out of a read-only tree of
//! [`Fragment`]s. Model types implement [`Decode`] and read their fields
//! through a [`KeyedContainer`] using a small key grammar (see [`key`]):
//!
//! - `"title"` reads the text of the `<title>` child
//! - `"link@href"` reads the `href` attribute of the `<link>` child
//! - `"@id"` reads the `id` attribute of the current element
//! - `"description@"` reads the CDATA of the `<description>` child
//!
//! Repeated children decode into a `Vec<T>` through a [`SequenceContainer`].
//! Dates, URIs and booleans are coerced with the rules in [`coerce`].

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

mod tracing_macros;
pub(crate) use tracing_macros::{trace, warning};

pub mod coerce;
mod deserializer;
mod error;
mod fragment;
pub mod key;
mod scalar;

pub use coerce::Date;
pub use deserializer::*;
pub use error::DecodeError;
pub use fragment::Fragment;
pub use key::KeyExpr;
pub use scalar::Scalar;
