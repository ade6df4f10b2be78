//! Streaming construction of typed entity graphs from XML.
//!
//! Bytes flow through three stages:
//!
//! 1. a byte source ([`FileSource`], [`ReaderSource`], or
//!    `AsyncReaderSource` with the `tokio` feature) delivers chunks to a
//!    [`ChunkSink`];
//! 2. a [`PushTokenizer`] turns chunks into [`SaxHandler`] events;
//! 3. a [`StackBuilder`] turns events into a graph of model types that
//!    implement [`Entity`].
//!
//! [`StreamParser`] wires the three together for the common case. Nothing
//! holds the whole document in memory: only the open-element path and the
//! pending text of the current element are kept.

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace, warning};

mod builder;
mod entity;
mod error;
mod parser;
mod source;
mod tokenizer;

pub use builder::{BuilderOptions, BuilderState, DEFAULT_CHUNK_SIZE, StackBuilder};
pub use entity::Entity;
pub use error::{StreamError, TokenizerError};
pub use parser::StreamParser;
#[cfg(feature = "tokio")]
pub use source::AsyncReaderSource;
pub use source::{ChunkSink, FileSource, ReaderSource};
pub use tokenizer::{PushTokenizer, SaxHandler};
