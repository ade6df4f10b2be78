//! One-shot parse driver tying a byte source, the tokenizer and a builder.

use std::io::Read;
use std::path::Path;

use crate::builder::{BuilderOptions, BuilderState, StackBuilder};
use crate::entity::Entity;
use crate::error::StreamError;
use crate::source::{ChunkSink, FileSource, ReaderSource};
use crate::tokenizer::PushTokenizer;

/// Drives one parse from bytes to a finished root entity.
///
/// Each `parse_*` method consumes the parser. Dropping a parser, or the
/// future returned by [`parse_async`](Self::parse_async), before it finishes
/// abandons the parse without running the completion callback.
///
/// ```
/// use xmlmap_stream::{Entity, StreamParser};
///
/// #[derive(Debug, Default)]
/// struct Note {
///     title: Option<String>,
/// }
///
/// impl Entity for Note {
///     fn tag(&self) -> &str {
///         "note"
///     }
///     fn set_value(&mut self, value: String, tag: &str) {
///         if tag == "title" {
///             self.title = Some(value);
///         }
///     }
///     fn make_child_entity(&self, _tag: &str) -> Option<Self> {
///         None
///     }
///     fn set_child_entity(&mut self, _child: Self, _tag: &str) {}
/// }
///
/// let note = StreamParser::new(Note::default())
///     .parse_bytes(b"<note><title>Hello</title></note>")
///     .unwrap();
/// assert_eq!(note.title.as_deref(), Some("Hello"));
/// ```
pub struct StreamParser<E: Entity> {
    builder: StackBuilder<E>,
    tokenizer: PushTokenizer,
}

impl<E: Entity> StreamParser<E> {
    /// Create a parser that builds into `root`.
    pub fn new(root: E) -> Self {
        Self::with_options(root, BuilderOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(root: E, options: BuilderOptions) -> Self {
        Self {
            builder: StackBuilder::with_options(root, options),
            tokenizer: PushTokenizer::new(),
        }
    }

    /// Register a callback run once, after the last event of the document.
    pub fn with_completion(mut self, completion: impl FnOnce(&mut StackBuilder<E>) + 'static) -> Self {
        self.builder.on_complete(completion);
        self
    }

    /// The builder being driven.
    pub fn builder(&self) -> &StackBuilder<E> {
        &self.builder
    }

    /// Parse an in-memory document.
    pub fn parse_bytes(mut self, bytes: &[u8]) -> Result<E, StreamError> {
        ChunkSink::on_data(&mut self, bytes);
        ChunkSink::on_complete(&mut self);
        self.finish()
    }

    /// Parse everything `reader` yields.
    pub fn parse_reader<R: Read>(mut self, reader: R) -> Result<E, StreamError> {
        let chunk_size = self.builder.options().chunk_size;
        ReaderSource::new(reader)
            .with_chunk_size(chunk_size)
            .pump(&mut self)?;
        self.finish()
    }

    /// Parse the file at `path`.
    pub fn parse_file(mut self, path: impl AsRef<Path>) -> Result<E, StreamError> {
        let chunk_size = self.builder.options().chunk_size;
        FileSource::new(path)
            .with_chunk_size(chunk_size)
            .pump(&mut self)?;
        self.finish()
    }

    /// Parse everything an async `reader` yields.
    #[cfg(feature = "tokio")]
    pub async fn parse_async<R>(mut self, reader: R) -> Result<E, StreamError>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let chunk_size = self.builder.options().chunk_size;
        crate::source::AsyncReaderSource::new(reader)
            .with_chunk_size(chunk_size)
            .pump(&mut self)
            .await?;
        self.finish()
    }

    fn finish(mut self) -> Result<E, StreamError> {
        if self.builder.state() == BuilderState::Aborted
            && let Some(error) = self.builder.errors().first()
        {
            return Err(StreamError::Aborted(error.clone()));
        }
        let root_tag = self.builder.root_tag().to_owned();
        self.builder
            .take_root()
            .ok_or(StreamError::Incomplete { root_tag })
    }
}

impl<E: Entity> ChunkSink for StreamParser<E> {
    fn on_data(&mut self, chunk: &[u8]) {
        self.tokenizer.feed(chunk, &mut self.builder);
    }

    fn on_complete(&mut self) {
        self.tokenizer.finish(&mut self.builder);
    }
}
