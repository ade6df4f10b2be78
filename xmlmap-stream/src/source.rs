//! Byte sources that deliver chunks to a [`ChunkSink`].

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::builder::DEFAULT_CHUNK_SIZE;
use crate::trace;

/// Consumer of a chunked byte stream.
///
/// A source calls [`on_data`](ChunkSink::on_data) for each chunk in order and
/// [`on_complete`](ChunkSink::on_complete) once when the stream ends cleanly.
/// A source that fails never calls `on_complete`.
pub trait ChunkSink {
    /// A chunk of bytes, in stream order.
    fn on_data(&mut self, chunk: &[u8]);

    /// The stream ended.
    fn on_complete(&mut self);
}

/// Chunked delivery from any blocking reader: sockets, stdin, in-memory data.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap `reader`, reading [`DEFAULT_CHUNK_SIZE`] bytes at a time.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Change the read size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Read to the end, delivering every chunk to `sink`.
    ///
    /// Returns the number of bytes delivered. On error the sink has seen
    /// every chunk read so far but not `on_complete`.
    pub fn pump<S: ChunkSink + ?Sized>(mut self, sink: &mut S) -> io::Result<u64> {
        let mut buf = vec![0; self.chunk_size];
        let mut total = 0u64;
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    trace!(len = n, "chunk read");
                    sink.on_data(&buf[..n]);
                    total += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        sink.on_complete();
        Ok(total)
    }
}

/// Chunked delivery from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    chunk_size: usize,
}

impl FileSource {
    /// Read the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Change the read size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and deliver it to `sink`.
    pub fn pump<S: ChunkSink + ?Sized>(self, sink: &mut S) -> io::Result<u64> {
        let file = File::open(&self.path)?;
        ReaderSource::new(file)
            .with_chunk_size(self.chunk_size)
            .pump(sink)
    }
}

#[cfg(feature = "tokio")]
pub use self::async_source::AsyncReaderSource;

#[cfg(feature = "tokio")]
mod async_source {
    use std::io;

    use tokio::io::{AsyncRead, AsyncReadExt};

    use super::ChunkSink;
    use crate::builder::DEFAULT_CHUNK_SIZE;
    use crate::trace;

    /// Chunked delivery from an async reader, such as a network stream.
    #[derive(Debug)]
    pub struct AsyncReaderSource<R> {
        reader: R,
        chunk_size: usize,
    }

    impl<R: AsyncRead + Unpin> AsyncReaderSource<R> {
        /// Wrap `reader`, reading [`DEFAULT_CHUNK_SIZE`] bytes at a time.
        pub fn new(reader: R) -> Self {
            Self {
                reader,
                chunk_size: DEFAULT_CHUNK_SIZE,
            }
        }

        /// Change the read size. Zero is treated as one.
        pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
            self.chunk_size = chunk_size.max(1);
            self
        }

        /// Read to the end, delivering every chunk to `sink`.
        ///
        /// Chunks are applied in order on the awaiting task. Dropping the
        /// future abandons the stream without calling `on_complete`.
        pub async fn pump<S: ChunkSink + ?Sized>(mut self, sink: &mut S) -> io::Result<u64> {
            let mut buf = vec![0; self.chunk_size];
            let mut total = 0u64;
            loop {
                let n = match self.reader.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                trace!(len = n, "chunk read");
                sink.on_data(&buf[..n]);
                total += n as u64;
            }
            sink.on_complete();
            Ok(total)
        }
    }
}
