//! Seekable and random-access reader traits
//!
//! `SeekableReader` is the cursor-style trait used by the byte order
//! handlers. `ReadAt` is the positional trait every `Section` is built on:
//! it never moves a shared cursor, so several views can read the same
//! source independently.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Mutex;

/// Trait for readers that can both read and seek
///
/// This trait combines the Read and Seek traits for use with
/// various readers throughout the library.
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Positional reads against a source of known size
pub trait ReadAt: Send + Sync {
    /// Reads up to `buf.len()` bytes starting at `offset`
    ///
    /// Returns the number of bytes read, which is smaller than the buffer
    /// only when the end of the source was reached.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Total size of the source in bytes
    fn size(&self) -> u64;
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        if offset >= self.len() as u64 {
            return Ok(0);
        }
        let start = offset as usize;
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

/// Adapts any `Read + Seek` source (usually a `File`) to `ReadAt`
///
/// The inner reader sits behind a mutex; every positional read seeks
/// first, so the inner cursor position carries no meaning between calls.
pub struct SharedReader<R: SeekableReader> {
    inner: Mutex<R>,
    size: u64,
}

impl<R: SeekableReader> SharedReader<R> {
    /// Wraps a reader, measuring its size once
    pub fn new(mut reader: R) -> io::Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(SharedReader {
            inner: Mutex::new(reader),
            size,
        })
    }

    /// Returns the wrapped reader
    pub fn into_inner(self) -> R {
        match self.inner.into_inner() {
            Ok(reader) => reader,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<R: SeekableReader> ReadAt for SharedReader<R> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let mut reader = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "reader lock poisoned"))?;
        reader.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn size(&self) -> u64 {
        self.size
    }
}
