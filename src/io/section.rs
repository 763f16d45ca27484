//! Bounded views over a shared byte source
//!
//! A `Section` is a window `[start, start + len)` into a `ReadAt` source.
//! Sub-sections can only shrink the window, so a decoder handed a section
//! cannot reach bytes outside the record it was given. `SectionCursor`
//! adds a read position and implements `Read + Seek`.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::io::seekable::ReadAt;
use crate::tiff::errors::{TiffError, TiffResult};

/// A bounded, cheaply clonable view of a byte source
#[derive(Clone)]
pub struct Section {
    source: Arc<dyn ReadAt>,
    start: u64,
    len: u64,
}

impl Section {
    /// Creates a section covering the whole source
    pub fn new<S: ReadAt + 'static>(source: S) -> Self {
        let len = source.size();
        Section {
            source: Arc::new(source),
            start: 0,
            len,
        }
    }

    /// Creates a section over an in-memory buffer
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Section::new(bytes)
    }

    /// Length of the view in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the view is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute position of this view's first byte in the underlying source
    pub fn absolute_start(&self) -> u64 {
        self.start
    }

    /// Returns the view `[offset, offset + len)` relative to this one
    pub fn sub(&self, offset: u64, len: u64) -> TiffResult<Section> {
        let end = offset.checked_add(len).ok_or_else(|| {
            TiffError::UnexpectedEof(format!("range {}+{} overflows", offset, len))
        })?;
        if end > self.len {
            return Err(TiffError::UnexpectedEof(format!(
                "range {}..{} exceeds section of {} bytes",
                offset, end, self.len
            )));
        }

        Ok(Section {
            source: Arc::clone(&self.source),
            start: self.start + offset,
            len,
        })
    }

    /// Returns everything from `offset` to the end of this view
    pub fn tail(&self, offset: u64) -> TiffResult<Section> {
        if offset > self.len {
            return Err(TiffError::UnexpectedEof(format!(
                "offset {} exceeds section of {} bytes",
                offset, self.len
            )));
        }
        self.sub(offset, self.len - offset)
    }

    /// Reads at a position relative to this view, clipped to its end
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        if offset >= self.len {
            return Ok(0);
        }
        let available = (self.len - offset).min(buf.len() as u64) as usize;
        self.source.read_at(&mut buf[..available], self.start + offset)
    }

    /// Fills `buf` from `offset`, failing if the view ends first
    pub fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> TiffResult<()> {
        let n = self.read_at(buf, offset)?;
        if n < buf.len() {
            return Err(TiffError::UnexpectedEof(format!(
                "wanted {} bytes at offset {}, got {}",
                buf.len(),
                offset,
                n
            )));
        }
        Ok(())
    }

    /// Reads `len` bytes at `offset` into a new buffer
    ///
    /// The length is checked against the view before anything is allocated.
    pub fn read_vec(&self, offset: u64, len: u64) -> TiffResult<Vec<u8>> {
        let range = self.sub(offset, len)?;
        let mut buffer = vec![0u8; range.len as usize];
        range.read_exact_at(&mut buffer, 0)?;
        Ok(buffer)
    }

    /// Copies this view into memory, detaching it from the original source
    pub fn load(&self) -> TiffResult<Section> {
        Ok(Section::from_bytes(self.read_vec(0, self.len)?))
    }

    /// Creates a cursor positioned at the start of this view
    pub fn cursor(&self) -> SectionCursor {
        SectionCursor {
            section: self.clone(),
            pos: 0,
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

/// A read position inside a `Section`
#[derive(Debug, Clone)]
pub struct SectionCursor {
    section: Section,
    pos: u64,
}

impl SectionCursor {
    /// Current position relative to the section start
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Bytes left between the position and the end of the section
    pub fn remaining(&self) -> u64 {
        self.section.len.saturating_sub(self.pos)
    }

    /// The section this cursor walks
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Moves the cursor forward, failing if that would leave the section
    pub fn skip(&mut self, count: u64) -> TiffResult<()> {
        if count > self.remaining() {
            return Err(TiffError::UnexpectedEof(format!(
                "cannot skip {} bytes with {} remaining",
                count,
                self.remaining()
            )));
        }
        self.pos += count;
        Ok(())
    }
}

impl Read for SectionCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.section.read_at(buf, self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for SectionCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.section.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.pos = offset;
                Ok(offset)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
