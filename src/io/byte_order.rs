//! Byte order handling for TIFF data
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading TIFF structures.
//! A maker note may carry its own TIFF header, so the byte order is a
//! property of each header rather than of the file.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the two marker bytes of a TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker)?;
        Self::from_marker(marker).ok_or(TiffError::InvalidTiffHeader)
    }

    /// Maps a two byte marker to a byte order
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            b"II" => Some(ByteOrder::LittleEndian), // Intel
            b"MM" => Some(ByteOrder::BigEndian),    // Motorola
            _ => None,
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Interprets four raw bytes as a u32 in this byte order
    pub fn u32_from(&self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read an i16 value
    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read an i32 value
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;

    /// Read an f32 value
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Read a rational value (two u32 values as numerator/denominator)
    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        let numerator = self.read_u32(reader)?;
        let denominator = self.read_u32(reader)?;
        Ok((numerator, denominator))
    }

    /// Read a signed rational value (two i32 values as numerator/denominator)
    fn read_srational(&self, reader: &mut dyn SeekableReader) -> Result<(i32, i32)> {
        let numerator = self.read_i32(reader)?;
        let denominator = self.read_i32(reader)?;
        Ok((numerator, denominator))
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }
}
