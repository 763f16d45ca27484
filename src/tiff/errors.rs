//! Custom error types for metadata decoding
//!
//! One error type is shared by the TIFF, ISO-BMFF and EXIF layers since
//! they nest inside each other and a failure deep in a maker note has to
//! surface through the EXIF parse unchanged.

use std::fmt;
use std::io;

use crate::tiff::types::ValueType;

/// Decoding error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Bad byte order marker or magic number mismatch
    InvalidTiffHeader,
    /// A record declared more bytes than the source holds
    UnexpectedEof(String),
    /// No container strategy found an EXIF block
    ExifNotFound,
    /// Malformed ISO-BMFF box
    InvalidBox(String),
    /// Malformed JPEG segment
    InvalidSegment(String),
    /// Directory entry value type outside the twelve TIFF types
    UnsupportedFieldType(u16),
    /// Entry type does not match the requested accessor
    TypeMismatch {
        tag: u16,
        expected: &'static str,
        found: ValueType,
    },
    /// Single value requested from an entry that holds none
    EmptyValue(u16),
    /// Located EXIF block is larger than the configured limit
    ExifTooLarge { length: u64, limit: u64 },
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidTiffHeader => write!(f, "Invalid TIFF header"),
            TiffError::UnexpectedEof(context) => write!(f, "Unexpected end of data: {}", context),
            TiffError::ExifNotFound => write!(f, "No EXIF data found"),
            TiffError::InvalidBox(msg) => write!(f, "Invalid ISO-BMFF box: {}", msg),
            TiffError::InvalidSegment(msg) => write!(f, "Invalid JPEG segment: {}", msg),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::TypeMismatch { tag, expected, found } => write!(
                f,
                "Tag {:#06x} has type {}, expected {}",
                tag,
                found.name(),
                expected
            ),
            TiffError::EmptyValue(tag) => write!(f, "Tag {:#06x} has no values", tag),
            TiffError::ExifTooLarge { length, limit } => write!(
                f,
                "EXIF block of {} bytes exceeds limit of {} bytes",
                length, limit
            ),
            TiffError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            TiffError::UnexpectedEof(error.to_string())
        } else {
            TiffError::IoError(error)
        }
    }
}

/// Result type for decoding operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
