//! TIFF structure parsing module
//!
//! This module provides the TIFF header and Image File Directory readers
//! that EXIF blocks and maker notes are built from.

pub mod errors;
pub mod header;
pub mod ifd;
pub mod types;
pub mod constants;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use header::{read_header, Header};
pub use ifd::{read_ifd, IFD, IFDEntry};
pub use types::{Value, ValueType};
