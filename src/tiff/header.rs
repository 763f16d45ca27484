//! TIFF header parsing
//!
//! The header fixes the byte order and the base for every offset stored in
//! the IFDs that follow it. EXIF blocks and Nikon type 3 maker notes each
//! start with their own header, so offsets are never file-absolute.

use log::debug;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::section::Section;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// A decoded TIFF header and the view its offsets are relative to
#[derive(Debug, Clone)]
pub struct Header {
    byte_order: ByteOrder,
    offset_of_ifd: u32,
    section: Section,
}

impl Header {
    /// Byte order of every value under this header
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Offset of the first IFD, relative to the header start
    pub fn offset_of_ifd(&self) -> u32 {
        self.offset_of_ifd
    }

    /// The view whose offset 0 is the first byte of the order marker
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Creates a byte order handler for this header
    pub fn handler(&self) -> Box<dyn ByteOrderHandler> {
        self.byte_order.create_handler()
    }
}

/// Reads a TIFF header from the start of `section`
///
/// The returned header keeps `section` as the base for all later offsets.
pub fn read_header(section: Section) -> TiffResult<Header> {
    if section.len() < header::HEADER_SIZE as u64 {
        return Err(TiffError::UnexpectedEof(format!(
            "TIFF header needs {} bytes, {} available",
            header::HEADER_SIZE,
            section.len()
        )));
    }

    let mut cursor = section.cursor();
    let byte_order = ByteOrder::detect(&mut cursor)?;
    debug!("Detected byte order: {}", byte_order.name());

    let handler = byte_order.create_handler();
    let magic = handler.read_u16(&mut cursor)?;
    if magic != header::TIFF_MAGIC {
        debug!("TIFF magic mismatch: {:#06x}", magic);
        return Err(TiffError::InvalidTiffHeader);
    }

    let offset_of_ifd = handler.read_u32(&mut cursor)?;
    debug!("First IFD offset: {}", offset_of_ifd);

    Ok(Header {
        byte_order,
        offset_of_ifd,
        section,
    })
}
