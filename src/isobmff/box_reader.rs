//! Reading boxes one at a time from a bounded section
//!
//! A `BoxReader` walks a sequence of sibling boxes. Every box it returns
//! has already been skipped over, so a decoder that reads only part of a
//! body can never leave the next sibling misaligned. Children are walked
//! with a fresh reader over the parent's body.

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use lazy_static::lazy_static;
use log::trace;

use crate::io::section::{Section, SectionCursor};
use crate::isobmff::boxes::{self, BoxKind};
use crate::tiff::errors::{TiffError, TiffResult};

/// Smallest possible box header: 32-bit size and type
pub const MIN_HEADER_SIZE: u64 = 8;

/// A four character box type or brand
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const FTYP: FourCC = FourCC(*b"ftyp");
    pub const META: FourCC = FourCC(*b"meta");
    pub const IINF: FourCC = FourCC(*b"iinf");
    pub const INFE: FourCC = FourCC(*b"infe");
    pub const ILOC: FourCC = FourCC(*b"iloc");
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const MVHD: FourCC = FourCC(*b"mvhd");
    pub const UUID: FourCC = FourCC(*b"uuid");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

type BoxDecoder = fn(&mut SectionCursor) -> TiffResult<BoxKind>;

lazy_static! {
    // Types with a structural decoder; everything else stays generic
    static ref BOX_DECODERS: HashMap<FourCC, BoxDecoder> = {
        let mut decoders: HashMap<FourCC, BoxDecoder> = HashMap::new();
        decoders.insert(FourCC::FTYP, boxes::decode_file_type);
        decoders.insert(FourCC::META, boxes::decode_meta);
        decoders.insert(FourCC::IINF, boxes::decode_item_info);
        decoders.insert(FourCC::INFE, boxes::decode_item_info_entry);
        decoders.insert(FourCC::ILOC, boxes::decode_item_location);
        decoders.insert(FourCC::MOOV, boxes::decode_movie);
        decoders.insert(FourCC::MVHD, boxes::decode_movie_header);
        decoders
    };
}

/// Returns true if `box_type` has a structural decoder
pub fn is_registered(box_type: FourCC) -> bool {
    BOX_DECODERS.contains_key(&box_type)
}

/// The common header of every box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    /// Total size including the header
    pub size: u64,
    pub box_type: FourCC,
    /// Extended type, present only for `uuid` boxes
    pub user_type: Option<[u8; 16]>,
    /// Bytes taken by size, type, large size and user type
    pub header_size: u64,
}

/// A decoded box and the bytes it spans
#[derive(Debug, Clone)]
pub struct IsoBox {
    header: BoxHeader,
    extent: Section,
    body: Section,
    children_offset: u64,
    kind: BoxKind,
}

impl IsoBox {
    pub fn header(&self) -> &BoxHeader {
        &self.header
    }

    pub fn size(&self) -> u64 {
        self.header.size
    }

    pub fn box_type(&self) -> FourCC {
        self.header.box_type
    }

    pub fn user_type(&self) -> Option<&[u8; 16]> {
        self.header.user_type.as_ref()
    }

    /// The typed fields decoded for this box
    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    /// The whole box, header included
    pub fn extent(&self) -> &Section {
        &self.extent
    }

    /// The box after its header
    pub fn body(&self) -> &Section {
        &self.body
    }

    /// Absolute position of the box in the underlying source
    pub fn offset(&self) -> u64 {
        self.extent.absolute_start()
    }

    /// Reader over whatever follows the decoded fields of this box
    pub fn children(&self) -> TiffResult<BoxReader> {
        Ok(BoxReader::new(self.body.tail(self.children_offset)?))
    }
}

/// Reads consecutive boxes from a section
pub struct BoxReader {
    cursor: SectionCursor,
    failed: bool,
}

impl BoxReader {
    pub fn new(section: Section) -> Self {
        BoxReader {
            cursor: section.cursor(),
            failed: false,
        }
    }

    /// Position of the next box relative to the reader's section
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Reads the next box and moves past it
    ///
    /// Returns `None` when fewer than 8 bytes remain. A box whose declared
    /// size is smaller than its header or runs past the section is an
    /// `InvalidBox` error.
    pub fn read_box(&mut self) -> TiffResult<Option<IsoBox>> {
        let remaining = self.cursor.remaining();
        if remaining < MIN_HEADER_SIZE {
            return Ok(None);
        }

        let start = self.cursor.position();
        let rest = self.cursor.section().tail(start)?;
        let mut cursor = rest.cursor();

        let size32 = cursor.read_u32::<BigEndian>()?;
        let mut type_bytes = [0u8; 4];
        cursor.read_exact(&mut type_bytes)?;
        let box_type = FourCC(type_bytes);

        let size = match size32 {
            0 => remaining,
            1 => cursor.read_u64::<BigEndian>()?,
            n => n as u64,
        };

        let user_type = if box_type == FourCC::UUID {
            let mut user_type = [0u8; 16];
            cursor.read_exact(&mut user_type)?;
            Some(user_type)
        } else {
            None
        };

        let header_size = cursor.position();
        if size < header_size {
            return Err(TiffError::InvalidBox(format!(
                "box '{}' has size {} smaller than its {} byte header",
                box_type, size, header_size
            )));
        }
        if size > remaining {
            return Err(TiffError::InvalidBox(format!(
                "box '{}' of {} bytes exceeds the {} bytes remaining",
                box_type, size, remaining
            )));
        }

        trace!("Box '{}' at offset {}, size {}", box_type, rest.absolute_start(), size);

        let extent = rest.sub(0, size)?;
        let body = extent.tail(header_size)?;
        let mut body_cursor = body.cursor();
        let kind = match BOX_DECODERS.get(&box_type) {
            Some(decode) => decode(&mut body_cursor)?,
            None => BoxKind::Generic,
        };
        let children_offset = body_cursor.position().min(body.len());

        self.cursor.seek(SeekFrom::Start(start + size))?;

        Ok(Some(IsoBox {
            header: BoxHeader {
                size,
                box_type,
                user_type,
                header_size,
            },
            extent,
            body,
            children_offset,
            kind,
        }))
    }

    /// Reads boxes until one of the given type turns up
    pub fn find(&mut self, box_type: FourCC) -> TiffResult<Option<IsoBox>> {
        while let Some(found) = self.read_box()? {
            if found.box_type() == box_type {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl Iterator for BoxReader {
    type Item = TiffResult<IsoBox>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_box() {
            Ok(Some(found)) => Some(Ok(found)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
