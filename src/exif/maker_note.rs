//! Vendor maker notes
//!
//! A maker note is an IFD whose position and offset base depend on the
//! camera maker. Canon stores a plain IFD relative to the EXIF header.
//! Nikon has three layouts, told apart by the bytes at the start of the
//! note.

use std::fmt;

use log::debug;

use crate::tiff::errors::TiffResult;
use crate::tiff::header::{read_header, Header};
use crate::tiff::ifd::{read_ifd, IFD};
use crate::utils::tag_utils::TagSpace;

const NIKON_TYPE1_MARKER: &[u8; 8] = b"Nikon\0\x01\0";
const NIKON_TYPE3_MARKERS: [&[u8; 10]; 2] = [b"Nikon\0\x02\x10\0\0", b"Nikon\0\x02\0\0\0"];
const NIKON_TYPE1_HEADER_SIZE: u32 = 8;
const NIKON_TYPE3_HEADER_SIZE: u64 = 10;

/// Camera makers with a known maker note layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Canon,
    Nikon,
}

impl Vendor {
    /// Maps an IFD0 Make value to a vendor
    pub fn from_make(make: &str) -> Option<Vendor> {
        match make.trim_end() {
            "Canon" => Some(Vendor::Canon),
            "NIKON CORPORATION" => Some(Vendor::Nikon),
            _ => None,
        }
    }

    fn tag_space(&self) -> TagSpace {
        match self {
            Vendor::Canon => TagSpace::Canon,
            Vendor::Nikon => TagSpace::Nikon,
        }
    }
}

/// The maker note layout that was decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakerNoteKind {
    /// Plain IFD at the MakerNote offset
    Canon,
    /// `Nikon\0\x01\0` prefix, IFD relative to the EXIF header
    NikonType1,
    /// No prefix, plain IFD at the MakerNote offset
    NikonType2,
    /// `Nikon\0\x02..` prefix followed by a TIFF header of its own
    NikonType3,
}

impl MakerNoteKind {
    pub fn vendor(&self) -> Vendor {
        match self {
            MakerNoteKind::Canon => Vendor::Canon,
            MakerNoteKind::NikonType1 | MakerNoteKind::NikonType2 | MakerNoteKind::NikonType3 => {
                Vendor::Nikon
            }
        }
    }
}

impl fmt::Display for MakerNoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakerNoteKind::Canon => write!(f, "Canon"),
            MakerNoteKind::NikonType1 => write!(f, "Nikon type 1"),
            MakerNoteKind::NikonType2 => write!(f, "Nikon type 2"),
            MakerNoteKind::NikonType3 => write!(f, "Nikon type 3"),
        }
    }
}

/// A decoded maker note IFD and the header its offsets are relative to
#[derive(Debug, Clone)]
pub struct MakerNote {
    pub kind: MakerNoteKind,
    /// The EXIF header, or the note's own header for Nikon type 3
    pub header: Header,
    pub ifd: IFD,
}

/// Classifies a Nikon maker note by its leading bytes
pub fn classify_nikon(prefix: &[u8]) -> MakerNoteKind {
    if prefix.len() >= 8 && prefix[..8] == NIKON_TYPE1_MARKER[..] {
        MakerNoteKind::NikonType1
    } else if prefix.len() >= 10 && NIKON_TYPE3_MARKERS.iter().any(|m| prefix[..10] == m[..]) {
        MakerNoteKind::NikonType3
    } else {
        MakerNoteKind::NikonType2
    }
}

/// Decodes the maker note at `offset` under `header` for `vendor`
pub fn read_maker_note(header: &Header, vendor: Vendor, offset: u32) -> TiffResult<MakerNote> {
    let kind = match vendor {
        Vendor::Canon => MakerNoteKind::Canon,
        Vendor::Nikon => {
            let mut prefix = [0u8; 10];
            let n = header.section().read_at(&mut prefix, offset as u64)?;
            classify_nikon(&prefix[..n])
        }
    };
    debug!("Maker note at offset {} is {}", offset, kind);

    let (note_header, ifd) = match kind {
        MakerNoteKind::Canon | MakerNoteKind::NikonType2 => {
            (header.clone(), read_ifd(header, offset)?)
        }
        MakerNoteKind::NikonType1 => {
            let ifd_offset = offset.checked_add(NIKON_TYPE1_HEADER_SIZE).unwrap_or(u32::MAX);
            (header.clone(), read_ifd(header, ifd_offset)?)
        }
        MakerNoteKind::NikonType3 => {
            let nested = header.section().tail(offset as u64 + NIKON_TYPE3_HEADER_SIZE)?;
            let nested = read_header(nested)?;
            debug!("Nikon maker note header: {}", nested.byte_order().name());
            let ifd = read_ifd(&nested, nested.offset_of_ifd())?;
            (nested, ifd)
        }
    };

    Ok(MakerNote {
        kind,
        header: note_header,
        ifd: ifd.with_space(vendor.tag_space()),
    })
}
