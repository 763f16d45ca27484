//! Finding the EXIF block inside a container
//!
//! Each container format has its own locator strategy. Strategies are tried
//! in order; `Ok(None)` means "not this format, try the next one" and only
//! a structural problem inside a recognised container is an error.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use crate::io::section::Section;
use crate::isobmff::{BoxKind, BoxReader, FourCC, IsoBox};
use crate::tiff::errors::{TiffError, TiffResult};

const SOI: u16 = 0xFFD8;
const APP1: u16 = 0xFFE1;
const SOS: u16 = 0xFFDA;
const EXIF_MARKER: &[u8; 6] = b"Exif\0\0";
/// Marker and size fields plus the `Exif\0\0` identifier
const APP1_EXIF_OVERHEAD: u64 = 8;

const HEIC_BRAND: FourCC = FourCC(*b"heic");
const EXIF_ITEM_TYPE: FourCC = FourCC(*b"Exif");
/// Header offset field and identifier in front of the TIFF data of an Exif item
const HEIC_EXIF_PREFIX: u64 = 10;

/// Container the EXIF block was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Jpeg,
    Heic,
    /// A raw TIFF-based file
    Tiff,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Jpeg => write!(f, "JPEG"),
            Container::Heic => write!(f, "HEIC"),
            Container::Tiff => write!(f, "TIFF"),
        }
    }
}

/// The byte range holding the TIFF structure of the EXIF block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifLocation {
    pub container: Container,
    /// Offset of the TIFF header within the source
    pub offset: u64,
    pub length: u64,
}

/// Strategy for locating EXIF data in one container format
pub trait LocatorStrategy {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Returns the EXIF range, or `None` if the source is not this format
    /// or carries no EXIF block
    fn locate(&self, source: &Section) -> TiffResult<Option<ExifLocation>>;
}

/// Scans JPEG marker segments for an `Exif\0\0` APP1 segment
pub struct JpegLocator;

impl LocatorStrategy for JpegLocator {
    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn locate(&self, source: &Section) -> TiffResult<Option<ExifLocation>> {
        let mut cursor = source.cursor();

        if cursor.remaining() < 2 || cursor.read_u16::<BigEndian>()? != SOI {
            return Ok(None);
        }

        loop {
            if cursor.remaining() < 4 {
                debug!("JPEG ended before an EXIF segment");
                return Ok(None);
            }
            let marker = cursor.read_u16::<BigEndian>()?;
            let size = cursor.read_u16::<BigEndian>()? as u64;
            trace!("JPEG marker {:#06x} at {}, size {}", marker, cursor.position() - 4, size);

            if marker == SOS {
                debug!("Reached start of scan without an EXIF segment");
                return Ok(None);
            }
            if size < 2 {
                return Err(TiffError::InvalidSegment(format!(
                    "segment {:#06x} declares size {}",
                    marker, size
                )));
            }

            if marker == APP1 && size >= APP1_EXIF_OVERHEAD && cursor.remaining() >= 6 {
                let mut identifier = [0u8; 6];
                cursor.read_exact(&mut identifier)?;
                if &identifier == EXIF_MARKER {
                    let location = ExifLocation {
                        container: Container::Jpeg,
                        offset: cursor.position(),
                        length: size - APP1_EXIF_OVERHEAD,
                    };
                    debug!("EXIF APP1 segment at {}, {} bytes", location.offset, location.length);
                    return Ok(Some(location));
                }
                // Some other APP1 payload, such as XMP
                cursor.seek(SeekFrom::Current(-6))?;
            }

            if size - 2 > cursor.remaining() {
                debug!("Segment {:#06x} runs past the end of the source", marker);
                return Ok(None);
            }
            cursor.skip(size - 2)?;
        }
    }
}

/// Walks the `meta` box of a HEIC file for the `Exif` item
pub struct HeicLocator;

impl HeicLocator {
    /// Collects the item ids announced by an `iinf` box
    fn exif_item_id(iinf: &IsoBox, entry_count: u32) -> TiffResult<Option<u32>> {
        let mut entries = iinf.children()?;
        let mut found = None;

        for _ in 0..entry_count {
            let entry = match entries.read_box()? {
                Some(entry) => entry,
                None => break,
            };
            if let BoxKind::ItemInfoEntry { item_id, item_type: Some(item_type), .. } = entry.kind() {
                trace!("Item {} has type '{}'", item_id, item_type);
                if *item_type == EXIF_ITEM_TYPE {
                    found = Some(*item_id);
                }
            }
        }

        Ok(found)
    }
}

impl LocatorStrategy for HeicLocator {
    fn name(&self) -> &'static str {
        "HEIC"
    }

    fn locate(&self, source: &Section) -> TiffResult<Option<ExifLocation>> {
        let mut top = BoxReader::new(source.clone());

        let ftyp = match top.read_box() {
            Ok(Some(ftyp)) => ftyp,
            Ok(None) => return Ok(None),
            Err(e) => {
                debug!("First box unreadable, not an ISO-BMFF file: {}", e);
                return Ok(None);
            }
        };
        match ftyp.kind() {
            BoxKind::FileType { major_brand, .. } if *major_brand == HEIC_BRAND => {}
            _ => return Ok(None),
        }

        let meta = match top.read_box()? {
            Some(meta) if meta.box_type() == FourCC::META => meta,
            _ => {
                debug!("HEIC file without a meta box after ftyp");
                return Ok(None);
            }
        };

        let mut exif_item = None;
        let mut extents = Vec::new();
        let mut children = meta.children()?;

        while let Some(child) = children.read_box()? {
            match child.kind() {
                BoxKind::ItemInfo { entry_count, .. } => {
                    exif_item = Self::exif_item_id(&child, *entry_count)?;
                }
                BoxKind::ItemLocation(iloc) => {
                    extents = iloc
                        .items
                        .iter()
                        .filter_map(|item| item.first_extent().map(|e| (item.item_id, e)))
                        .collect();
                }
                _ => {}
            }

            if let Some(item_id) = exif_item {
                if let Some((_, (offset, length))) = extents.iter().find(|(id, _)| *id == item_id) {
                    if *length < HEIC_EXIF_PREFIX {
                        return Err(TiffError::InvalidBox(format!(
                            "Exif item of {} bytes is shorter than its prefix",
                            length
                        )));
                    }
                    let location = ExifLocation {
                        container: Container::Heic,
                        offset: offset + HEIC_EXIF_PREFIX,
                        length: length - HEIC_EXIF_PREFIX,
                    };
                    debug!("Exif item {} at {}, {} bytes", item_id, location.offset, location.length);
                    return Ok(Some(location));
                }
            }
        }

        debug!("meta box has no locatable Exif item");
        Ok(None)
    }
}

/// Treats a source that starts with a TIFF header as one EXIF block
///
/// Raw camera files (NEF, CR2, DNG) are TIFF files whose IFD0 already
/// carries the EXIF pointers.
pub struct TiffLocator;

impl LocatorStrategy for TiffLocator {
    fn name(&self) -> &'static str {
        "TIFF"
    }

    fn locate(&self, source: &Section) -> TiffResult<Option<ExifLocation>> {
        let mut prefix = [0u8; 4];
        if source.read_at(&mut prefix, 0)? < prefix.len() {
            return Ok(None);
        }
        if &prefix != b"II*\0" && &prefix != b"MM\0*" {
            return Ok(None);
        }
        Ok(Some(ExifLocation {
            container: Container::Tiff,
            offset: 0,
            length: source.len(),
        }))
    }
}

/// Tries each container strategy in turn
pub fn locate_exif(source: &Section) -> TiffResult<ExifLocation> {
    let strategies: [&dyn LocatorStrategy; 3] = [&JpegLocator, &HeicLocator, &TiffLocator];

    for strategy in strategies {
        if let Some(location) = strategy.locate(source)? {
            return Ok(location);
        }
        debug!("{} locator found no EXIF block", strategy.name());
    }

    Err(TiffError::ExifNotFound)
}
