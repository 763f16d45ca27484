//! Typed box variants
//!
//! Each decoder reads the fixed fields at the start of a box body. What
//! follows those fields (child boxes, item data) is left for the caller to
//! walk through `IsoBox::children`.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::io::section::SectionCursor;
use crate::isobmff::box_reader::FourCC;
use crate::tiff::errors::{TiffError, TiffResult};

/// Version and flags shared by full boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullBoxHeader {
    pub version: u8,
    /// 24-bit flags
    pub flags: u32,
}

/// One contiguous run of item data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Extent index, present when the box declares an index size
    pub index: Option<u64>,
    pub offset: u64,
    pub length: u64,
}

/// Where one item's data lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocationItem {
    pub item_id: u32,
    /// 0 file offset, 1 idat, 2 item reference
    pub construction_method: u8,
    pub data_reference_index: u16,
    pub base_offset: u64,
    pub extents: Vec<Extent>,
}

impl ItemLocationItem {
    /// Position and length of extent `n`, base offset applied
    pub fn extent_range(&self, n: usize) -> Option<(u64, u64)> {
        self.extents
            .get(n)
            .map(|e| (self.base_offset.saturating_add(e.offset), e.length))
    }

    pub fn first_extent(&self) -> Option<(u64, u64)> {
        self.extent_range(0)
    }
}

/// Decoded `iloc` box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocationBox {
    pub full: FullBoxHeader,
    pub offset_size: u8,
    pub length_size: u8,
    pub base_offset_size: u8,
    pub index_size: u8,
    pub items: Vec<ItemLocationItem>,
}

impl ItemLocationBox {
    pub fn item(&self, item_id: u32) -> Option<&ItemLocationItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }
}

/// The structural fields of a box, by type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxKind {
    /// A type without a decoder: only size, type and extent are known
    Generic,
    FileType {
        major_brand: FourCC,
        minor_version: u32,
        compatible_brands: Vec<FourCC>,
    },
    Meta(FullBoxHeader),
    ItemInfo {
        full: FullBoxHeader,
        entry_count: u32,
    },
    ItemInfoEntry {
        full: FullBoxHeader,
        item_id: u32,
        item_protection_index: u16,
        /// Present from version 2 on
        item_type: Option<FourCC>,
    },
    ItemLocation(ItemLocationBox),
    Movie,
    MovieHeader {
        full: FullBoxHeader,
        creation_time: u64,
        modification_time: u64,
        timescale: u32,
        duration: u64,
    },
}

impl BoxKind {
    /// Short name of the variant for listings
    pub fn name(&self) -> &'static str {
        match self {
            BoxKind::Generic => "Box",
            BoxKind::FileType { .. } => "FileTypeBox",
            BoxKind::Meta(_) => "MetaBox",
            BoxKind::ItemInfo { .. } => "ItemInfoBox",
            BoxKind::ItemInfoEntry { .. } => "ItemInfoEntry",
            BoxKind::ItemLocation(_) => "ItemLocationBox",
            BoxKind::Movie => "MovieBox",
            BoxKind::MovieHeader { .. } => "MovieHeaderBox",
        }
    }

    /// Version and flags, for full box variants
    pub fn full_box(&self) -> Option<FullBoxHeader> {
        match self {
            BoxKind::Meta(full)
            | BoxKind::ItemInfo { full, .. }
            | BoxKind::ItemInfoEntry { full, .. }
            | BoxKind::MovieHeader { full, .. } => Some(*full),
            BoxKind::ItemLocation(iloc) => Some(iloc.full),
            BoxKind::Generic | BoxKind::FileType { .. } | BoxKind::Movie => None,
        }
    }
}

fn read_fourcc(cursor: &mut SectionCursor) -> TiffResult<FourCC> {
    let mut bytes = [0u8; 4];
    cursor.read_exact(&mut bytes)?;
    Ok(FourCC(bytes))
}

pub fn read_full_box_header(cursor: &mut SectionCursor) -> TiffResult<FullBoxHeader> {
    let value = cursor.read_u32::<BigEndian>()?;
    Ok(FullBoxHeader {
        version: (value >> 24) as u8,
        flags: value & 0x00FF_FFFF,
    })
}

/// Reads a field whose width (0, 4 or 8 bytes) is declared by the box
fn read_sized(cursor: &mut SectionCursor, size: u8, field: &str) -> TiffResult<u64> {
    match size {
        0 => Ok(0),
        4 => Ok(cursor.read_u32::<BigEndian>()? as u64),
        8 => Ok(cursor.read_u64::<BigEndian>()?),
        other => Err(TiffError::InvalidBox(format!(
            "iloc {} size must be 0, 4 or 8, found {}",
            field, other
        ))),
    }
}

pub fn decode_file_type(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    let major_brand = read_fourcc(cursor)?;
    let minor_version = cursor.read_u32::<BigEndian>()?;

    let mut compatible_brands = Vec::new();
    while cursor.remaining() >= 4 {
        compatible_brands.push(read_fourcc(cursor)?);
    }

    Ok(BoxKind::FileType {
        major_brand,
        minor_version,
        compatible_brands,
    })
}

pub fn decode_meta(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    Ok(BoxKind::Meta(read_full_box_header(cursor)?))
}

pub fn decode_item_info(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    let full = read_full_box_header(cursor)?;
    let entry_count = if full.version == 0 {
        cursor.read_u16::<BigEndian>()? as u32
    } else {
        cursor.read_u32::<BigEndian>()?
    };
    Ok(BoxKind::ItemInfo { full, entry_count })
}

pub fn decode_item_info_entry(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    let full = read_full_box_header(cursor)?;

    let (item_id, item_protection_index, item_type) = match full.version {
        0 | 1 => {
            let item_id = cursor.read_u16::<BigEndian>()? as u32;
            (item_id, cursor.read_u16::<BigEndian>()?, None)
        }
        2 | 3 => {
            let item_id = if full.version == 2 {
                cursor.read_u16::<BigEndian>()? as u32
            } else {
                cursor.read_u32::<BigEndian>()?
            };
            let protection = cursor.read_u16::<BigEndian>()?;
            (item_id, protection, Some(read_fourcc(cursor)?))
        }
        // Later versions are not defined; keep the box navigable
        _ => (0, 0, None),
    };

    Ok(BoxKind::ItemInfoEntry {
        full,
        item_id,
        item_protection_index,
        item_type,
    })
}

pub fn decode_item_location(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    let full = read_full_box_header(cursor)?;
    if full.version > 2 {
        return Err(TiffError::InvalidBox(format!(
            "unsupported iloc version {}",
            full.version
        )));
    }
    let indexed = full.version == 1 || full.version == 2;

    let sizes = cursor.read_u16::<BigEndian>()?;
    let offset_size = (sizes >> 12) as u8;
    let length_size = ((sizes >> 8) & 0xF) as u8;
    let base_offset_size = ((sizes >> 4) & 0xF) as u8;
    let index_size = if indexed { (sizes & 0xF) as u8 } else { 0 };

    let item_count = if full.version == 2 {
        cursor.read_u32::<BigEndian>()?
    } else {
        cursor.read_u16::<BigEndian>()? as u32
    };

    let mut items = Vec::new();
    for _ in 0..item_count {
        let item_id = if full.version == 2 {
            cursor.read_u32::<BigEndian>()?
        } else {
            cursor.read_u16::<BigEndian>()? as u32
        };
        let construction_method = if indexed {
            (cursor.read_u16::<BigEndian>()? & 0xF) as u8
        } else {
            0
        };
        let data_reference_index = cursor.read_u16::<BigEndian>()?;
        let base_offset = read_sized(cursor, base_offset_size, "base offset")?;

        let extent_count = cursor.read_u16::<BigEndian>()?;
        let mut extents = Vec::new();
        for _ in 0..extent_count {
            let index = if indexed && index_size > 0 {
                Some(read_sized(cursor, index_size, "index")?)
            } else {
                None
            };
            let offset = read_sized(cursor, offset_size, "offset")?;
            let length = read_sized(cursor, length_size, "length")?;
            extents.push(Extent { index, offset, length });
        }

        items.push(ItemLocationItem {
            item_id,
            construction_method,
            data_reference_index,
            base_offset,
            extents,
        });
    }

    Ok(BoxKind::ItemLocation(ItemLocationBox {
        full,
        offset_size,
        length_size,
        base_offset_size,
        index_size,
        items,
    }))
}

pub fn decode_movie(_cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    Ok(BoxKind::Movie)
}

pub fn decode_movie_header(cursor: &mut SectionCursor) -> TiffResult<BoxKind> {
    let full = read_full_box_header(cursor)?;

    let (creation_time, modification_time, timescale, duration) = if full.version == 1 {
        let creation = cursor.read_u64::<BigEndian>()?;
        let modification = cursor.read_u64::<BigEndian>()?;
        let timescale = cursor.read_u32::<BigEndian>()?;
        (creation, modification, timescale, cursor.read_u64::<BigEndian>()?)
    } else {
        let creation = cursor.read_u32::<BigEndian>()? as u64;
        let modification = cursor.read_u32::<BigEndian>()? as u64;
        let timescale = cursor.read_u32::<BigEndian>()?;
        (creation, modification, timescale, cursor.read_u32::<BigEndian>()? as u64)
    };

    Ok(BoxKind::MovieHeader {
        full,
        creation_time,
        modification_time,
        timescale,
        duration,
    })
}
