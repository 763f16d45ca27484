//! Builders for in-memory TIFF, JPEG and ISO-BMFF test data

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::field_types;

/// A directory entry to be written by `TiffWriter`
#[derive(Debug, Clone)]
pub struct TestEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    value: TestValue,
}

#[derive(Debug, Clone)]
enum TestValue {
    Bytes(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    SRationals(Vec<(i32, i32)>),
}

impl TestEntry {
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        TestEntry {
            tag,
            field_type: field_types::ASCII,
            count: bytes.len() as u32,
            value: TestValue::Bytes(bytes),
        }
    }

    pub fn bytes(tag: u16, field_type: u16, bytes: &[u8]) -> Self {
        TestEntry {
            tag,
            field_type,
            count: bytes.len() as u32,
            value: TestValue::Bytes(bytes.to_vec()),
        }
    }

    pub fn short(tag: u16, values: &[u16]) -> Self {
        TestEntry {
            tag,
            field_type: field_types::SHORT,
            count: values.len() as u32,
            value: TestValue::Shorts(values.to_vec()),
        }
    }

    pub fn long(tag: u16, values: &[u32]) -> Self {
        TestEntry {
            tag,
            field_type: field_types::LONG,
            count: values.len() as u32,
            value: TestValue::Longs(values.to_vec()),
        }
    }

    pub fn rational(tag: u16, values: &[(u32, u32)]) -> Self {
        TestEntry {
            tag,
            field_type: field_types::RATIONAL,
            count: values.len() as u32,
            value: TestValue::Rationals(values.to_vec()),
        }
    }

    pub fn srational(tag: u16, values: &[(i32, i32)]) -> Self {
        TestEntry {
            tag,
            field_type: field_types::SRATIONAL,
            count: values.len() as u32,
            value: TestValue::SRationals(values.to_vec()),
        }
    }

    /// An entry whose four byte field is written verbatim
    pub fn raw(tag: u16, field_type: u16, count: u32, field: u32) -> Self {
        TestEntry {
            tag,
            field_type,
            count,
            value: TestValue::Longs(vec![field]),
        }
    }

    fn encode(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = Vec::new();
        match &self.value {
            TestValue::Bytes(bytes) => out.extend_from_slice(bytes),
            TestValue::Shorts(values) => values.iter().for_each(|v| put_u16(&mut out, order, *v)),
            TestValue::Longs(values) => values.iter().for_each(|v| put_u32(&mut out, order, *v)),
            TestValue::Rationals(values) => values.iter().for_each(|(n, d)| {
                put_u32(&mut out, order, *n);
                put_u32(&mut out, order, *d);
            }),
            TestValue::SRationals(values) => values.iter().for_each(|(n, d)| {
                put_u32(&mut out, order, *n as u32);
                put_u32(&mut out, order, *d as u32);
            }),
        }
        out
    }
}

pub fn put_u16(out: &mut Vec<u8>, order: ByteOrder, value: u16) {
    let mut buf = [0u8; 2];
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_u16(&mut buf, value),
        ByteOrder::BigEndian => BigEndian::write_u16(&mut buf, value),
    }
    out.extend_from_slice(&buf);
}

pub fn put_u32(out: &mut Vec<u8>, order: ByteOrder, value: u32) {
    let mut buf = [0u8; 4];
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_u32(&mut buf, value),
        ByteOrder::BigEndian => BigEndian::write_u32(&mut buf, value),
    }
    out.extend_from_slice(&buf);
}

/// Writes a TIFF structure into memory
///
/// IFDs are appended in the order they are written, so sub-IFDs are written
/// first and their returned offsets are used in the parent's pointer tags.
pub struct TiffWriter {
    order: ByteOrder,
    data: Vec<u8>,
}

impl TiffWriter {
    /// Starts a buffer with a header whose first IFD offset is 0
    pub fn new(order: ByteOrder) -> Self {
        let mut data = match order {
            ByteOrder::LittleEndian => b"II".to_vec(),
            ByteOrder::BigEndian => b"MM".to_vec(),
        };
        put_u16(&mut data, order, 42);
        put_u32(&mut data, order, 0);
        TiffWriter { order, data }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn position(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn append(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.position();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Writes an IFD followed by its out-of-line values, returning its offset
    pub fn write_ifd(&mut self, entries: &[TestEntry], next_ifd: u32) -> u32 {
        let order = self.order;
        let offset = self.position();
        let mut value_area_offset = offset + 2 + entries.len() as u32 * 12 + 4;
        let mut value_area = Vec::new();

        put_u16(&mut self.data, order, entries.len() as u16);
        for entry in entries {
            put_u16(&mut self.data, order, entry.tag);
            put_u16(&mut self.data, order, entry.field_type);
            put_u32(&mut self.data, order, entry.count);

            let payload = entry.encode(order);
            if payload.len() <= 4 {
                let mut field = payload.clone();
                field.resize(4, 0);
                self.data.extend_from_slice(&field);
            } else {
                put_u32(&mut self.data, order, value_area_offset);
                value_area.extend_from_slice(&payload);
                if payload.len() % 2 == 1 {
                    value_area.push(0);
                }
                value_area_offset = offset + 2 + entries.len() as u32 * 12 + 4 + value_area.len() as u32;
            }
        }
        put_u32(&mut self.data, order, next_ifd);
        self.data.extend_from_slice(&value_area);

        offset
    }

    /// Points the header at the first IFD
    pub fn set_first_ifd(&mut self, offset: u32) {
        let mut field = Vec::new();
        put_u32(&mut field, self.order, offset);
        self.data[4..8].copy_from_slice(&field);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Wraps TIFF bytes in an `Exif\0\0` APP1 segment of a minimal JPEG
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];

    // An unrelated APP0 before the EXIF segment
    jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    jpeg.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");

    let length = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&length.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);

    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
    jpeg
}

/// Builds a box with a 32-bit size header
pub fn iso_box(box_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((8 + body.len()) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(box_type);
    out.extend_from_slice(body);
    out
}

/// Builds a full box: version and flags precede the body
pub fn full_box(box_type: &[u8; 4], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut payload = vec![version];
    payload.extend_from_slice(&flags.to_be_bytes()[1..]);
    payload.extend_from_slice(body);
    iso_box(box_type, &payload)
}

/// Builds a HEIC file whose `Exif` item holds `exif_payload`
///
/// The payload is stored after a 10 byte prefix (a 4 byte header offset
/// and `Exif\0\0`). `iloc_first` puts `iloc` before `iinf` in `meta`.
pub fn heic_with_exif(exif_payload: &[u8], iloc_first: bool) -> Vec<u8> {
    let ftyp = iso_box(b"ftyp", b"heic\0\0\0\0mif1heic");

    // iinf v0: entry_count u16, one infe v2 for item 2 of type Exif
    let mut infe_body = Vec::new();
    infe_body.extend_from_slice(&2u16.to_be_bytes()); // item_ID
    infe_body.extend_from_slice(&0u16.to_be_bytes()); // protection index
    infe_body.extend_from_slice(b"Exif");
    infe_body.push(0); // item_name
    let infe = full_box(b"infe", 2, 0, &infe_body);

    let mut iinf_body = 1u16.to_be_bytes().to_vec();
    iinf_body.extend_from_slice(&infe);
    let iinf = full_box(b"iinf", 0, 0, &iinf_body);

    let mut exif_item = vec![0, 0, 0, 6];
    exif_item.extend_from_slice(b"Exif\0\0");
    exif_item.extend_from_slice(exif_payload);
    exif_item.extend_from_slice(&[0u8; 10]);

    // The iloc size is fixed, so the mdat position can be computed up front
    let iloc_len = 8 + 4 + 2 + 2 + 2 + 2 + 2 + 4 + 2 + 4 + 4;
    let meta_len = 8 + 4 + iinf.len() + iloc_len;
    let mdat_body_offset = (ftyp.len() + meta_len + 8) as u32;

    // iloc v1: offset_size 4, length_size 4, base_offset_size 4, index_size 0
    let mut iloc_body = vec![0x44, 0x40];
    iloc_body.extend_from_slice(&1u16.to_be_bytes()); // item_count
    iloc_body.extend_from_slice(&2u16.to_be_bytes()); // item_ID
    iloc_body.extend_from_slice(&0u16.to_be_bytes()); // construction_method
    iloc_body.extend_from_slice(&0u16.to_be_bytes()); // data_reference_index
    iloc_body.extend_from_slice(&mdat_body_offset.to_be_bytes()); // base_offset
    iloc_body.extend_from_slice(&1u16.to_be_bytes()); // extent_count
    iloc_body.extend_from_slice(&0u32.to_be_bytes()); // extent_offset
    iloc_body.extend_from_slice(&(exif_item.len() as u32).to_be_bytes()); // extent_length
    let iloc = full_box(b"iloc", 1, 0, &iloc_body);
    assert_eq!(iloc.len(), iloc_len);

    let mut meta_body = Vec::new();
    if iloc_first {
        meta_body.extend_from_slice(&iloc);
        meta_body.extend_from_slice(&iinf);
    } else {
        meta_body.extend_from_slice(&iinf);
        meta_body.extend_from_slice(&iloc);
    }
    let meta = full_box(b"meta", 0, 0, &meta_body);
    assert_eq!(meta.len(), meta_len);

    let mut file = ftyp;
    file.extend_from_slice(&meta);
    file.extend_from_slice(&iso_box(b"mdat", &exif_item));
    file
}
