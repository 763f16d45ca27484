//! Image File Directory (IFD) structures and methods
//!
//! An IFD is a counted table of 12-byte directory entries followed by the
//! offset of the next IFD. Each entry either carries its value inline in
//! its last four bytes or points at the value elsewhere under the same
//! TIFF header. Values are only decoded when asked for.

use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::io::byte_order::ByteOrderHandler;
use crate::num::Fraction;
use crate::tiff::constants::header as layout;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::Header;
use crate::tiff::types::{Value, ValueType};
use crate::utils::string_utils;
use crate::utils::tag_utils::{self, TagSpace};

/// Represents an Image File Directory (IFD)
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// Offset of this IFD relative to its header
    pub offset: u32,
    /// Offset of the next IFD in the chain, 0 if there is none
    pub next_ifd_offset: u32,
    /// Which tag table names this IFD's tags
    space: TagSpace,
    /// Index into `entries` by tag; the last duplicate wins
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// Tag identifier
    pub tag: u16,
    /// Type of each value
    pub value_type: ValueType,
    /// Number of values
    pub count: u32,
    /// The raw value-or-offset field
    raw: [u8; 4],
    /// Header the offset field is relative to
    header: Header,
}

impl IFDEntry {
    /// Creates an entry bound to the header its offsets are relative to
    pub fn new(header: &Header, tag: u16, value_type: ValueType, count: u32, raw: [u8; 4]) -> Self {
        IFDEntry {
            tag,
            value_type,
            count,
            raw,
            header: header.clone(),
        }
    }

    /// Total size of the value in bytes, `None` for unknown types
    pub fn byte_size(&self) -> Option<u64> {
        self.value_type
            .size()
            .map(|size| size as u64 * self.count as u64)
    }

    /// Determines if the value is stored in the entry itself
    pub fn is_value_inline(&self) -> bool {
        matches!(self.byte_size(), Some(size) if size <= layout::INLINE_VALUE_SIZE)
    }

    /// The four byte field interpreted as an offset (or a LONG value)
    pub fn value_offset(&self) -> u32 {
        self.header.byte_order().u32_from(self.raw)
    }

    /// The four byte field exactly as stored
    pub fn raw_field(&self) -> [u8; 4] {
        self.raw
    }

    /// The header this entry's offsets are relative to
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the value bytes, reading them from the offset if needed
    ///
    /// Inline values never touch the source.
    pub fn bytes_value(&self) -> TiffResult<Vec<u8>> {
        let size = self
            .byte_size()
            .ok_or(TiffError::UnsupportedFieldType(self.value_type.code()))?;

        if size <= layout::INLINE_VALUE_SIZE {
            return Ok(self.raw[..size as usize].to_vec());
        }

        let offset = self.value_offset();
        trace!("Tag {:#06x}: reading {} bytes at offset {}", self.tag, size, offset);
        self.header.section().read_vec(offset as u64, size)
    }

    fn mismatch(&self, expected: &'static str) -> TiffError {
        TiffError::TypeMismatch {
            tag: self.tag,
            expected,
            found: self.value_type,
        }
    }

    /// Decodes `count` values from the value bytes with the header's byte order
    fn read_each<T>(
        &self,
        mut read: impl FnMut(&dyn ByteOrderHandler, &mut Cursor<&[u8]>) -> std::io::Result<T>,
    ) -> TiffResult<Vec<T>> {
        let data = self.bytes_value()?;
        let handler = self.header.handler();
        let mut cursor = Cursor::new(data.as_slice());

        let mut values = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            values.push(read(handler.as_ref(), &mut cursor)?);
        }
        Ok(values)
    }

    fn first<T>(&self, values: Vec<T>) -> TiffResult<T> {
        values
            .into_iter()
            .next()
            .ok_or(TiffError::EmptyValue(self.tag))
    }

    /// Splits ASCII (or byte) values on NUL, dropping empty pieces
    pub fn string_values(&self) -> TiffResult<Vec<String>> {
        match self.value_type {
            ValueType::Ascii | ValueType::Byte | ValueType::Undefined => {}
            _ => return Err(self.mismatch("ASCII")),
        }
        Ok(string_utils::split_nul(&self.bytes_value()?))
    }

    /// First string of an ASCII value, empty if there is none
    pub fn string_value(&self) -> TiffResult<String> {
        Ok(self.string_values()?.into_iter().next().unwrap_or_default())
    }

    pub fn short_values(&self) -> TiffResult<Vec<u16>> {
        match self.value_type {
            ValueType::Byte => self.read_each(|_, c| c.read_u8_value().map(u16::from)),
            ValueType::Short => self.read_each(|h, c| h.read_u16(c)),
            _ => Err(self.mismatch("SHORT")),
        }
    }

    pub fn short_value(&self) -> TiffResult<u16> {
        let values = self.short_values()?;
        self.first(values)
    }

    pub fn sshort_values(&self) -> TiffResult<Vec<i16>> {
        match self.value_type {
            ValueType::SByte => self.read_each(|_, c| c.read_i8_value().map(i16::from)),
            ValueType::SShort => self.read_each(|h, c| h.read_i16(c)),
            _ => Err(self.mismatch("SSHORT")),
        }
    }

    pub fn sshort_value(&self) -> TiffResult<i16> {
        let values = self.sshort_values()?;
        self.first(values)
    }

    /// Unsigned integer values, widening BYTE and SHORT
    pub fn long_values(&self) -> TiffResult<Vec<u32>> {
        match self.value_type {
            ValueType::Byte => self.read_each(|_, c| c.read_u8_value().map(u32::from)),
            ValueType::Short => self.read_each(|h, c| h.read_u16(c).map(u32::from)),
            ValueType::Long => self.read_each(|h, c| h.read_u32(c)),
            _ => Err(self.mismatch("LONG")),
        }
    }

    pub fn long_value(&self) -> TiffResult<u32> {
        let values = self.long_values()?;
        self.first(values)
    }

    /// Signed integer values, widening SBYTE and SSHORT
    pub fn slong_values(&self) -> TiffResult<Vec<i32>> {
        match self.value_type {
            ValueType::SByte => self.read_each(|_, c| c.read_i8_value().map(i32::from)),
            ValueType::SShort => self.read_each(|h, c| h.read_i16(c).map(i32::from)),
            ValueType::SLong => self.read_each(|h, c| h.read_i32(c)),
            _ => Err(self.mismatch("SLONG")),
        }
    }

    pub fn slong_value(&self) -> TiffResult<i32> {
        let values = self.slong_values()?;
        self.first(values)
    }

    pub fn float_values(&self) -> TiffResult<Vec<f32>> {
        match self.value_type {
            ValueType::Float => self.read_each(|h, c| h.read_f32(c)),
            _ => Err(self.mismatch("FLOAT")),
        }
    }

    pub fn float_value(&self) -> TiffResult<f32> {
        let values = self.float_values()?;
        self.first(values)
    }

    pub fn double_values(&self) -> TiffResult<Vec<f64>> {
        match self.value_type {
            ValueType::Float => self.read_each(|h, c| h.read_f32(c).map(f64::from)),
            ValueType::Double => self.read_each(|h, c| h.read_f64(c)),
            _ => Err(self.mismatch("DOUBLE")),
        }
    }

    pub fn double_value(&self) -> TiffResult<f64> {
        let values = self.double_values()?;
        self.first(values)
    }

    pub fn rational_values(&self) -> TiffResult<Vec<Fraction>> {
        match self.value_type {
            ValueType::Rational => self.read_each(|h, c| h.read_rational(c).map(Fraction::from)),
            _ => Err(self.mismatch("RATIONAL")),
        }
    }

    pub fn rational_value(&self) -> TiffResult<Fraction> {
        let values = self.rational_values()?;
        self.first(values)
    }

    pub fn srational_values(&self) -> TiffResult<Vec<Fraction>> {
        match self.value_type {
            ValueType::SRational => self.read_each(|h, c| h.read_srational(c).map(Fraction::from)),
            _ => Err(self.mismatch("SRATIONAL")),
        }
    }

    pub fn srational_value(&self) -> TiffResult<Fraction> {
        let values = self.srational_values()?;
        self.first(values)
    }

    /// Decodes the value according to its stored type
    pub fn value(&self) -> TiffResult<Value> {
        let value = match self.value_type {
            ValueType::Byte => Value::Byte(self.bytes_value()?),
            ValueType::Undefined => Value::Undefined(self.bytes_value()?),
            ValueType::SByte => {
                Value::SByte(self.bytes_value()?.into_iter().map(|b| b as i8).collect())
            }
            ValueType::Ascii => Value::Ascii(self.string_values()?),
            ValueType::Short => Value::Short(self.short_values()?),
            ValueType::SShort => Value::SShort(self.sshort_values()?),
            ValueType::Long => Value::Long(self.long_values()?),
            ValueType::SLong => Value::SLong(self.slong_values()?),
            ValueType::Rational => Value::Rational(self.rational_values()?),
            ValueType::SRational => Value::SRational(self.srational_values()?),
            ValueType::Float => Value::Float(self.float_values()?),
            ValueType::Double => Value::Double(self.double_values()?),
            ValueType::Unknown(code) => return Err(TiffError::UnsupportedFieldType(code)),
        };
        Ok(value)
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self, space: TagSpace) -> String {
        let value_display = match self.value() {
            Ok(value) => value.to_string(),
            Err(e) => format!("<{}>", e),
        };

        format!(
            "Tag: {:#06x} ({}), Type: {}, Count: {}, Value: {}",
            self.tag,
            tag_utils::get_tag_name(space, self.tag),
            self.value_type,
            self.count,
            value_display
        )
    }
}

/// Single byte reads that ignore byte order
trait ByteReadExt {
    fn read_u8_value(&mut self) -> std::io::Result<u8>;
    fn read_i8_value(&mut self) -> std::io::Result<i8>;
}

impl<R: Read> ByteReadExt for R {
    fn read_u8_value(&mut self) -> std::io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_i8_value(&mut self) -> std::io::Result<i8> {
        Ok(self.read_u8_value()? as i8)
    }
}

impl IFD {
    /// Creates an empty IFD at the given offset
    pub fn new(offset: u32) -> Self {
        IFD {
            entries: Vec::new(),
            offset,
            next_ifd_offset: 0,
            space: TagSpace::Tiff,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing the lookup for an already present tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry {:#06x} to IFD at offset {}", entry.tag, self.offset);
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Sets the tag table used to name this IFD's tags
    pub fn with_space(mut self, space: TagSpace) -> Self {
        self.space = space;
        self
    }

    /// The tag table naming this IFD's tags
    pub fn space(&self) -> TagSpace {
        self.space
    }

    /// Gets an entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets all entries in file order
    pub fn get_entries(&self) -> &[IFDEntry] {
        &self.entries
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} IFD (offset: {})", self.space.name(), self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        for entry in &self.entries {
            let value_display = match entry.value() {
                Ok(value) => value.to_string(),
                Err(e) => format!("<{}>", e),
            };
            writeln!(
                f,
                "    {:#06x} {}: {} [{} x{}]",
                entry.tag,
                tag_utils::get_tag_name(self.space, entry.tag),
                value_display,
                entry.value_type,
                entry.count
            )?;
        }

        if self.next_ifd_offset != 0 {
            writeln!(f, "  Next IFD offset: {}", self.next_ifd_offset)?;
        }

        Ok(())
    }
}

/// Reads the IFD at `offset`, relative to `header`
///
/// The whole entry table is read in one bounded read, so a table that runs
/// past the end of the header's view fails before any entry is decoded.
pub fn read_ifd(header: &Header, offset: u32) -> TiffResult<IFD> {
    let section = header.section();
    let handler = header.handler();

    let mut cursor = section.cursor();
    cursor.seek(SeekFrom::Start(offset as u64))?;
    let entry_count = handler.read_u16(&mut cursor)?;
    debug!("IFD at offset {}: {} entries", offset, entry_count);

    let table_size = entry_count as u64 * layout::ENTRY_SIZE as u64 + 4;
    let table = section.read_vec(offset as u64 + 2, table_size)?;
    let mut reader = Cursor::new(table.as_slice());

    let mut ifd = IFD::new(offset);
    for _ in 0..entry_count {
        let tag = handler.read_u16(&mut reader)?;
        let value_type = ValueType::from_code(handler.read_u16(&mut reader)?);
        let count = handler.read_u32(&mut reader)?;
        let mut raw = [0u8; 4];
        reader.read_exact(&mut raw)?;

        trace!("Entry {:#06x}: type={}, count={}", tag, value_type, count);
        ifd.add_entry(IFDEntry::new(header, tag, value_type, count, raw));
    }

    ifd.next_ifd_offset = handler.read_u32(&mut reader)?;
    debug!("Next IFD offset: {}", ifd.next_ifd_offset);

    Ok(ifd)
}
