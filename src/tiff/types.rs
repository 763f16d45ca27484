//! Core TIFF value types

use std::fmt;

use crate::num::Fraction;
use crate::tiff::constants::field_types;

/// The type of a directory entry's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
    /// A type code outside the twelve defined by TIFF 6.0
    Unknown(u16),
}

impl ValueType {
    /// Maps a raw type code to a value type
    pub fn from_code(code: u16) -> Self {
        match code {
            field_types::BYTE => ValueType::Byte,
            field_types::ASCII => ValueType::Ascii,
            field_types::SHORT => ValueType::Short,
            field_types::LONG => ValueType::Long,
            field_types::RATIONAL => ValueType::Rational,
            field_types::SBYTE => ValueType::SByte,
            field_types::UNDEFINED => ValueType::Undefined,
            field_types::SSHORT => ValueType::SShort,
            field_types::SLONG => ValueType::SLong,
            field_types::SRATIONAL => ValueType::SRational,
            field_types::FLOAT => ValueType::Float,
            field_types::DOUBLE => ValueType::Double,
            other => ValueType::Unknown(other),
        }
    }

    /// The raw type code as stored in the entry
    pub fn code(&self) -> u16 {
        match self {
            ValueType::Byte => field_types::BYTE,
            ValueType::Ascii => field_types::ASCII,
            ValueType::Short => field_types::SHORT,
            ValueType::Long => field_types::LONG,
            ValueType::Rational => field_types::RATIONAL,
            ValueType::SByte => field_types::SBYTE,
            ValueType::Undefined => field_types::UNDEFINED,
            ValueType::SShort => field_types::SSHORT,
            ValueType::SLong => field_types::SLONG,
            ValueType::SRational => field_types::SRATIONAL,
            ValueType::Float => field_types::FLOAT,
            ValueType::Double => field_types::DOUBLE,
            ValueType::Unknown(code) => *code,
        }
    }

    /// Size in bytes of a single value, `None` for unknown types
    pub fn size(&self) -> Option<u32> {
        match self {
            ValueType::Byte | ValueType::Ascii | ValueType::SByte | ValueType::Undefined => Some(1),
            ValueType::Short | ValueType::SShort => Some(2),
            ValueType::Long | ValueType::SLong | ValueType::Float => Some(4),
            ValueType::Rational | ValueType::SRational | ValueType::Double => Some(8),
            ValueType::Unknown(_) => None,
        }
    }

    /// Name of the type as used in the TIFF specification
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Byte => "BYTE",
            ValueType::Ascii => "ASCII",
            ValueType::Short => "SHORT",
            ValueType::Long => "LONG",
            ValueType::Rational => "RATIONAL",
            ValueType::SByte => "SBYTE",
            ValueType::Undefined => "UNDEFINED",
            ValueType::SShort => "SSHORT",
            ValueType::SLong => "SLONG",
            ValueType::SRational => "SRATIONAL",
            ValueType::Float => "FLOAT",
            ValueType::Double => "DOUBLE",
            ValueType::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Unknown(code) => write!(f, "Unknown({})", code),
            known => f.write_str(known.name()),
        }
    }
}

/// A fully decoded entry value, one variant per value type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<String>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Fraction>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<Fraction>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Value {
    /// Number of decoded values
    pub fn len(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Undefined(v) => v.len(),
            Value::Ascii(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::Rational(v) | Value::SRational(v) => v.len(),
            Value::SByte(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
        }
    }

    /// Returns true if no values were decoded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Long byte blobs (maker notes, thumbnails) are summarised
const MAX_DISPLAYED_BYTES: usize = 16;

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes.iter().take(MAX_DISPLAYED_BYTES) {
        write!(f, "{:02x}", byte)?;
    }
    if bytes.len() > MAX_DISPLAYED_BYTES {
        write!(f, "... ({} bytes)", bytes.len())?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) | Value::Undefined(v) => write_bytes(f, v),
            Value::Ascii(v) => {
                let quoted: Vec<String> = v.iter().map(|s| format!("{:?}", s)).collect();
                write_list(f, &quoted)
            }
            Value::Short(v) => write_list(f, v),
            Value::Long(v) => write_list(f, v),
            Value::Rational(v) | Value::SRational(v) => write_list(f, v),
            Value::SByte(v) => write_list(f, v),
            Value::SShort(v) => write_list(f, v),
            Value::SLong(v) => write_list(f, v),
            Value::Float(v) => write_list(f, v),
            Value::Double(v) => write_list(f, v),
        }
    }
}
