//! TIFF and EXIF format constants
//!
//! This module defines constants used throughout the decoding code,
//! replacing magic numbers with descriptive names.

/// TIFF header constants
pub mod header {
    /// Magic number following the byte order marker (42)
    pub const TIFF_MAGIC: u16 = 0x002A;

    /// Header length: marker, magic and first IFD offset
    pub const HEADER_SIZE: usize = 8;

    /// Size of one directory entry record
    pub const ENTRY_SIZE: usize = 12;

    /// Bytes available for an inline entry value
    pub const INLINE_VALUE_SIZE: u64 = 4;
}

/// Field types as defined by TIFF 6.0
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// IFD0 / IFD1 tags
pub mod tags {
    pub const COMPRESSION: u16 = 0x0103;
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const ORIENTATION: u16 = 0x0112;
    pub const SOFTWARE: u16 = 0x0131;
    pub const DATE_TIME: u16 = 0x0132;
    pub const JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;        // Thumbnail offset
    pub const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202; // Thumbnail length
    pub const EXIF_IFD_POINTER: u16 = 0x8769;
    pub const GPS_INFO_IFD_POINTER: u16 = 0x8825;
}

/// Exif IFD tags
pub mod exif_tags {
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const F_NUMBER: u16 = 0x829D;
    pub const ISO_SPEED_RATINGS: u16 = 0x8827;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
    pub const FOCAL_LENGTH: u16 = 0x920A;
    pub const MAKER_NOTE: u16 = 0x927C;
    pub const SUBSEC_TIME: u16 = 0x9290;
    pub const SUBSEC_TIME_ORIGINAL: u16 = 0x9291;
    pub const SUBSEC_TIME_DIGITIZED: u16 = 0x9292;
    pub const FOCAL_LENGTH_IN_35MM_FILM: u16 = 0xA405;
}

/// GPS IFD tags
pub mod gps_tags {
    pub const LATITUDE_REF: u16 = 0x0001;
    pub const LATITUDE: u16 = 0x0002;
    pub const LONGITUDE_REF: u16 = 0x0003;
    pub const LONGITUDE: u16 = 0x0004;
}

/// Canon maker note tags
pub mod canon_tags {
    pub const IMAGE_NUMBER: u16 = 0x0008;
    pub const FILE_INFO: u16 = 0x0093;  // Shutter count is the third SHORT
    pub const LENS_MODEL: u16 = 0x0095;
}

/// Nikon maker note tags
pub mod nikon_tags {
    pub const LENS: u16 = 0x0084;           // Four RATIONALs: focal min/max, aperture min/max
    pub const SHUTTER_COUNT: u16 = 0x00A7;
}
