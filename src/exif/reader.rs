//! EXIF parsing entry point and its options

use log::{debug, info, warn};

use crate::exif::info::Info;
use crate::exif::locate::{locate_exif, Container};
use crate::exif::maker_note::{read_maker_note, MakerNote, Vendor};
use crate::io::seekable::ReadAt;
use crate::io::section::Section;
use crate::tiff::constants::{exif_tags, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::header::{read_header, Header};
use crate::tiff::ifd::{read_ifd, IFD};
use crate::utils::tag_utils::TagSpace;

/// Default cap on the bytes copied out of the source for one EXIF block
pub const DEFAULT_MAX_EXIF_SIZE: u64 = 64 * 1024 * 1024;

/// Options controlling how an EXIF block is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail the parse when an optional IFD cannot be decoded
    pub strict: bool,
    /// Largest EXIF block that will be loaded into memory
    pub max_exif_size: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict: false,
            max_exif_size: DEFAULT_MAX_EXIF_SIZE,
        }
    }
}

/// Builder for `ExifReader`
#[derive(Debug, Default)]
pub struct ExifReaderBuilder {
    options: ParseOptions,
}

impl ExifReaderBuilder {
    pub fn new() -> Self {
        ExifReaderBuilder::default()
    }

    /// Propagate errors from IFD1, the Exif, GPS and maker note IFDs
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn max_exif_size(mut self, bytes: u64) -> Self {
        self.options.max_exif_size = bytes;
        self
    }

    pub fn build(self) -> ExifReader {
        ExifReader {
            options: self.options,
        }
    }
}

/// Locates and decodes EXIF metadata
#[derive(Debug, Clone, Default)]
pub struct ExifReader {
    options: ParseOptions,
}

impl ExifReader {
    /// Creates a reader with default options
    pub fn new() -> Self {
        ExifReader::default()
    }

    pub fn builder() -> ExifReaderBuilder {
        ExifReaderBuilder::new()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses EXIF metadata from any random-access source
    pub fn read_from<S: ReadAt + 'static>(&self, source: S) -> TiffResult<Info> {
        self.read(&Section::new(source))
    }

    /// Locates the EXIF block in `source`, copies it out and decodes it
    ///
    /// The returned `Info` does not keep `source` alive.
    pub fn read(&self, source: &Section) -> TiffResult<Info> {
        let location = locate_exif(source)?;
        info!("Found EXIF in {} container at offset {}", location.container, location.offset);

        if location.length > self.options.max_exif_size {
            return Err(TiffError::ExifTooLarge {
                length: location.length,
                limit: self.options.max_exif_size,
            });
        }

        let block = source.sub(location.offset, location.length)?.load()?;
        self.decode(block, Some(location.container))
    }

    /// Decodes a section that starts with a TIFF header
    pub fn decode(&self, tiff: Section, container: Option<Container>) -> TiffResult<Info> {
        let header = read_header(tiff)?;
        let ifd0 = read_ifd(&header, header.offset_of_ifd())?;
        debug!("IFD0: {} entries", ifd0.entry_count());

        let ifd1 = match ifd0.next_ifd_offset {
            0 => None,
            offset => self.optional("IFD1", read_ifd(&header, offset))?,
        };

        let exif_ifd = match pointer(&ifd0, tags::EXIF_IFD_POINTER)? {
            Some(offset) => self.optional(
                "Exif IFD",
                read_ifd(&header, offset).map(|ifd| ifd.with_space(TagSpace::Exif)),
            )?,
            None => None,
        };

        let maker_note = match &exif_ifd {
            Some(exif_ifd) => self.optional("maker note", self.maker_note(&header, &ifd0, exif_ifd))?.flatten(),
            None => None,
        };

        let gps_ifd = match pointer(&ifd0, tags::GPS_INFO_IFD_POINTER)? {
            Some(offset) => self.optional(
                "GPS IFD",
                read_ifd(&header, offset).map(|ifd| ifd.with_space(TagSpace::Gps)),
            )?,
            None => None,
        };

        Ok(Info::new(container, header, ifd0, ifd1, exif_ifd, gps_ifd, maker_note))
    }

    fn maker_note(&self, header: &Header, ifd0: &IFD, exif_ifd: &IFD) -> TiffResult<Option<MakerNote>> {
        let offset = match exif_ifd.get_entry(exif_tags::MAKER_NOTE) {
            Some(entry) if entry.value_offset() > 0 => entry.value_offset(),
            _ => return Ok(None),
        };
        let make = match ifd0.get_entry(tags::MAKE) {
            Some(entry) => entry.string_value()?,
            None => return Ok(None),
        };

        match Vendor::from_make(&make) {
            Some(vendor) => read_maker_note(header, vendor, offset).map(Some),
            None => {
                debug!("No maker note layout for make {:?}", make);
                Ok(None)
            }
        }
    }

    /// Applies the strictness policy to an optional structure
    fn optional<T>(&self, what: &str, result: TiffResult<T>) -> TiffResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if !self.options.strict => {
                warn!("Skipping {}: {}", what, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Reads a sub-IFD pointer, treating 0 as absent
fn pointer(ifd: &IFD, tag: u16) -> TiffResult<Option<u32>> {
    match ifd.get_entry(tag) {
        Some(entry) => {
            let offset = entry.value_offset();
            Ok((offset > 0).then_some(offset))
        }
        None => Ok(None),
    }
}
