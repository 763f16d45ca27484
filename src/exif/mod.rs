//! EXIF assembly
//!
//! Finds the EXIF block in a JPEG, HEIC or raw TIFF file, decodes IFD0 and
//! the directories it points to, resolves vendor maker notes, and exposes
//! the common camera fields through `Info`.

pub mod datetime;
pub mod info;
pub mod locate;
pub mod maker_note;
pub mod reader;

#[cfg(test)]
mod tests;

pub use datetime::ExifDateTime;
pub use info::{dms, format_exposure, Info};
pub use locate::{locate_exif, Container, ExifLocation, HeicLocator, JpegLocator, LocatorStrategy, TiffLocator};
pub use maker_note::{MakerNote, MakerNoteKind, Vendor};
pub use reader::{ExifReader, ExifReaderBuilder, ParseOptions, DEFAULT_MAX_EXIF_SIZE};
