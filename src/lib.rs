pub mod io;
pub mod num;
pub mod tiff;
pub mod isobmff;
pub mod exif;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::ExifKit;

pub use exif::{ExifReader, ExifReaderBuilder, Info, ParseOptions};
pub use num::Fraction;
pub use tiff::{TiffError, TiffResult};
