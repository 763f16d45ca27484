use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use log::{info, warn};

use crate::exif::{ExifReader, Info, ParseOptions};
use crate::io::{Section, SharedReader};
use crate::isobmff::describe_tree;
use crate::tiff::errors::TiffResult;

/// Main interface to the exifkit library
#[derive(Debug, Clone, Default)]
pub struct ExifKit {
    reader: ExifReader,
}

impl ExifKit {
    /// Create an ExifKit instance with default parse options
    pub fn new() -> Self {
        ExifKit::default()
    }

    /// Create an ExifKit instance that parses with `options`
    pub fn with_options(options: ParseOptions) -> Self {
        let reader = ExifReader::builder()
            .strict(options.strict)
            .max_exif_size(options.max_exif_size)
            .build();
        ExifKit { reader }
    }

    pub fn options(&self) -> &ParseOptions {
        self.reader.options()
    }

    /// Read EXIF metadata from a JPEG, HEIC or raw TIFF file
    ///
    /// Only the EXIF block is copied into memory; the file is closed before
    /// this returns.
    ///
    /// # Arguments
    /// * `input_path` - Path to the image file
    ///
    /// # Returns
    /// The decoded metadata or an error
    pub fn read_file<P: AsRef<Path>>(&self, input_path: P) -> TiffResult<Info> {
        let path = input_path.as_ref();
        info!("Reading EXIF from {}", path.display());

        let file = File::open(path)?;
        let source = Section::new(SharedReader::new(file)?);
        self.reader.read(&source)
    }

    /// Read EXIF metadata from an in-memory file
    pub fn read_bytes(&self, bytes: Vec<u8>) -> TiffResult<Info> {
        self.reader.read_from(bytes)
    }

    /// Format the common camera fields of a file
    ///
    /// Fields the file does not carry are left out. In lenient mode a field
    /// that fails to decode is logged and left out too; strict mode returns
    /// the error.
    pub fn summary(&self, info: &Info) -> TiffResult<String> {
        let mut result = String::new();

        if let Some(container) = info.container() {
            let _ = writeln!(result, "  Container: {}", container);
        }
        let _ = writeln!(result, "  Byte order: {}", info.header().byte_order().name());

        push(&mut result, "Make", self.field("Make", info.make())?);
        push(&mut result, "Model", self.field("Model", info.model())?);
        push(&mut result, "Software", self.field("Software", info.software())?);
        push(&mut result, "Orientation", self.field("Orientation", info.orientation())?);

        let dates = [
            ("Date/Time", info.parsed_date_time(), info.date_time()),
            ("Date/Time Original", info.parsed_date_time_original(), info.date_time_original()),
            ("Date/Time Digitized", info.parsed_date_time_digitized(), info.date_time_digitized()),
        ];
        for (label, parsed, raw) in dates {
            let parsed = self.field(label, parsed)?.map(|d| d.to_string());
            let raw = self.field(label, raw)?;
            push(&mut result, label, parsed.or(raw));
        }

        push(&mut result, "Exposure Time", self.field("Exposure Time", info.exposure_time())?);
        push(
            &mut result,
            "F-Number",
            self.field("F-Number", info.f_number())?.map(|f| format!("f/{}", f)),
        );
        push(&mut result, "ISO", self.field("ISO", info.iso_speed())?);
        push(
            &mut result,
            "Focal Length",
            self.field("Focal Length", info.focal_length())?
                .map(|f| format!("{} mm", f)),
        );
        push(
            &mut result,
            "Focal Length (35mm)",
            self.field("Focal Length (35mm)", info.focal_length_in_35mm())?
                .map(|f| format!("{} mm", f)),
        );

        if let Some((latitude, longitude)) = self.field("GPS Position", info.gps_position())? {
            let _ = writeln!(result, "  GPS Position: {:.6}, {:.6}", latitude, longitude);
        }

        push(&mut result, "Maker Note", info.maker_note_kind());
        push(&mut result, "Lens", self.field("Lens", info.lens())?);
        push(&mut result, "Shutter Count", self.field("Shutter Count", info.shutter_count())?);
        push(
            &mut result,
            "Canon Image Number",
            self.field("Canon Image Number", info.canon_image_number())?,
        );
        push(
            &mut result,
            "Thumbnail",
            self.field("Thumbnail", info.thumbnail())?
                .map(|t| format!("{} bytes", t.len())),
        );

        Ok(result)
    }

    /// Applies the strictness policy to one summary field
    fn field<T>(&self, label: &str, value: TiffResult<Option<T>>) -> TiffResult<Option<T>> {
        match value {
            Err(e) if !self.options().strict => {
                warn!("Skipping {}: {}", label, e);
                Ok(None)
            }
            other => other,
        }
    }

    /// List every entry of every decoded IFD
    pub fn dump(&self, info: &Info) -> String {
        let mut result = String::new();
        for (label, ifd) in info.ifds() {
            let _ = writeln!(result, "[{}] {}", label, ifd);
        }
        result
    }

    /// List the ISO-BMFF box tree of a HEIC or MP4 file
    pub fn boxes<P: AsRef<Path>>(&self, input_path: P) -> TiffResult<String> {
        let file = File::open(input_path.as_ref())?;
        let source = Section::new(SharedReader::new(file)?);
        describe_tree(&source)
    }
}

fn push<T: std::fmt::Display>(result: &mut String, label: &str, value: Option<T>) {
    if let Some(value) = value {
        let _ = writeln!(result, "  {}: {}", label, value);
    }
}
