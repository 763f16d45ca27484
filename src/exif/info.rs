//! Decoded EXIF metadata and its field accessors
//!
//! Accessors look values up on demand. A missing IFD or tag gives
//! `Ok(None)`; an entry that is present but undecodable is an error.

use crate::exif::datetime::ExifDateTime;
use crate::exif::locate::Container;
use crate::exif::maker_note::{MakerNote, MakerNoteKind, Vendor};
use crate::num::Fraction;
use crate::tiff::constants::{canon_tags, exif_tags, gps_tags, nikon_tags, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::header::Header;
use crate::tiff::ifd::{IFDEntry, IFD};
use crate::tiff::types::Value;

/// Converts degrees, minutes and seconds to decimal degrees
///
/// Returns `None` unless exactly three values are given.
pub fn dms(values: &[Fraction]) -> Option<f64> {
    match values {
        [degrees, minutes, seconds] => {
            Some(degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0)
        }
        _ => None,
    }
}

/// Formats an exposure time as photographers write it
///
/// Times below one second become `1/N`; anything else keeps six significant
/// digits in the style of C's `%g`. A zero denominator has no meaningful
/// rendering.
pub fn format_exposure(time: Fraction) -> Option<String> {
    let (numerator, denominator) = (time.numerator(), time.denominator());
    if denominator == 0 {
        return None;
    }
    if numerator == 0 {
        return Some("0".to_string());
    }
    if numerator > 0 && numerator < denominator {
        Some(format!("1/{}", time.reciprocal().to_f64() as i64))
    } else {
        Some(format_general(time.to_f64()))
    }
}

/// Six significant digits, switching to exponent form outside 1e-4..1e6
fn format_general(value: f64) -> String {
    let scientific = format!("{:.5e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs());
    }

    let decimals = (5 - exponent) as usize;
    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Formats the Nikon lens tuple: focal min/max and aperture min/max
fn format_nikon_lens(values: &[Fraction]) -> Option<String> {
    let [min_focal, max_focal, min_aperture, max_aperture] = values else {
        return None;
    };

    let (min_focal, max_focal) = (min_focal.to_f64() as i64, max_focal.to_f64() as i64);
    let (min_aperture, max_aperture) = (min_aperture.to_f64(), max_aperture.to_f64());

    let focal = if min_focal == max_focal {
        format!("{}", min_focal)
    } else {
        format!("{}-{}", min_focal, max_focal)
    };
    let aperture = if min_aperture == max_aperture {
        format!("{}", min_aperture)
    } else {
        format!("{}-{}", min_aperture, max_aperture)
    };

    Some(format!("{}mm f/{}", focal, aperture))
}

/// Everything decoded from one EXIF block
#[derive(Debug, Clone)]
pub struct Info {
    container: Option<Container>,
    header: Header,
    ifd0: IFD,
    ifd1: Option<IFD>,
    exif_ifd: Option<IFD>,
    gps_ifd: Option<IFD>,
    maker_note: Option<MakerNote>,
}

impl Info {
    pub(crate) fn new(
        container: Option<Container>,
        header: Header,
        ifd0: IFD,
        ifd1: Option<IFD>,
        exif_ifd: Option<IFD>,
        gps_ifd: Option<IFD>,
        maker_note: Option<MakerNote>,
    ) -> Self {
        Info {
            container,
            header,
            ifd0,
            ifd1,
            exif_ifd,
            gps_ifd,
            maker_note,
        }
    }

    /// Container the block came from, if it was located in one
    pub fn container(&self) -> Option<Container> {
        self.container
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn ifd0(&self) -> &IFD {
        &self.ifd0
    }

    /// The thumbnail IFD
    pub fn ifd1(&self) -> Option<&IFD> {
        self.ifd1.as_ref()
    }

    pub fn exif_ifd(&self) -> Option<&IFD> {
        self.exif_ifd.as_ref()
    }

    pub fn gps_ifd(&self) -> Option<&IFD> {
        self.gps_ifd.as_ref()
    }

    pub fn maker_note(&self) -> Option<&MakerNote> {
        self.maker_note.as_ref()
    }

    pub fn maker_note_ifd(&self) -> Option<&IFD> {
        self.maker_note.as_ref().map(|note| &note.ifd)
    }

    pub fn maker_note_kind(&self) -> Option<MakerNoteKind> {
        self.maker_note.as_ref().map(|note| note.kind)
    }

    pub fn vendor(&self) -> Option<Vendor> {
        self.maker_note_kind().map(|kind| kind.vendor())
    }

    /// Every decoded IFD with a label, in file order
    pub fn ifds(&self) -> Vec<(&'static str, &IFD)> {
        let mut ifds = vec![("IFD0", &self.ifd0)];
        if let Some(ifd) = &self.ifd1 {
            ifds.push(("IFD1", ifd));
        }
        if let Some(ifd) = &self.exif_ifd {
            ifds.push(("Exif", ifd));
        }
        if let Some(ifd) = &self.gps_ifd {
            ifds.push(("GPS", ifd));
        }
        if let Some(note) = &self.maker_note {
            ifds.push(("MakerNote", &note.ifd));
        }
        ifds
    }

    pub fn make(&self) -> TiffResult<Option<String>> {
        string(Some(&self.ifd0), tags::MAKE)
    }

    pub fn model(&self) -> TiffResult<Option<String>> {
        string(Some(&self.ifd0), tags::MODEL)
    }

    pub fn software(&self) -> TiffResult<Option<String>> {
        string(Some(&self.ifd0), tags::SOFTWARE)
    }

    /// File change date and time, as stored
    pub fn date_time(&self) -> TiffResult<Option<String>> {
        string(Some(&self.ifd0), tags::DATE_TIME)
    }

    pub fn orientation(&self) -> TiffResult<Option<u16>> {
        entry(Some(&self.ifd0), tags::ORIENTATION)
            .map(IFDEntry::short_value)
            .transpose()
    }

    /// Exposure time, e.g. `"1/250"` or `"2.5"`
    pub fn exposure_time(&self) -> TiffResult<Option<String>> {
        match single_rational(self.exif_ifd(), exif_tags::EXPOSURE_TIME)? {
            Some(time) => Ok(format_exposure(time)),
            None => Ok(None),
        }
    }

    pub fn f_number(&self) -> TiffResult<Option<f64>> {
        entry(self.exif_ifd(), exif_tags::F_NUMBER)
            .map(|entry| entry.rational_value().map(|v| v.to_f64()))
            .transpose()
    }

    pub fn iso_speed(&self) -> TiffResult<Option<u32>> {
        entry(self.exif_ifd(), exif_tags::ISO_SPEED_RATINGS)
            .map(IFDEntry::long_value)
            .transpose()
    }

    /// Focal length in millimetres
    pub fn focal_length(&self) -> TiffResult<Option<f64>> {
        entry(self.exif_ifd(), exif_tags::FOCAL_LENGTH)
            .map(|entry| entry.rational_value().map(|v| v.to_f64()))
            .transpose()
    }

    pub fn focal_length_in_35mm(&self) -> TiffResult<Option<u32>> {
        entry(self.exif_ifd(), exif_tags::FOCAL_LENGTH_IN_35MM_FILM)
            .map(IFDEntry::long_value)
            .transpose()
    }

    pub fn date_time_original(&self) -> TiffResult<Option<String>> {
        string(self.exif_ifd(), exif_tags::DATE_TIME_ORIGINAL)
    }

    pub fn date_time_digitized(&self) -> TiffResult<Option<String>> {
        string(self.exif_ifd(), exif_tags::DATE_TIME_DIGITIZED)
    }

    pub fn subsec_time(&self) -> TiffResult<Option<String>> {
        string(self.exif_ifd(), exif_tags::SUBSEC_TIME)
    }

    pub fn subsec_time_original(&self) -> TiffResult<Option<String>> {
        string(self.exif_ifd(), exif_tags::SUBSEC_TIME_ORIGINAL)
    }

    pub fn subsec_time_digitized(&self) -> TiffResult<Option<String>> {
        string(self.exif_ifd(), exif_tags::SUBSEC_TIME_DIGITIZED)
    }

    pub fn parsed_date_time(&self) -> TiffResult<Option<ExifDateTime>> {
        parse_date_time(self.date_time()?, self.subsec_time()?)
    }

    pub fn parsed_date_time_original(&self) -> TiffResult<Option<ExifDateTime>> {
        parse_date_time(self.date_time_original()?, self.subsec_time_original()?)
    }

    pub fn parsed_date_time_digitized(&self) -> TiffResult<Option<ExifDateTime>> {
        parse_date_time(self.date_time_digitized()?, self.subsec_time_digitized()?)
    }

    /// Unsigned latitude in decimal degrees
    pub fn gps_latitude(&self) -> TiffResult<Option<f64>> {
        coordinate(self.gps_ifd(), gps_tags::LATITUDE)
    }

    /// Unsigned longitude in decimal degrees
    pub fn gps_longitude(&self) -> TiffResult<Option<f64>> {
        coordinate(self.gps_ifd(), gps_tags::LONGITUDE)
    }

    /// Signed `(latitude, longitude)`, south and west negative
    pub fn gps_position(&self) -> TiffResult<Option<(f64, f64)>> {
        let (latitude, longitude) = match (self.gps_latitude()?, self.gps_longitude()?) {
            (Some(latitude), Some(longitude)) => (latitude, longitude),
            _ => return Ok(None),
        };

        let south = string(self.gps_ifd(), gps_tags::LATITUDE_REF)?.as_deref() == Some("S");
        let west = string(self.gps_ifd(), gps_tags::LONGITUDE_REF)?.as_deref() == Some("W");

        Ok(Some((
            if south { -latitude } else { latitude },
            if west { -longitude } else { longitude },
        )))
    }

    /// Embedded JPEG thumbnail referenced by IFD1
    pub fn thumbnail(&self) -> TiffResult<Option<Vec<u8>>> {
        let offset = entry(self.ifd1(), tags::JPEG_INTERCHANGE_FORMAT).map(IFDEntry::long_value);
        let length = entry(self.ifd1(), tags::JPEG_INTERCHANGE_FORMAT_LENGTH).map(IFDEntry::long_value);

        match (offset, length) {
            (Some(offset), Some(length)) => {
                let (offset, length) = (offset?, length?);
                if length == 0 {
                    return Ok(None);
                }
                self.header
                    .section()
                    .read_vec(offset as u64, length as u64)
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Number of shutter actuations recorded by the camera
    pub fn shutter_count(&self) -> TiffResult<Option<u32>> {
        let note = match &self.maker_note {
            Some(note) => note,
            None => return Ok(None),
        };

        match note.kind.vendor() {
            Vendor::Canon => match note.ifd.get_entry(canon_tags::FILE_INFO) {
                Some(entry) => {
                    let values = entry.short_values()?;
                    Ok(values.get(2).copied().filter(|&count| count > 0).map(u32::from))
                }
                None => Ok(None),
            },
            Vendor::Nikon => note
                .ifd
                .get_entry(nikon_tags::SHUTTER_COUNT)
                .map(IFDEntry::long_value)
                .transpose(),
        }
    }

    /// Lens description from the maker note
    pub fn lens(&self) -> TiffResult<Option<String>> {
        let note = match &self.maker_note {
            Some(note) => note,
            None => return Ok(None),
        };

        match note.kind.vendor() {
            Vendor::Canon => string(Some(&note.ifd), canon_tags::LENS_MODEL),
            Vendor::Nikon => match note.ifd.get_entry(nikon_tags::LENS) {
                Some(entry) => match entry.value()? {
                    Value::Rational(values) => Ok(format_nikon_lens(&values)),
                    _ => Ok(None),
                },
                None => Ok(None),
            },
        }
    }

    /// Canon image number as `"directory-file"`
    pub fn canon_image_number(&self) -> TiffResult<Option<String>> {
        let note = match &self.maker_note {
            Some(note) if note.kind == MakerNoteKind::Canon => note,
            _ => return Ok(None),
        };

        match note.ifd.get_entry(canon_tags::IMAGE_NUMBER) {
            Some(entry) => match entry.value()? {
                Value::Long(values) if values.len() == 1 => {
                    let number = values[0];
                    Ok(Some(format!("{}-{}", number / 10000, number % 10000)))
                }
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }
}

fn entry(ifd: Option<&IFD>, tag: u16) -> Option<&IFDEntry> {
    ifd.and_then(|ifd| ifd.get_entry(tag))
}

fn string(ifd: Option<&IFD>, tag: u16) -> TiffResult<Option<String>> {
    entry(ifd, tag).map(IFDEntry::string_value).transpose()
}

/// A RATIONAL entry holding exactly one value
fn single_rational(ifd: Option<&IFD>, tag: u16) -> TiffResult<Option<Fraction>> {
    match entry(ifd, tag) {
        Some(entry) => match entry.value()? {
            Value::Rational(values) if values.len() == 1 => Ok(Some(values[0])),
            _ => Ok(None),
        },
        None => Ok(None),
    }
}

fn coordinate(ifd: Option<&IFD>, tag: u16) -> TiffResult<Option<f64>> {
    match entry(ifd, tag) {
        Some(entry) => match entry.value()? {
            Value::Rational(values) => Ok(dms(&values)),
            _ => Ok(None),
        },
        None => Ok(None),
    }
}

fn parse_date_time(text: Option<String>, subsec: Option<String>) -> TiffResult<Option<ExifDateTime>> {
    Ok(text
        .as_deref()
        .and_then(ExifDateTime::parse)
        .map(|parsed| parsed.with_subsec(subsec)))
}
