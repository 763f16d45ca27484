//! Tests for the Info field accessors

extern crate std;

use crate::exif::info::{dms, format_exposure};
use crate::exif::reader::ExifReader;
use crate::io::byte_order::ByteOrder;
use crate::num::Fraction;
use crate::tiff::constants::{exif_tags, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::tests::test_utils::{TestEntry, TiffWriter};
use super::{camera_tiff, no_note, THUMBNAIL};

fn decode(tiff: Vec<u8>) -> crate::exif::Info {
    ExifReader::new().read_from(tiff).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_dms() {
    let values = [Fraction::new(31, 1), Fraction::new(59, 1), Fraction::new(36, 1)];
    std::assert!(close(dms(&values).unwrap(), 31.0 + 59.0 / 60.0 + 36.0 / 3600.0));

    std::assert_eq!(dms(&values[..2]), None);
}

#[test]
fn test_format_exposure() {
    std::assert_eq!(format_exposure(Fraction::new(1, 250)).as_deref(), Some("1/250"));
    std::assert_eq!(format_exposure(Fraction::new(10, 1250)).as_deref(), Some("1/125"));
    std::assert_eq!(format_exposure(Fraction::new(10, 4)).as_deref(), Some("2.5"));
    std::assert_eq!(format_exposure(Fraction::new(30, 1)).as_deref(), Some("30"));
    std::assert_eq!(format_exposure(Fraction::new(0, 1)).as_deref(), Some("0"));
    std::assert_eq!(format_exposure(Fraction::new(1, 0)), None);
}

#[test]
fn test_format_exposure_long_times() {
    std::assert_eq!(format_exposure(Fraction::new(10, 3)).as_deref(), Some("3.33333"));
    std::assert_eq!(format_exposure(Fraction::new(1, 1)).as_deref(), Some("1"));
    std::assert_eq!(format_exposure(Fraction::new(123456789, 1)).as_deref(), Some("1.23457e+08"));
    std::assert_eq!(format_exposure(Fraction::new(4294967295, 1)).as_deref(), Some("4.29497e+09"));
    std::assert_eq!(format_exposure(Fraction::new(-1, 2)).as_deref(), Some("-0.5"));
}

#[test]
fn test_camera_fields() {
    let info = decode(camera_tiff(ByteOrder::LittleEndian, "Test Maker", no_note));

    std::assert_eq!(info.model().unwrap().as_deref(), Some("Test Body"));
    std::assert_eq!(info.software().unwrap().as_deref(), Some("Firmware 1.1"));
    std::assert_eq!(info.orientation().unwrap(), Some(6));
    std::assert_eq!(info.date_time().unwrap().as_deref(), Some("2021:05:07 10:00:00"));
    std::assert_eq!(info.exposure_time().unwrap().as_deref(), Some("1/250"));
    std::assert!(close(info.f_number().unwrap().unwrap(), 2.8));
    std::assert_eq!(info.iso_speed().unwrap(), Some(400));
    std::assert!(close(info.focal_length().unwrap().unwrap(), 50.0));
    std::assert_eq!(info.focal_length_in_35mm().unwrap(), Some(75));
}

#[test]
fn test_timestamps() {
    let info = decode(camera_tiff(ByteOrder::BigEndian, "Test Maker", no_note));

    std::assert_eq!(info.date_time_original().unwrap().as_deref(), Some("2021:05:06 07:08:09"));
    std::assert_eq!(info.date_time_digitized().unwrap().as_deref(), Some("2021:05:06 07:08:10"));
    std::assert_eq!(info.subsec_time().unwrap(), None);
    std::assert_eq!(info.subsec_time_original().unwrap().as_deref(), Some("25"));
    std::assert_eq!(info.subsec_time_digitized().unwrap(), None);

    let original = info.parsed_date_time_original().unwrap().unwrap();
    std::assert_eq!(original.to_string(), "2021-05-06T07:08:09.25");
    let changed = info.parsed_date_time().unwrap().unwrap();
    std::assert_eq!(changed.to_string(), "2021-05-07T10:00:00");
    std::assert_eq!(info.parsed_date_time_digitized().unwrap().unwrap().second, 10);
}

#[test]
fn test_gps() {
    let info = decode(camera_tiff(ByteOrder::LittleEndian, "Test Maker", no_note));

    let latitude = info.gps_latitude().unwrap().unwrap();
    let longitude = info.gps_longitude().unwrap().unwrap();
    std::assert!(close(latitude, 31.0 + 59.0 / 60.0 + 36.0 / 3600.0));
    std::assert!(close(longitude, 122.5));

    let (signed_lat, signed_lon) = info.gps_position().unwrap().unwrap();
    std::assert!(close(signed_lat, -latitude));
    std::assert!(close(signed_lon, -122.5));
}

#[test]
fn test_thumbnail_and_ifd_listing() {
    let info = decode(camera_tiff(ByteOrder::LittleEndian, "Test Maker", no_note));

    std::assert_eq!(info.thumbnail().unwrap(), Some(THUMBNAIL.to_vec()));
    let labels: Vec<&str> = info.ifds().iter().map(|(label, _)| *label).collect();
    std::assert_eq!(labels, vec!["IFD0", "IFD1", "Exif", "GPS"]);
}

#[test]
fn test_absent_fields_are_none() {
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian);
    let ifd0 = writer.write_ifd(&[TestEntry::ascii(tags::MAKE, "Canon")], 0);
    writer.set_first_ifd(ifd0);
    let info = decode(writer.into_bytes());

    std::assert_eq!(info.make().unwrap().as_deref(), Some("Canon"));
    std::assert_eq!(info.model().unwrap(), None);
    std::assert_eq!(info.exposure_time().unwrap(), None);
    std::assert_eq!(info.f_number().unwrap(), None);
    std::assert_eq!(info.gps_latitude().unwrap(), None);
    std::assert_eq!(info.gps_position().unwrap(), None);
    std::assert_eq!(info.thumbnail().unwrap(), None);
    std::assert_eq!(info.shutter_count().unwrap(), None);
    std::assert_eq!(info.lens().unwrap(), None);
    std::assert_eq!(info.canon_image_number().unwrap(), None);
    std::assert_eq!(info.parsed_date_time_original().unwrap(), None);
    std::assert_eq!(info.ifds().len(), 1);
}

#[test]
fn test_wrong_type_is_an_error() {
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian);
    let exif = writer.write_ifd(&[TestEntry::short(exif_tags::F_NUMBER, &[28])], 0);
    let ifd0 = writer.write_ifd(
        &[
            TestEntry::short(tags::MAKE, &[1, 2, 3]),
            TestEntry::long(tags::EXIF_IFD_POINTER, &[exif]),
        ],
        0,
    );
    writer.set_first_ifd(ifd0);
    let info = decode(writer.into_bytes());

    std::assert!(matches!(info.make(), Err(TiffError::TypeMismatch { tag: tags::MAKE, .. })));
    std::assert!(matches!(info.f_number(), Err(TiffError::TypeMismatch { .. })));
}

#[test]
fn test_placeholder_timestamp_parses_to_none() {
    let mut writer = TiffWriter::new(ByteOrder::LittleEndian);
    let ifd0 = writer.write_ifd(&[TestEntry::ascii(tags::DATE_TIME, "0000:00:00 00:00:00")], 0);
    writer.set_first_ifd(ifd0);
    let info = decode(writer.into_bytes());

    std::assert!(info.date_time().unwrap().is_some());
    std::assert_eq!(info.parsed_date_time().unwrap(), None);
}
