//! EXIF assembly tests and the camera file fixtures they share

mod info_tests;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{canon_tags, exif_tags, field_types, gps_tags, nikon_tags, tags};
use crate::tiff::tests::test_utils::{TestEntry, TiffWriter};

pub(crate) const THUMBNAIL: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// Builds the EXIF TIFF block of a camera file
///
/// `maker_note` writes the note into the buffer and returns its offset
/// and length, or `None` for a file without one.
pub(crate) fn camera_tiff(
    order: ByteOrder,
    make: &str,
    maker_note: impl FnOnce(&mut TiffWriter) -> Option<(u32, u32)>,
) -> Vec<u8> {
    let mut writer = TiffWriter::new(order);
    let thumbnail = writer.append(&THUMBNAIL);

    let note = maker_note(&mut writer);

    let gps = writer.write_ifd(
        &[
            TestEntry::ascii(gps_tags::LATITUDE_REF, "S"),
            TestEntry::rational(gps_tags::LATITUDE, &[(31, 1), (59, 1), (36, 1)]),
            TestEntry::ascii(gps_tags::LONGITUDE_REF, "W"),
            TestEntry::rational(gps_tags::LONGITUDE, &[(122, 1), (30, 1), (0, 1)]),
        ],
        0,
    );

    let mut exif_entries = vec![
        TestEntry::rational(exif_tags::EXPOSURE_TIME, &[(1, 250)]),
        TestEntry::rational(exif_tags::F_NUMBER, &[(28, 10)]),
        TestEntry::short(exif_tags::ISO_SPEED_RATINGS, &[400]),
        TestEntry::ascii(exif_tags::DATE_TIME_ORIGINAL, "2021:05:06 07:08:09"),
        TestEntry::ascii(exif_tags::DATE_TIME_DIGITIZED, "2021:05:06 07:08:10"),
        TestEntry::rational(exif_tags::FOCAL_LENGTH, &[(50, 1)]),
    ];
    if let Some((offset, length)) = note {
        exif_entries.push(TestEntry::raw(exif_tags::MAKER_NOTE, field_types::UNDEFINED, length, offset));
    }
    exif_entries.push(TestEntry::ascii(exif_tags::SUBSEC_TIME_ORIGINAL, "25"));
    exif_entries.push(TestEntry::short(exif_tags::FOCAL_LENGTH_IN_35MM_FILM, &[75]));
    let exif = writer.write_ifd(&exif_entries, 0);

    let ifd1 = writer.write_ifd(
        &[
            TestEntry::long(tags::JPEG_INTERCHANGE_FORMAT, &[thumbnail]),
            TestEntry::long(tags::JPEG_INTERCHANGE_FORMAT_LENGTH, &[THUMBNAIL.len() as u32]),
        ],
        0,
    );

    let ifd0 = writer.write_ifd(
        &[
            TestEntry::ascii(tags::MAKE, make),
            TestEntry::ascii(tags::MODEL, "Test Body"),
            TestEntry::short(tags::ORIENTATION, &[6]),
            TestEntry::ascii(tags::SOFTWARE, "Firmware 1.1"),
            TestEntry::ascii(tags::DATE_TIME, "2021:05:07 10:00:00"),
            TestEntry::long(tags::EXIF_IFD_POINTER, &[exif]),
            TestEntry::long(tags::GPS_INFO_IFD_POINTER, &[gps]),
        ],
        ifd1,
    );
    writer.set_first_ifd(ifd0);
    writer.into_bytes()
}

fn span(writer: &TiffWriter, offset: u32) -> Option<(u32, u32)> {
    Some((offset, writer.position() - offset))
}

pub(crate) fn canon_note(writer: &mut TiffWriter) -> Option<(u32, u32)> {
    let offset = writer.write_ifd(
        &[
            TestEntry::long(canon_tags::IMAGE_NUMBER, &[1234567]),
            TestEntry::short(canon_tags::FILE_INFO, &[1, 0, 1234, 0]),
            TestEntry::ascii(canon_tags::LENS_MODEL, "EF50mm f/1.8 II"),
        ],
        0,
    );
    span(writer, offset)
}

fn nikon_entries(lens: &[(u32, u32)]) -> Vec<TestEntry> {
    vec![
        TestEntry::rational(nikon_tags::LENS, lens),
        TestEntry::long(nikon_tags::SHUTTER_COUNT, &[4242]),
    ]
}

pub(crate) const ZOOM_LENS: [(u32, u32); 4] = [(180, 10), (550, 10), (35, 10), (56, 10)];
pub(crate) const PRIME_LENS: [(u32, u32); 4] = [(500, 10), (500, 10), (18, 10), (18, 10)];

/// Plain IFD at the note offset
pub(crate) fn nikon_type2_note(writer: &mut TiffWriter) -> Option<(u32, u32)> {
    let offset = writer.write_ifd(&nikon_entries(&ZOOM_LENS), 0);
    span(writer, offset)
}

/// `Nikon\0\x01\0` then an IFD using the outer header
pub(crate) fn nikon_type1_note(writer: &mut TiffWriter) -> Option<(u32, u32)> {
    let offset = writer.append(b"Nikon\0\x01\0");
    writer.write_ifd(&nikon_entries(&ZOOM_LENS), 0);
    span(writer, offset)
}

/// `Nikon\0\x02\x10\0\0` then a big-endian TIFF structure of its own
pub(crate) fn nikon_type3_note(writer: &mut TiffWriter) -> Option<(u32, u32)> {
    let offset = writer.append(b"Nikon\0\x02\x10\0\0");

    let mut nested = TiffWriter::new(ByteOrder::BigEndian);
    let ifd = nested.write_ifd(&nikon_entries(&PRIME_LENS), 0);
    nested.set_first_ifd(ifd);
    writer.append(&nested.into_bytes());

    span(writer, offset)
}

pub(crate) fn no_note(_writer: &mut TiffWriter) -> Option<(u32, u32)> {
    None
}
