//! Integration tests for reading EXIF through the public API

extern crate std;

use std::fs;
use std::io::Cursor;

use exifkit::exif::{Container, ExifReader};
use exifkit::io::{Section, SharedReader};
use exifkit::{ExifKit, ParseOptions, TiffError};

/// A little-endian EXIF block: Make, Model and an Exif IFD with ExposureTime
fn sample_tiff() -> Vec<u8> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.extend_from_slice(b"II");
    buffer.extend_from_slice(&[42, 0]);
    buffer.extend_from_slice(&[8, 0, 0, 0]); // IFD0 at 8

    // IFD0 with three entries, ends at 50
    buffer.extend_from_slice(&[3, 0]);

    // Make (0x010F), ASCII x6, stored at 50
    buffer.extend_from_slice(&[0x0F, 0x01, 2, 0, 6, 0, 0, 0, 50, 0, 0, 0]);
    // Model (0x0110), ASCII x4, inline
    buffer.extend_from_slice(&[0x10, 0x01, 2, 0, 4, 0, 0, 0]);
    buffer.extend_from_slice(b"EOS\0");
    // ExifIFDPointer (0x8769), LONG x1 = 56
    buffer.extend_from_slice(&[0x69, 0x87, 4, 0, 1, 0, 0, 0, 56, 0, 0, 0]);

    buffer.extend_from_slice(&[0, 0, 0, 0]); // no IFD1
    buffer.extend_from_slice(b"Canon\0");

    // Exif IFD at 56: ExposureTime (0x829A), RATIONAL x1 stored at 74
    buffer.extend_from_slice(&[1, 0]);
    buffer.extend_from_slice(&[0x9A, 0x82, 5, 0, 1, 0, 0, 0, 74, 0, 0, 0]);
    buffer.extend_from_slice(&[0, 0, 0, 0]);
    buffer.extend_from_slice(&[1, 0, 0, 0, 60, 0, 0, 0]);

    std::assert_eq!(buffer.len(), 82);
    buffer
}

/// IFD0 with good Make and Model and a Software string stored far past the end
fn broken_software_tiff() -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.extend_from_slice(b"II");
    buffer.extend_from_slice(&[42, 0]);
    buffer.extend_from_slice(&[8, 0, 0, 0]);

    buffer.extend_from_slice(&[3, 0]);
    // Make (0x010F), ASCII x4, inline
    buffer.extend_from_slice(&[0x0F, 0x01, 2, 0, 4, 0, 0, 0]);
    buffer.extend_from_slice(b"Foo\0");
    // Model (0x0110), ASCII x4, inline
    buffer.extend_from_slice(&[0x10, 0x01, 2, 0, 4, 0, 0, 0]);
    buffer.extend_from_slice(b"Bar\0");
    // Software (0x0131), ASCII x20 at 0x00FF0000
    buffer.extend_from_slice(&[0x31, 0x01, 2, 0, 20, 0, 0, 0, 0, 0, 0xFF, 0]);
    buffer.extend_from_slice(&[0, 0, 0, 0]);

    std::assert_eq!(buffer.len(), 50);
    buffer
}

fn sample_jpeg() -> Vec<u8> {
    jpeg_with(&sample_tiff())
}

fn jpeg_with(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
    jpeg
}

fn iso_box(box_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((8 + body.len()) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(box_type);
    out.extend_from_slice(body);
    out
}

fn meta_box(exif_offset: u32, exif_length: u32) -> Vec<u8> {
    // infe version 2: item 1 of type Exif
    let mut infe = vec![2, 0, 0, 0, 0, 1, 0, 0];
    infe.extend_from_slice(b"Exif\0");
    let mut iinf = vec![0, 0, 0, 0, 0, 1];
    iinf.extend_from_slice(&iso_box(b"infe", &infe));

    // iloc version 0: 4 byte offsets and lengths, one extent for item 1
    let mut iloc = vec![0, 0, 0, 0, 0x44, 0x00, 0, 1, 0, 1, 0, 0, 0, 1];
    iloc.extend_from_slice(&exif_offset.to_be_bytes());
    iloc.extend_from_slice(&exif_length.to_be_bytes());

    let mut meta = vec![0, 0, 0, 0];
    meta.extend_from_slice(&iso_box(b"iinf", &iinf));
    meta.extend_from_slice(&iso_box(b"iloc", &iloc));
    iso_box(b"meta", &meta)
}

fn sample_heic() -> Vec<u8> {
    let mut item = vec![0, 0, 0, 6];
    item.extend_from_slice(b"Exif\0\0");
    item.extend_from_slice(&sample_tiff());

    let ftyp = iso_box(b"ftyp", b"heic\0\0\0\0mif1");
    // The meta box has the same size whatever offset it records
    let item_offset = (ftyp.len() + meta_box(0, 0).len() + 8) as u32;

    let mut file = ftyp;
    file.extend_from_slice(&meta_box(item_offset, item.len() as u32));
    file.extend_from_slice(&iso_box(b"mdat", &item));
    file
}

#[test]
fn test_jpeg_from_bytes() {
    let info = ExifKit::new().read_bytes(sample_jpeg()).unwrap();

    std::assert_eq!(info.container(), Some(Container::Jpeg));
    std::assert_eq!(info.make().unwrap().as_deref(), Some("Canon"));
    std::assert_eq!(info.model().unwrap().as_deref(), Some("EOS"));
    std::assert_eq!(info.exposure_time().unwrap().as_deref(), Some("1/60"));
    std::assert!(info.ifd1().is_none());
    std::assert!(info.gps_ifd().is_none());
}

#[test]
fn test_heic_from_bytes() {
    let info = ExifKit::new().read_bytes(sample_heic()).unwrap();

    std::assert_eq!(info.container(), Some(Container::Heic));
    std::assert_eq!(info.make().unwrap().as_deref(), Some("Canon"));
    std::assert_eq!(info.exposure_time().unwrap().as_deref(), Some("1/60"));
}

#[test]
fn test_read_through_shared_reader() {
    let source = SharedReader::new(Cursor::new(sample_jpeg())).unwrap();
    let info = ExifReader::new().read(&Section::new(source)).unwrap();

    std::assert_eq!(info.model().unwrap().as_deref(), Some("EOS"));
}

#[test]
fn test_read_file_summary_and_dump() {
    let path = std::env::temp_dir().join(format!("exifkit-test-{}.jpg", std::process::id()));
    fs::write(&path, sample_jpeg()).unwrap();

    let kit = ExifKit::new();
    let info = kit.read_file(&path);
    fs::remove_file(&path).unwrap();
    let info = info.unwrap();

    let summary = kit.summary(&info).unwrap();
    std::assert!(summary.contains("Make: Canon"));
    std::assert!(summary.contains("Exposure Time: 1/60"));
    std::assert!(!summary.contains("GPS"));

    let dump = kit.dump(&info);
    std::assert!(dump.contains("[IFD0]"));
    std::assert!(dump.contains("Make"));
    std::assert!(dump.contains("ExposureTime"));
}

#[test]
fn test_box_tree_of_heic_file() {
    let path = std::env::temp_dir().join(format!("exifkit-test-{}.heic", std::process::id()));
    fs::write(&path, sample_heic()).unwrap();

    let tree = ExifKit::new().boxes(&path);
    fs::remove_file(&path).unwrap();
    let tree = tree.unwrap();

    std::assert!(tree.contains("ftyp [FileTypeBox]"));
    std::assert!(tree.contains("  iloc [ItemLocationBox]"));
    std::assert!(tree.contains("type=Exif"));
}

#[test]
fn test_errors() {
    let missing = ExifKit::new().read_file("/definitely/not/here.jpg");
    std::assert!(matches!(missing, Err(TiffError::IoError(_))));

    let not_found = ExifKit::new().read_bytes(b"\x89PNG\r\n\x1a\n".to_vec());
    std::assert!(matches!(not_found, Err(TiffError::ExifNotFound)));

    let limited = ExifKit::with_options(ParseOptions { strict: false, max_exif_size: 16 });
    std::assert!(matches!(
        limited.read_bytes(sample_jpeg()),
        Err(TiffError::ExifTooLarge { length: 82, limit: 16 })
    ));
}

#[test]
fn test_summary_skips_undecodable_field() {
    let jpeg = jpeg_with(&broken_software_tiff());

    let lenient = ExifKit::new();
    let info = lenient.read_bytes(jpeg.clone()).unwrap();
    std::assert!(info.software().is_err());

    let summary = lenient.summary(&info).unwrap();
    std::assert!(summary.contains("Make: Foo"));
    std::assert!(summary.contains("Model: Bar"));
    std::assert!(!summary.contains("Software"));

    let strict = ExifKit::with_options(ParseOptions { strict: true, max_exif_size: 1024 });
    let info = strict.read_bytes(jpeg).unwrap();
    std::assert!(matches!(strict.summary(&info), Err(TiffError::UnexpectedEof(_))));
}
