//! Human-readable listing of a box hierarchy

use std::fmt::Write as _;

use crate::io::section::Section;
use crate::isobmff::box_reader::{BoxReader, FourCC, IsoBox};
use crate::isobmff::boxes::BoxKind;
use crate::tiff::errors::TiffResult;

/// Generic types whose body is a plain sequence of child boxes
const CONTAINER_TYPES: [&[u8; 4]; 8] = [
    b"iprp", b"ipco", b"trak", b"mdia", b"minf", b"stbl", b"dinf", b"edts",
];

/// Returns true if the box body is walked as child boxes
pub fn has_children(iso_box: &IsoBox) -> bool {
    match iso_box.kind() {
        BoxKind::Meta(_) | BoxKind::ItemInfo { .. } | BoxKind::Movie => true,
        BoxKind::Generic => CONTAINER_TYPES
            .iter()
            .any(|t| FourCC::from(*t) == iso_box.box_type()),
        _ => false,
    }
}

/// One line of typed fields for a box, empty for opaque boxes
pub fn describe_kind(kind: &BoxKind) -> String {
    match kind {
        BoxKind::Generic | BoxKind::Movie => String::new(),
        BoxKind::FileType { major_brand, minor_version, compatible_brands } => {
            let brands: Vec<String> = compatible_brands.iter().map(|b| b.to_string()).collect();
            format!(
                "major_brand={} minor_version={} compatible=[{}]",
                major_brand,
                minor_version,
                brands.join(", ")
            )
        }
        BoxKind::Meta(full) => format!("version={} flags={:#x}", full.version, full.flags),
        BoxKind::ItemInfo { entry_count, .. } => format!("entries={}", entry_count),
        BoxKind::ItemInfoEntry { item_id, item_type, .. } => match item_type {
            Some(item_type) => format!("item_id={} type={}", item_id, item_type),
            None => format!("item_id={}", item_id),
        },
        BoxKind::ItemLocation(iloc) => {
            let items: Vec<String> = iloc
                .items
                .iter()
                .map(|item| match item.first_extent() {
                    Some((offset, length)) => {
                        format!("{}@{}+{}", item.item_id, offset, length)
                    }
                    None => format!("{}@-", item.item_id),
                })
                .collect();
            format!("items=[{}]", items.join(", "))
        }
        BoxKind::MovieHeader { creation_time, modification_time, timescale, duration, .. } => {
            format!(
                "creation_time={} modification_time={} timescale={} duration={}",
                creation_time, modification_time, timescale, duration
            )
        }
    }
}

fn walk(reader: BoxReader, depth: usize, out: &mut String) -> TiffResult<()> {
    for iso_box in reader {
        let iso_box = iso_box?;
        let fields = describe_kind(iso_box.kind());
        let _ = writeln!(
            out,
            "{:indent$}{} [{}] offset={} size={} {}",
            "",
            iso_box.box_type(),
            iso_box.kind().name(),
            iso_box.offset(),
            iso_box.size(),
            fields,
            indent = depth * 2
        );

        if has_children(&iso_box) {
            walk(iso_box.children()?, depth + 1, out)?;
        }
    }
    Ok(())
}

/// Lists every box in `section`, children indented under their parent
pub fn describe_tree(section: &Section) -> TiffResult<String> {
    let mut out = String::new();
    walk(BoxReader::new(section.clone()), 0, &mut out)?;
    Ok(out)
}
