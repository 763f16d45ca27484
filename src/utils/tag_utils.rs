//! Tag name lookup
//!
//! Tag names live in `exif_tags.toml`, one table per namespace. The same
//! numeric tag means different things in IFD0, the GPS IFD and a maker
//! note, so every lookup names the namespace it is made in.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;

use crate::tiff::errors::{TiffError, TiffResult};

lazy_static! {
    static ref TAG_DEFINITIONS: TagDefinitions = {
        let content = include_str!("../../exif_tags.toml");
        TagDefinitions::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse EXIF tag definitions: {}", e);
            TagDefinitions::default()
        })
    };
}

/// Namespace a tag number is interpreted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSpace {
    /// IFD0 and IFD1
    Tiff,
    /// The Exif sub-IFD
    Exif,
    /// The GPS sub-IFD
    Gps,
    /// Canon maker note
    Canon,
    /// Nikon maker note
    Nikon,
}

impl TagSpace {
    /// Name of the table in the definitions file
    pub fn table_name(&self) -> &'static str {
        match self {
            TagSpace::Tiff => "tiff",
            TagSpace::Exif => "exif",
            TagSpace::Gps => "gps",
            TagSpace::Canon => "canon",
            TagSpace::Nikon => "nikon",
        }
    }

    /// Display name used when dumping directories
    pub fn name(&self) -> &'static str {
        match self {
            TagSpace::Tiff => "Image",
            TagSpace::Exif => "Exif",
            TagSpace::Gps => "GPS",
            TagSpace::Canon => "Canon MakerNote",
            TagSpace::Nikon => "Nikon MakerNote",
        }
    }

    fn all() -> [TagSpace; 5] {
        [
            TagSpace::Tiff,
            TagSpace::Exif,
            TagSpace::Gps,
            TagSpace::Canon,
            TagSpace::Nikon,
        ]
    }
}

/// Container for tag name tables
#[derive(Debug, Default)]
pub struct TagDefinitions {
    tables: HashMap<TagSpace, HashMap<u16, String>>,
}

/// Parses a table key, accepting `0x` hex or decimal
fn parse_tag_id(key: &str) -> Option<u16> {
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => key.parse::<u16>().ok(),
    }
}

impl TagDefinitions {
    /// Parse tag definitions from a TOML string
    pub fn from_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| TiffError::GenericError(format!("Failed to parse TOML: {}", e)))?;

        let mut defs = TagDefinitions::default();
        for space in TagSpace::all() {
            let mut names = HashMap::new();
            if let Some(table) = toml_value.get(space.table_name()).and_then(|v| v.as_table()) {
                for (k, v) in table {
                    if let (Some(id), Some(name)) = (parse_tag_id(k), v.as_str()) {
                        names.insert(id, name.to_string());
                    }
                }
            }
            defs.tables.insert(space, names);
        }

        Ok(defs)
    }

    /// Looks a tag up, returning `None` when it has no name
    pub fn lookup(&self, space: TagSpace, tag: u16) -> Option<&str> {
        let found = self.tables.get(&space).and_then(|t| t.get(&tag));
        // IFD0 and the Exif IFD share one numbering in practice
        let found = match (found, space) {
            (None, TagSpace::Tiff) => self.tables.get(&TagSpace::Exif).and_then(|t| t.get(&tag)),
            (None, TagSpace::Exif) => self.tables.get(&TagSpace::Tiff).and_then(|t| t.get(&tag)),
            (found, _) => found,
        };
        found.map(String::as_str)
    }
}

/// Get the name of a tag in a namespace
///
/// Unknown tags are named by their number, e.g. `Unknown-0x1234`.
pub fn get_tag_name(space: TagSpace, tag: u16) -> String {
    TAG_DEFINITIONS
        .lookup(space, tag)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown-{:#06x}", tag))
}
