//! ISO base media file format (ISO-BMFF) box parsing
//!
//! Boxes are read lazily, one sibling at a time, from a bounded section.
//! Only the handful of types needed to find items in HEIC files and to
//! describe movies are decoded; all other boxes stay navigable but opaque.

pub mod box_reader;
pub mod boxes;
pub mod tree;

pub use box_reader::{is_registered, BoxHeader, BoxReader, FourCC, IsoBox};
pub use boxes::{BoxKind, Extent, FullBoxHeader, ItemLocationBox, ItemLocationItem};
pub use tree::describe_tree;
