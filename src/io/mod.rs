//! I/O utilities for bounded, random-access reading
//!
//! This module provides the byte sources every decoder reads from, the
//! bounded `Section` view used to keep nested records inside their parents,
//! and the byte order strategies used by TIFF decoding.

pub mod seekable;
pub mod section;
pub mod byte_order;

pub use seekable::{ReadAt, SeekableReader, SharedReader};
pub use section::{Section, SectionCursor};
pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
