//! Tests for the TIFF module

pub(crate) mod test_utils;
