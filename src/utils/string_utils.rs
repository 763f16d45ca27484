//! String utility functions
//!
//! Utilities for working with strings stored in TIFF values.

/// Splits a NUL separated byte buffer into strings
///
/// Empty pieces are dropped, so padding and a trailing terminator never
/// produce empty strings. Invalid UTF-8 is replaced rather than rejected.
pub fn split_nul(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|&b| b == 0)
        .filter(|piece| !piece.is_empty())
        .map(|piece| String::from_utf8_lossy(piece).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nul_drops_empty_pieces() {
        assert_eq!(split_nul(b"Canon\0"), vec!["Canon"]);
        assert_eq!(split_nul(b"\0\0a\0\0b\0"), vec!["a", "b"]);
        assert!(split_nul(b"\0\0\0").is_empty());
        assert!(split_nul(b"").is_empty());
    }
}
