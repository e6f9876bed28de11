//! Exclusive upper bound of a byte-string prefix.
//!
//! The bound is the prefix read as a big-endian base-256 number plus one in
//! its last digit: the rightmost byte below 0xFF is incremented and the bytes
//! after it dropped. A prefix made only of 0xFF bytes has no such digit, so
//! the number grows by one digit instead (`[0xFF]` becomes `[0xFF, 0x00]`).

use cowkv_result::{Error, Result};

/// Upper end of the key range `[prefix, bound)` covered by a prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixBound {
    bytes: Vec<u8>,
    extended: bool,
}

impl PrefixBound {
    /// The bound bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the prefix was all 0xFF and the bound had to grow by one
    /// byte. Such a prefix is a suffix-free maximum: every key at or above it
    /// carries it, so nothing is past the range.
    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Whether `key` sorts at or after the end of the prefix range.
    #[inline]
    pub fn is_past(&self, key: &[u8]) -> bool {
        !self.extended && key >= self.bytes.as_slice()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Compute the exclusive upper bound of `prefix`. An empty prefix has no
/// bound and is rejected.
pub fn prefix_bound(prefix: &[u8]) -> Result<PrefixBound> {
    if prefix.is_empty() {
        return Err(Error::invalid_argument("prefix must not be empty"));
    }
    match prefix.iter().rposition(|&b| b < u8::MAX) {
        Some(pos) => {
            let mut bytes = prefix[..=pos].to_vec();
            bytes[pos] += 1;
            Ok(PrefixBound {
                bytes,
                extended: false,
            })
        }
        None => {
            let mut bytes = Vec::with_capacity(prefix.len() + 1);
            bytes.extend_from_slice(prefix);
            bytes.push(0x00);
            Ok(PrefixBound {
                bytes,
                extended: true,
            })
        }
    }
}
