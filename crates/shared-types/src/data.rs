//! Raw byte buffer with hex presentation.

use std::fmt;

/// Owned byte buffer used for advert fragments, extracted messages, and
/// identity payloads.
///
/// Wire data is routinely truncated or corrupted, so `Data` makes no
/// validity claims; it is a transport for bytes plus the hex encoding the
/// pattern filter matches against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Data(pub Vec<u8>);

impl Data {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding of the buffer (e.g. `"1005421c"`).
    pub fn hex_encoded_string(&self) -> String {
        hex::encode(&self.0)
    }

    /// Suffix of the buffer starting at `offset`.
    ///
    /// Returns an empty buffer when `offset` is out of range; callers rely
    /// on "empty means invalid region" rather than a fault.
    pub fn subdata(&self, offset: usize) -> Self {
        if offset >= self.0.len() {
            return Self::new();
        }
        Self(self.0[offset..].to_vec())
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Data {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Data {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex_encoded_string())
    }
}
