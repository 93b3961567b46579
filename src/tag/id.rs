use std::fmt;

const CASCADE_TAG: u8 = 0x88;

/// Identifier read off a tag.
///
/// Compared for equality only; the numeric look of most IDs carries no order.
/// Hex IDs compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagId(String);

impl TagId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    /// Render a raw UID the way the RC522 Python tooling does: the
    /// cascade-level-1 bytes followed by their XOR checksum, folded big-endian
    /// into one integer.
    ///
    /// For UIDs longer than 4 bytes level 1 is the cascade tag plus the first
    /// three UID bytes, so 7-byte tags keep the IDs that tooling wrote.
    pub fn from_uid(uid: &[u8]) -> Self {
        let level1: Vec<u8> = if uid.len() > 4 {
            std::iter::once(CASCADE_TAG)
                .chain(uid.iter().take(3).copied())
                .collect()
        } else {
            uid.to_vec()
        };
        let bcc = level1.iter().fold(0u8, |acc, b| acc ^ b);
        let n = level1
            .iter()
            .chain(std::iter::once(&bcc))
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
