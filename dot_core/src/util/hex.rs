//! Helpers for working with hexadecimal

use std::iter::Iterator;

/// Write some bytes as lowercase hexadecimal.
///
/// The `0x` prefix is only emitted in alternate mode (`{:#x}`), which makes this
/// the building block for [`std::fmt::LowerHex`] and, through it, [`std::fmt::Display`].
pub(crate) fn bytes_as_hex<'a, I: Iterator<Item = &'a u8>>(
    mut byte_iter: I,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    if f.alternate() {
        write!(f, "0x")?;
    }

    byte_iter.try_fold((), |_, byte| write!(f, "{:02x}", byte))
}

/// Render a short, lossy summary of a (potentially long) byte string.
pub(crate) fn fingerprint(bytes: &[u8]) -> String {
    let take = bytes.len().min(8);
    let mut buf = String::with_capacity(take * 2 + 1);
    for byte in &bytes[..take] {
        buf.push_str(&format!("{:02x}", byte));
    }
    if bytes.len() > take {
        buf.push('…');
    }
    buf
}
