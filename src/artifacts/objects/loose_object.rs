//! Loose object framing
//!
//! An inflated loose object starts with `<type> <size>\0`. Stripping that
//! prefix turns a blob back into the file content it was made from.

use bytes::Bytes;

const OBJECT_TYPES: [&str; 4] = ["blob", "tree", "commit", "tag"];

/// Drop the `<type> <size>\0` prefix if `data` carries a well-formed one.
///
/// Anything that does not look exactly like a loose object header, including
/// a size that disagrees with the payload, is returned untouched.
pub fn strip_header(data: Bytes) -> Bytes {
    match header_len(&data) {
        Some(len) => data.slice(len..),
        None => data,
    }
}

fn header_len(data: &[u8]) -> Option<usize> {
    let nul = data.iter().take(32).position(|&b| b == 0)?;
    let header = std::str::from_utf8(&data[..nul]).ok()?;
    let (object_type, size) = header.split_once(' ')?;

    if !OBJECT_TYPES.contains(&object_type) || !size.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let size = size.parse::<usize>().ok()?;
    (size == data.len() - nul - 1).then_some(nul + 1)
}
