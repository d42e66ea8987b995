//! Hand-rolled index writer, independent of the crate's own encoder

use byteorder::{NetworkEndian, WriteBytesExt};
use derive_new::new;

const ENTRY_FIXED_SIZE: usize = 62;
const LONG_NAME: usize = 0xFFF;

#[derive(Debug, Clone, new)]
pub struct EntrySpec {
    pub name: String,
    pub oid: String,
    pub mode: u32,
    #[new(default)]
    pub assume_valid: bool,
    #[new(default)]
    pub stage: u8,
    #[new(default)]
    pub extra_flags: Option<u16>,
}

impl EntrySpec {
    pub fn file(name: &str, oid: &str) -> Self {
        EntrySpec::new(name.to_string(), oid.to_string(), 0o100644)
    }
}

pub fn index_bytes(version: u32, entries: &[EntrySpec]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DIRC");
    bytes.write_u32::<NetworkEndian>(version).unwrap();
    bytes.write_u32::<NetworkEndian>(entries.len() as u32).unwrap();

    for entry in entries {
        write_entry(&mut bytes, entry);
    }

    // trailing checksum the decoder never looks at
    bytes.extend_from_slice(&[0xAB; 20]);
    bytes
}

/// Bytes accounted to one record, padding included
pub fn record_len(entry: &EntrySpec) -> usize {
    let mut len = ENTRY_FIXED_SIZE;
    if entry.extra_flags.is_some() {
        len += 2;
    }
    len += if entry.name.len() >= LONG_NAME {
        1
    } else {
        entry.name.len()
    };
    len + (8 - len % 8)
}

fn write_entry(bytes: &mut Vec<u8>, entry: &EntrySpec) {
    // ctime, mtime
    for value in [1_600_000_000u32, 123, 1_600_000_001, 456] {
        bytes.write_u32::<NetworkEndian>(value).unwrap();
    }
    // dev, ino
    bytes.write_u32::<NetworkEndian>(66306).unwrap();
    bytes.write_u32::<NetworkEndian>(1337).unwrap();
    bytes.write_u32::<NetworkEndian>(entry.mode).unwrap();
    // uid, gid, size
    bytes.write_u32::<NetworkEndian>(1000).unwrap();
    bytes.write_u32::<NetworkEndian>(1000).unwrap();
    bytes.write_u32::<NetworkEndian>(entry.name.len() as u32).unwrap();

    for i in (0..40).step_by(2) {
        bytes.push(u8::from_str_radix(&entry.oid[i..i + 2], 16).unwrap());
    }

    let long_name = entry.name.len() >= LONG_NAME;
    let mut flags = if long_name {
        LONG_NAME as u16
    } else {
        entry.name.len() as u16
    };
    if entry.assume_valid {
        flags |= 0x8000;
    }
    if entry.extra_flags.is_some() {
        flags |= 0x4000;
    }
    flags |= (entry.stage as u16 & 0b11) << 12;
    bytes.write_u16::<NetworkEndian>(flags).unwrap();

    let mut len = ENTRY_FIXED_SIZE;
    if let Some(extra_flags) = entry.extra_flags {
        bytes.write_u16::<NetworkEndian>(extra_flags).unwrap();
        len += 2;
    }

    bytes.extend_from_slice(entry.name.as_bytes());
    if long_name {
        bytes.push(0);
        len += 1;
    } else {
        len += entry.name.len();
    }

    let pad = 8 - len % 8;
    bytes.extend(std::iter::repeat_n(0u8, pad));
}
