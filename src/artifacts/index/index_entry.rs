//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps)
//!
//! ## Entry Format
//!
//! All integers are big-endian.
//!
//! ```text
//! ctime secs | ctime nanos | mtime secs | mtime nanos    4 x u32
//! dev | ino | mode | uid | gid | size                    6 x u32
//! object id                                              20 bytes
//! flags                                                  u16
//! extra flags (v3, extended entries only)                u16
//! name                                                   flags.name_length bytes,
//!                                                        or up to a NUL when the
//!                                                        length is 0xFFF
//! NUL padding                                            1..=8 bytes
//! ```
//!
//! The padding rounds the record length up to the next multiple of 8, adding
//! a whole block when it is already aligned. For NUL-terminated names only
//! the terminator counts towards that length.

use crate::artifacts::index::decoder::IndexError;
use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_FIXED_SIZE, EXTRA_FLAGS_SIZE, MAX_NAME_LENGTH};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use derive_new::new;
use std::io::{BufRead, Write};

/// Seconds and nanoseconds since the Unix epoch, as stored on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct Timestamp {
    pub seconds: u32,
    pub nanoseconds: u32,
}

impl Timestamp {
    /// Combined fractional-seconds view
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.nanoseconds as f64 / 1e9
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds as i64, self.nanoseconds)
    }
}

/// Exact `seconds.nanoseconds`, without going through a float
impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

/// File metadata stored in index entries
///
/// Nothing here is needed to fetch the blob, but a listing of the leaked
/// index shows it all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time
    pub ctime: Timestamp,
    /// Modification time
    pub mtime: Timestamp,
    /// Device ID
    pub dev: u32,
    /// Inode number
    pub ino: u32,
    /// File mode (permissions and type)
    pub mode: EntryMode,
    /// User ID of owner
    pub uid: u32,
    /// Group ID of owner
    pub gid: u32,
    /// File size in bytes, truncated to 32 bits
    pub size: u32,
    pub flags: EntryFlags,
    /// Only present for extended entries of a version 3 index
    pub extra_flags: Option<u16>,
}

/// One decoded record of the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// 1-based position of the entry in the index
    pub number: u32,
    /// Path relative to the repository root, exactly as recorded
    pub name: String,
    /// SHA-1 of the file content
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
    /// Bytes accounted to this record, padding included
    pub record_len: usize,
}

impl IndexEntry {
    /// Decode a single record, starting right after the previous record's padding.
    ///
    /// `version` decides whether the extended bit pulls in the extra-flags field.
    pub fn read_from<R: BufRead>(
        reader: &mut R,
        version: u32,
        number: u32,
    ) -> Result<Self, IndexError> {
        let truncated = |err| IndexError::entry(number, err);

        let read_u32 = |reader: &mut R| reader.read_u32::<NetworkEndian>().map_err(truncated);
        let ctime = Timestamp::new(read_u32(reader)?, read_u32(reader)?);
        let mtime = Timestamp::new(read_u32(reader)?, read_u32(reader)?);
        let dev = read_u32(reader)?;
        let ino = read_u32(reader)?;
        let mode = EntryMode::from(read_u32(reader)?);
        let uid = read_u32(reader)?;
        let gid = read_u32(reader)?;
        let size = read_u32(reader)?;

        let oid = ObjectId::read_h40_from(reader).map_err(truncated)?;
        let flags = EntryFlags::from_raw(reader.read_u16::<NetworkEndian>().map_err(truncated)?);

        let mut record_len = ENTRY_FIXED_SIZE;

        let extra_flags = if flags.extended() && version == 3 {
            record_len += EXTRA_FLAGS_SIZE;
            Some(reader.read_u16::<NetworkEndian>().map_err(truncated)?)
        } else {
            None
        };

        let name_bytes = if flags.has_long_name() {
            let mut name_bytes = Vec::new();
            reader.read_until(0, &mut name_bytes).map_err(truncated)?;
            if name_bytes.pop() != Some(0) {
                return Err(IndexError::Truncated { entry: number });
            }
            record_len += 1;
            name_bytes
        } else {
            let mut name_bytes = vec![0u8; flags.name_length()];
            reader.read_exact(&mut name_bytes).map_err(truncated)?;
            record_len += name_bytes.len();
            name_bytes
        };
        let name = String::from_utf8_lossy(&name_bytes).into_owned();

        let pad_len = padding_len(record_len);
        let mut padding = [0u8; ENTRY_BLOCK];
        reader
            .read_exact(&mut padding[..pad_len])
            .map_err(truncated)?;
        if let Some(offset) = padding[..pad_len].iter().position(|&b| b != 0) {
            return Err(IndexError::CorruptPadding {
                entry: number,
                offset: record_len + offset,
            });
        }
        record_len += pad_len;

        Ok(IndexEntry {
            number,
            name,
            oid,
            metadata: EntryMetadata {
                ctime,
                mtime,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
                flags,
                extra_flags,
            },
            record_len,
        })
    }

    /// Encode the record the way [`IndexEntry::read_from`] expects it.
    ///
    /// The name-length bits of the flags are derived from `name`; the other
    /// flag bits are written as given.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        let meta = &self.metadata;
        let name = self.name.as_bytes();
        let long_name = name.len() >= MAX_NAME_LENGTH;
        let name_length = if long_name { MAX_NAME_LENGTH } else { name.len() };
        let flags = (meta.flags.bits() & !EntryFlags::NAME_LENGTH.bits()) | name_length as u16;

        writer.write_u32::<NetworkEndian>(meta.ctime.seconds)?;
        writer.write_u32::<NetworkEndian>(meta.ctime.nanoseconds)?;
        writer.write_u32::<NetworkEndian>(meta.mtime.seconds)?;
        writer.write_u32::<NetworkEndian>(meta.mtime.nanoseconds)?;
        writer.write_u32::<NetworkEndian>(meta.dev)?;
        writer.write_u32::<NetworkEndian>(meta.ino)?;
        writer.write_u32::<NetworkEndian>(meta.mode.as_u32())?;
        writer.write_u32::<NetworkEndian>(meta.uid)?;
        writer.write_u32::<NetworkEndian>(meta.gid)?;
        writer.write_u32::<NetworkEndian>(meta.size)?;
        self.oid.write_h40_to(writer)?;
        writer.write_u16::<NetworkEndian>(flags)?;

        let mut record_len = ENTRY_FIXED_SIZE;
        if let Some(extra_flags) = meta.extra_flags {
            writer.write_u16::<NetworkEndian>(extra_flags)?;
            record_len += EXTRA_FLAGS_SIZE;
        }

        writer.write_all(name)?;
        if long_name {
            writer.write_all(&[0])?;
            record_len += 1;
        } else {
            record_len += name.len();
        }

        let pad_len = padding_len(record_len);
        writer.write_all(&[0u8; ENTRY_BLOCK][..pad_len])?;

        Ok(record_len + pad_len)
    }

    pub fn stage(&self) -> u8 {
        self.metadata.flags.stage()
    }
}

/// NUL bytes needed after a record of `record_len` bytes, always 1..=8
pub fn padding_len(record_len: usize) -> usize {
    ENTRY_BLOCK - record_len % ENTRY_BLOCK
}
