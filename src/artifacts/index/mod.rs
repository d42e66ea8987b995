//! Git index file format
//!
//! The index (also called staging area or cache) describes every path tracked
//! at a point in time. A leaked index is all we need to know which objects to
//! ask the remote for and where to put them.
//!
//! ## File Format (Versions 2 and 3)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 or 3 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62 bytes of fixed-width metadata (64 with v3 extra flags)
//!   - Path name
//!   - 1..=8 NUL bytes so the record ends on an 8-byte boundary
//! ```
//!
//! Extensions and the trailing checksum are never read: decoding stops once
//! the advertised number of entries has been consumed.

pub mod decoder;
pub mod entry_flags;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &str = "DIRC";

/// Index file format versions understood by the decoder
pub const SUPPORTED_VERSIONS: [u32; 2] = [2, 3];

/// Size of the fixed-width part of an entry, up to and including the flags
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Size of the optional extra-flags field of extended v3 entries
pub const EXTRA_FLAGS_SIZE: usize = 2;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Name-length sentinel meaning "read the name up to a NUL byte"
pub const MAX_NAME_LENGTH: usize = 0xFFF;
