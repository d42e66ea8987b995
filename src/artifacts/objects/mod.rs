//! Git object identifiers
//!
//! Only the naming side of objects matters here: an index entry names a blob
//! by its SHA-1, and that SHA-1 tells us where the remote keeps it.

pub mod loose_object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const RAW_OBJECT_ID_LENGTH: usize = 20;
