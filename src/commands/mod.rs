//! Command implementations
//!
//! - `dump`: fetch a remote index and reconstruct the tree it describes
//! - `ls_index`: list the entries of an index file already on disk

pub mod dump;
pub mod ls_index;
