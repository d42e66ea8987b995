//! Reconstruct a working tree from an exposed `.git` directory.
//!
//! The remote index is decoded into (object id, path) pairs, every path is
//! checked against the destination root, and the referenced loose objects
//! are fetched and inflated concurrently into a directory named after the
//! remote host.

pub mod areas;
pub mod artifacts;
pub mod commands;
