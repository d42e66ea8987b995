//! Index format and dump data structures
//!
//! - `dump`: retrieval tasks, their outcomes and the concurrent pipeline
//! - `index`: index file header, entries and the streaming decoder
//! - `objects`: object identifiers and loose object framing

pub mod dump;
pub mod index;
pub mod objects;
