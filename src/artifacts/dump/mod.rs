//! Turning decoded index entries into files on disk
//!
//! - `path_guard`: traversal check for untrusted entry names
//! - `task`: one (object id, path) unit of work
//! - `outcome`: per-task results and the final tally
//! - `pipeline`: bounded concurrent fetch-and-write of all tasks

pub mod outcome;
pub mod path_guard;
pub mod pipeline;
pub mod task;
