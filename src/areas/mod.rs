//! Collaborators with state or side effects
//!
//! - `config`: settings of a dump run
//! - `dumper`: drives a whole run and owns the user-facing output
//! - `remote`: HTTP access to the exposed `.git` directory
//! - `workspace`: the destination tree on local disk

pub mod config;
pub mod dumper;
pub mod remote;
pub mod workspace;
