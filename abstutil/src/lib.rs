//! Utilities shared by every crate in the workspace: OSM-style tag maps, logging setup, a
//! hierarchical timer, warning plumbing, and JSON IO helpers.

#[macro_use]
extern crate log;

mod io;
pub mod logger;
mod logs;
mod tags;
mod time;

pub use crate::io::{read_json, to_json, write_json};
pub use crate::logs::Warn;
pub use crate::tags::Tags;
pub use crate::time::{elapsed_seconds, parallelize, prettyprint_usize, Timer};
